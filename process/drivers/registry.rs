use docker_build_push_utils::{
    constants::{ECR_HOST_MARKER, ECR_REGION_END, ECR_REGION_START, GITHUB_REGISTRY_HOSTS},
    container::Tag,
};
use log::{debug, trace};

use super::{error::RegistryError, opts::GenerateImageNameOpts};

/// The kind of registry an image is pushed to.
///
/// Decides how the image name is laid out and how to login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryType {
    /// `ghcr.io` or `docker.pkg.github.com`. Images are namespaced by owner.
    Github,

    /// An AWS Elastic Container Registry.
    Ecr { region: String },

    Standard,
}

impl RegistryType {
    /// Determines the registry type from its host.
    ///
    /// # Errors
    /// Will error if the host looks like ECR but the region
    /// can't be found in it.
    pub fn detect(host: &str) -> Result<Self, RegistryError> {
        trace!("RegistryType::detect({host})");

        Ok(if is_github_registry(host) {
            Self::Github
        } else if is_ecr(host) {
            Self::Ecr {
                region: ecr_region(host)?.into(),
            }
        } else {
            Self::Standard
        })
    }
}

#[must_use]
pub fn is_github_registry(host: &str) -> bool {
    GITHUB_REGISTRY_HOSTS.contains(&host)
}

#[must_use]
pub fn is_ecr(host: &str) -> bool {
    host.contains(ECR_HOST_MARKER)
}

/// Pulls the region out of an ECR host,
/// e.g. `us-east-1` from `123456789123.dkr.ecr.us-east-1.amazonaws.com`.
///
/// # Errors
/// Will error if either marker is missing or the region is empty.
pub fn ecr_region(host: &str) -> Result<&str, RegistryError> {
    let unparseable = || RegistryError::UnparseableEcrHost(host.into());

    let (_, rest) = host.split_once(ECR_REGION_START).ok_or_else(unparseable)?;
    let (region, _) = rest.split_once(ECR_REGION_END).ok_or_else(unparseable)?;

    if region.is_empty() {
        return Err(unparseable());
    }
    Ok(region)
}

/// A fully resolved image name without a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    registry: String,
    owner: Option<String>,
    name: String,
}

impl ImageRef {
    /// Resolves the image name for the given registry.
    ///
    /// GitHub registries get the lower-cased owner between
    /// the registry and the name. Other registries ignore the owner.
    ///
    /// # Errors
    /// Will error if the registry is a GitHub registry and no owner was given.
    pub fn resolve(opts: &GenerateImageNameOpts) -> Result<Self, RegistryError> {
        trace!("ImageRef::resolve({opts:#?})");

        let owner = if is_github_registry(opts.registry) {
            let owner = opts
                .owner
                .filter(|owner| !owner.is_empty())
                .ok_or_else(|| RegistryError::MissingOwner(opts.registry.into()))?;
            Some(owner.to_lowercase())
        } else {
            None
        };

        let image = Self {
            registry: opts.registry.into(),
            owner,
            name: opts.name.into(),
        };
        debug!("Resolved image name {image}");

        Ok(image)
    }

    #[must_use]
    pub fn registry(&self) -> &str {
        &self.registry
    }

    /// The image name as given, e.g. `some-repo/image-name`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The image with a tag, e.g. `ghcr.io/owner/image:latest`.
    #[must_use]
    pub fn with_tag(&self, tag: &Tag) -> String {
        format!("{self}:{tag}")
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.owner {
            Some(owner) => write!(f, "{}/{owner}/{}", self.registry, self.name),
            None => write!(f, "{}/{}", self.registry, self.name),
        }
    }
}
