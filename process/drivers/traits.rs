use docker_build_push_utils::non_empty;
use log::{debug, info, trace};
use miette::Result;

use super::{
    opts::{BuildOpts, BuildTagPushOpts, GenerateImageNameOpts, LoginOpts, PushOpts},
    registry::ImageRef,
};

/// Allows agnostic building, pushing, and login.
pub trait BuildDriver {
    /// Runs the build logic for the driver.
    ///
    /// # Errors
    /// Will error if the build fails.
    fn build(opts: &BuildOpts) -> Result<()>;

    /// Pushes a single tag of an image.
    ///
    /// # Errors
    /// Will error if the push fails.
    fn push(opts: &PushOpts) -> Result<()>;

    /// Logs into the registry of the credentials.
    ///
    /// # Errors
    /// Will error if login fails.
    fn login(opts: &LoginOpts) -> Result<()>;

    /// Prepares the builder for multi-platform builds.
    ///
    /// # Errors
    /// Will error if the builder can't be created.
    fn setup_multi_platform() -> Result<()>;

    /// Checks everything the build needs before anything is run.
    ///
    /// # Errors
    /// Will error if the build can't be started.
    fn preflight(opts: &BuildTagPushOpts) -> Result<()>;

    /// Logs in, builds, and pushes every tag of an image in that order.
    ///
    /// Nothing is run when the preflight checks fail. A failed
    /// push stops the tags after it from being pushed.
    ///
    /// # Errors
    /// Will error if any step fails.
    fn build_tag_push(opts: &BuildTagPushOpts) -> Result<()> {
        trace!("BuildDriver::build_tag_push({opts:#?})");

        Self::preflight(opts)?;

        if opts.build.skip_push {
            info!("Skipping login and push");
        } else {
            Self::login(&LoginOpts::builder().credentials(opts.credentials).build())?;
        }

        if opts.build.multi_platform && !opts.override_driver {
            Self::setup_multi_platform()?;
        }

        info!("Building image {}", opts.build.image);
        Self::build(&opts.build)?;

        if opts.build.skip_push {
            return Ok(());
        }
        if opts.build.multi_platform {
            debug!("Multi-platform images were pushed during the build");
            return Ok(());
        }

        for tag in opts.build.tags {
            Self::push(&PushOpts::builder().image(opts.build.image).tag(tag).build())?;
        }

        Ok(())
    }
}

/// Allows agnostic retrieval of CI variables
/// and reporting back to the CI system.
pub trait CiDriver {
    /// The full git reference that triggered the run.
    ///
    /// # Errors
    /// Will error if the reference can't be found.
    fn git_ref() -> Result<String>;

    /// The full commit id of the run.
    ///
    /// # Errors
    /// Will error if the commit can't be found.
    fn commit_sha() -> Result<String>;

    /// The owner of the repository, used as the
    /// namespace on GitHub registries.
    ///
    /// # Errors
    /// Will error if the owner can't be determined.
    fn default_owner() -> Result<String>;

    /// Publishes a named output of the run.
    ///
    /// # Errors
    /// Will error if the output can't be written.
    fn set_output(name: &str, value: &str) -> Result<()>;

    /// Marks the run as failed with a message.
    fn set_failed(message: &str);

    /// Resolves the full image name, falling back to
    /// the repository owner when none was given.
    ///
    /// # Errors
    /// Will error if the registry needs an owner and none could be found.
    fn generate_image_name(opts: &GenerateImageNameOpts) -> Result<ImageRef> {
        trace!("CiDriver::generate_image_name({opts:#?})");

        let owner = non_empty(opts.owner);
        let default_owner = match owner {
            Some(_) => None,
            None => Self::default_owner()
                .inspect_err(|e| debug!("No default owner: {e}"))
                .ok(),
        };

        Ok(ImageRef::resolve(
            &GenerateImageNameOpts::builder()
                .name(opts.name)
                .registry(opts.registry)
                .maybe_owner(owner.or(default_owner.as_deref()))
                .build(),
        )?)
    }
}
