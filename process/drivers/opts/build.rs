use std::{borrow::Cow, path::Path};

use bon::Builder;
use docker_build_push_utils::{
    constants::DEFAULT_BUILD_DIR,
    container::{Tag, TagList},
    credentials::Credentials,
};

use crate::drivers::registry::ImageRef;

/// Options for assembling a `docker build`.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Builder)]
pub struct BuildOpts<'scope> {
    /// The resolved image without a tag.
    pub image: &'scope ImageRef,

    /// Every tag in this list gets its own `-t` flag.
    pub tags: &'scope TagList,

    #[builder(into)]
    pub dockerfile: Cow<'scope, Path>,

    /// The build context directory.
    #[builder(into, default = Cow::Borrowed(Path::new(DEFAULT_BUILD_DIR)))]
    pub build_dir: Cow<'scope, Path>,

    /// `KEY=VALUE` pairs in the order they were given.
    #[builder(default)]
    pub build_args: &'scope [String],

    #[builder(default)]
    pub labels: &'scope [String],

    #[builder(into)]
    pub target: Option<Cow<'scope, str>>,

    #[builder(into)]
    pub platform: Option<Cow<'scope, str>>,

    #[builder(default)]
    pub ssh: &'scope [String],

    /// Prefix the command with `DOCKER_BUILDKIT=1`.
    #[builder(default)]
    pub enable_buildkit: bool,

    /// Use `docker buildx build` and push as part of the build.
    #[builder(default)]
    pub multi_platform: bool,

    #[builder(default)]
    pub skip_push: bool,
}

#[derive(Debug, Clone, Copy, Builder)]
pub struct PushOpts<'scope> {
    pub image: &'scope ImageRef,
    pub tag: &'scope Tag,
}

/// Options for logging in, building, and pushing in one go.
#[derive(Debug, Clone, Builder)]
pub struct BuildTagPushOpts<'scope> {
    #[builder(name = build_opts)]
    pub build: BuildOpts<'scope>,

    pub credentials: &'scope Credentials,

    /// Don't create a new buildx builder for
    /// multi-platform builds.
    #[builder(default)]
    pub override_driver: bool,
}

#[derive(Debug, Clone, Copy, Builder)]
pub struct LoginOpts<'scope> {
    pub credentials: &'scope Credentials,
}
