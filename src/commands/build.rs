use std::path::{Path, PathBuf};

use clap::{builder::FalseyValueParser, Args};
use docker_build_push_process_management::drivers::{
    opts::{BuildOpts, BuildTagPushOpts},
    BuildDriver, CiDriver, Driver, DriverArgs,
};
use docker_build_push_utils::{
    constants::{
        DEFAULT_BUILD_DIR, DEFAULT_DOCKERFILE, INPUT_BUILD_ARGS, INPUT_DIRECTORY,
        INPUT_DOCKERFILE, INPUT_ENABLE_BUILDKIT, INPUT_LABELS, INPUT_MULTI_PLATFORM,
        INPUT_OVERRIDE_DRIVER, INPUT_PLATFORM, INPUT_SKIP_PUSH, INPUT_SSH, INPUT_TARGET,
        OUTPUT_IMAGE_FULL_NAME, OUTPUT_IMAGE_NAME, OUTPUT_TAGS,
    },
    credentials::CredentialsArgs,
    non_empty, parse_list,
};
use log::{info, trace};
use miette::Result;

use super::{DockerBuildPushCommand, ImageArgs, TagArgs};

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Args)]
pub struct BuildCommand {
    #[clap(flatten)]
    image: ImageArgs,

    #[clap(flatten)]
    tags: TagArgs,

    #[clap(flatten)]
    credentials: CredentialsArgs,

    /// The path to the Dockerfile.
    #[arg(short = 'f', long, env = INPUT_DOCKERFILE, default_value = DEFAULT_DOCKERFILE)]
    dockerfile: PathBuf,

    /// The build context directory.
    #[arg(short, long, env = INPUT_DIRECTORY, default_value = DEFAULT_BUILD_DIR)]
    directory: PathBuf,

    /// A comma separated list of `KEY=VALUE` build args.
    #[arg(long, env = INPUT_BUILD_ARGS)]
    build_args: Option<String>,

    /// A comma separated list of `KEY=VALUE` labels.
    #[arg(long, env = INPUT_LABELS)]
    labels: Option<String>,

    /// The stage of a multi-stage Dockerfile to build.
    #[arg(long, env = INPUT_TARGET)]
    target: Option<String>,

    /// The platforms to build for, e.g. `linux/amd64,linux/arm64`.
    #[arg(long, env = INPUT_PLATFORM)]
    platform: Option<String>,

    /// A comma separated list of SSH agent sockets
    /// or keys to expose to the build.
    #[arg(long, env = INPUT_SSH)]
    ssh: Option<String>,

    /// Build with BuildKit.
    #[arg(long, env = INPUT_ENABLE_BUILDKIT, value_parser = FalseyValueParser::new())]
    enable_buildkit: bool,

    /// Build with `docker buildx` and push
    /// as part of the build.
    #[arg(long, env = INPUT_MULTI_PLATFORM, value_parser = FalseyValueParser::new())]
    multi_platform: bool,

    /// Use the current buildx builder instead
    /// of creating a new one.
    #[arg(long, env = INPUT_OVERRIDE_DRIVER, value_parser = FalseyValueParser::new())]
    override_driver: bool,

    /// Only build the image, skipping login and push.
    #[arg(long, env = INPUT_SKIP_PUSH, value_parser = FalseyValueParser::new())]
    skip_push: bool,

    #[clap(flatten)]
    drivers: DriverArgs,
}

impl BuildCommand {
    fn dockerfile(&self) -> &Path {
        path_or(&self.dockerfile, DEFAULT_DOCKERFILE)
    }

    fn directory(&self) -> &Path {
        path_or(&self.directory, DEFAULT_BUILD_DIR)
    }

    fn target(&self) -> Option<&str> {
        non_empty(self.target.as_deref())
    }

    fn platform(&self) -> Option<&str> {
        non_empty(self.platform.as_deref())
    }
}

/// An empty input path falls back to its default.
fn path_or<'a>(path: &'a Path, default: &'static str) -> &'a Path {
    if path.as_os_str().is_empty() {
        Path::new(default)
    } else {
        path
    }
}

impl DockerBuildPushCommand for BuildCommand {
    fn try_run(&mut self) -> Result<()> {
        trace!("BuildCommand::try_run()");

        Driver::init(self.drivers);

        let image = self.image.resolve()?;
        let tags = self.tags.tags()?;
        let credentials = self
            .credentials
            .clone()
            .into_credentials(&self.image.registry);

        let list = |input: &Option<String>| {
            input
                .as_deref()
                .and_then(parse_list)
                .unwrap_or_default()
        };
        let build_args = list(&self.build_args);
        let labels = list(&self.labels);
        let ssh = list(&self.ssh);

        Driver::build_tag_push(
            &BuildTagPushOpts::builder()
                .build_opts(
                    BuildOpts::builder()
                        .image(&image)
                        .tags(&tags)
                        .dockerfile(self.dockerfile())
                        .build_dir(self.directory())
                        .build_args(&build_args)
                        .labels(&labels)
                        .maybe_target(self.target())
                        .maybe_platform(self.platform())
                        .ssh(&ssh)
                        .enable_buildkit(self.enable_buildkit)
                        .multi_platform(self.multi_platform)
                        .skip_push(self.skip_push)
                        .build(),
                )
                .credentials(&credentials)
                .override_driver(self.override_driver)
                .build(),
        )?;

        Driver::set_output(OUTPUT_IMAGE_FULL_NAME, &image.to_string())?;
        Driver::set_output(OUTPUT_IMAGE_NAME, image.name())?;
        Driver::set_output(OUTPUT_TAGS, &tags.to_string())?;

        info!("Finished building {image} with tags {tags}");
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use clap::Parser;
    use docker_build_push_utils::{
        constants::{
            DEFAULT_BUILD_DIR, DEFAULT_DOCKERFILE, INPUT_ADD_LATEST, INPUT_DIRECTORY,
            INPUT_DOCKERFILE, INPUT_ENABLE_BUILDKIT, INPUT_GITHUB_OWNER, INPUT_MULTI_PLATFORM,
            INPUT_OVERRIDE_DRIVER, INPUT_PLATFORM, INPUT_SKIP_PUSH, INPUT_TARGET,
        },
        non_empty,
    };

    use super::BuildCommand;

    #[derive(Debug, Parser)]
    struct TestArgs {
        #[clap(flatten)]
        build: BuildCommand,
    }

    fn parse(args: &[&str]) -> BuildCommand {
        TestArgs::try_parse_from(
            ["test", "--image", "p/img", "--registry", "gcr.io"]
                .iter()
                .chain(args),
        )
        .unwrap()
        .build
    }

    #[test]
    fn empty_inputs_are_not_given() {
        for key in [
            INPUT_TARGET,
            INPUT_PLATFORM,
            INPUT_DOCKERFILE,
            INPUT_DIRECTORY,
            INPUT_GITHUB_OWNER,
            INPUT_ADD_LATEST,
            INPUT_MULTI_PLATFORM,
            INPUT_SKIP_PUSH,
        ] {
            std::env::set_var(key, "");
        }
        std::env::set_var(INPUT_OVERRIDE_DRIVER, "false");
        std::env::set_var(INPUT_ENABLE_BUILDKIT, "true");

        let build = parse(&[]);

        assert_eq!(build.target(), None);
        assert_eq!(build.platform(), None);
        assert_eq!(build.dockerfile(), Path::new(DEFAULT_DOCKERFILE));
        assert_eq!(build.directory(), Path::new(DEFAULT_BUILD_DIR));
        assert_eq!(non_empty(build.image.github_owner.as_deref()), None);
        assert!(!build.tags.add_latest);
        assert!(!build.multi_platform);
        assert!(!build.skip_push);
        assert!(!build.override_driver);
        assert!(build.enable_buildkit);
    }

    #[test]
    fn given_inputs() {
        let build = parse(&[
            "--target",
            "builder",
            "--platform",
            "linux/arm64",
            "-f",
            "docker/Dockerfile.prod",
            "-d",
            "app",
            "--skip-push",
        ]);

        assert_eq!(build.target(), Some("builder"));
        assert_eq!(build.platform(), Some("linux/arm64"));
        assert_eq!(build.dockerfile(), Path::new("docker/Dockerfile.prod"));
        assert_eq!(build.directory(), Path::new("app"));
        assert!(build.skip_push);
    }
}
