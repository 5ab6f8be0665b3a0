use clap::{builder::FalseyValueParser, Args};
use docker_build_push_process_management::drivers::{
    opts::{GenerateImageNameOpts, GenerateTagsOpts},
    registry::ImageRef,
    tags::compose_tags,
    CiDriver, Driver,
};
use docker_build_push_utils::{
    constants::{
        INPUT_ADD_LATEST, INPUT_ADD_TIMESTAMP, INPUT_GITHUB_OWNER, INPUT_IMAGE,
        INPUT_NUMERIC_TIMESTAMP, INPUT_REGISTRY, INPUT_TAGS,
    },
    container::TagList,
    non_empty, parse_list,
};
use log::{debug, trace};
use miette::Result;

use super::ReportedError;

/// Where the image lives.
#[derive(Debug, Clone, Args)]
pub struct ImageArgs {
    /// The name of the image without the registry,
    /// e.g. `some-repo/image-name`.
    #[arg(short, long, env = INPUT_IMAGE)]
    pub image: String,

    /// The registry's domain name,
    /// e.g. `docker.io` or `ghcr.io`.
    #[arg(short, long, env = INPUT_REGISTRY)]
    pub registry: String,

    /// The owner to namespace GitHub registry images with.
    ///
    /// Defaults to the owner of the repository.
    #[arg(long, env = INPUT_GITHUB_OWNER)]
    pub github_owner: Option<String>,
}

impl ImageArgs {
    /// Resolves the full image name.
    ///
    /// # Errors
    /// Will error if the registry is a GitHub registry
    /// and no owner can be found.
    pub fn resolve(&self) -> Result<ImageRef> {
        trace!("ImageArgs::resolve({self:#?})");

        Driver::generate_image_name(
            &GenerateImageNameOpts::builder()
                .name(&self.image)
                .registry(&self.registry)
                .maybe_owner(non_empty(self.github_owner.as_deref()))
                .build(),
        )
    }
}

/// How the tags of the image are chosen.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Args)]
pub struct TagArgs {
    /// A comma separated list of tags to use.
    ///
    /// No tags are derived from the git reference when set.
    #[arg(short, long, env = INPUT_TAGS)]
    pub tags: Option<String>,

    /// Also tag the image with `latest`.
    #[arg(long, env = INPUT_ADD_LATEST, value_parser = FalseyValueParser::new())]
    pub add_latest: bool,

    /// Add a timestamp to tags derived from
    /// branches and pull requests.
    #[arg(long, env = INPUT_ADD_TIMESTAMP, value_parser = FalseyValueParser::new())]
    pub add_timestamp: bool,

    /// Use milliseconds since the epoch for the timestamp.
    #[arg(long, env = INPUT_NUMERIC_TIMESTAMP, value_parser = FalseyValueParser::new())]
    pub numeric_timestamp: bool,

    /// The git reference to derive the tags from.
    ///
    /// Defaults to the reference of the CI run.
    #[arg(long)]
    pub git_ref: Option<String>,

    /// The commit to derive the tags from.
    ///
    /// Defaults to the commit of the CI run.
    #[arg(long)]
    pub sha: Option<String>,
}

impl TagArgs {
    /// The explicit tags when given, otherwise
    /// the tags derived from the git reference.
    ///
    /// # Errors
    /// Will error if an explicit tag is invalid, the CI variables
    /// are missing, or the git reference can't be tagged.
    pub fn tags(&self) -> Result<TagList> {
        trace!("TagArgs::tags({self:#?})");

        if let Some(tags) = self.tags.as_deref().and_then(parse_list) {
            debug!("Using tags {tags:?}");
            return TagList::from_user_tags(tags);
        }

        let git_ref = match non_empty(self.git_ref.as_deref()) {
            Some(git_ref) => git_ref.to_owned(),
            None => Driver::git_ref()?,
        };
        let commit_sha = match non_empty(self.sha.as_deref()) {
            Some(sha) => sha.to_owned(),
            None => Driver::commit_sha()?,
        };

        let mut reported = None;
        let tags = compose_tags(
            &GenerateTagsOpts::builder()
                .git_ref(&git_ref)
                .commit_sha(&commit_sha)
                .add_latest(self.add_latest)
                .add_timestamp(self.add_timestamp)
                .numeric_timestamp(self.numeric_timestamp)
                .build(),
            |err| {
                Driver::set_failed(&err.to_string());
                reported = Some(ReportedError(err.to_string()));
            },
        );

        match reported {
            Some(err) => Err(err.into()),
            None => Ok(tags),
        }
    }
}

#[cfg(test)]
mod test {
    use clap::Parser;
    use rstest::rstest;

    use super::{ImageArgs, ReportedError, TagArgs};

    #[derive(Debug, Parser)]
    struct TestArgs {
        #[clap(flatten)]
        image: ImageArgs,

        #[clap(flatten)]
        tags: TagArgs,
    }

    const SHA: &str = "79d9bbba94cdbe372703f184e82c102107c71264";

    fn parse(args: &[&str]) -> TestArgs {
        TestArgs::try_parse_from(
            ["test", "--image", "some-repo/image-name", "--registry", "docker.io"]
                .iter()
                .chain(args),
        )
        .unwrap()
    }

    #[rstest]
    #[case::explicit(&["--tags", "v1, latest,v1"], "v1,latest")]
    #[case::explicit_wins(&["--tags", "v2", "--add-latest", "--git-ref", "refs/heads/main"], "v2")]
    #[case::branch(&["--git-ref", "refs/heads/main", "--sha", SHA], "main-79d9bbb")]
    #[case::branch_latest(
        &["--git-ref", "refs/heads/feature/x", "--sha", SHA, "--add-latest"],
        "feature-x-79d9bbb,latest"
    )]
    #[case::version(&["--git-ref", "refs/tags/v1.2.0", "--sha", SHA, "--add-timestamp"], "v1.2.0")]
    #[case::empty_tags_derive(&["--tags", " , ", "--git-ref", "refs/pull/5/merge", "--sha", SHA], "pr-5-79d9bbb")]
    fn tags(#[case] args: &[&str], #[case] expected: &str) {
        assert_eq!(parse(args).tags.tags().unwrap().to_string(), expected);
    }

    #[rstest]
    #[case::remote("refs/remotes/origin/main")]
    #[case::short_name("main")]
    fn unsupported_git_ref_is_reported(#[case] git_ref: &str) {
        let err = parse(&["--git-ref", git_ref, "--sha", SHA])
            .tags
            .tags()
            .unwrap_err();

        assert!(err.downcast_ref::<ReportedError>().is_some());
        assert!(err.to_string().contains(git_ref));
    }

    #[test]
    fn invalid_derived_tag_is_reported() {
        let err = parse(&["--git-ref", "refs/heads/---", "--sha", SHA])
            .tags
            .tags()
            .unwrap_err();

        assert!(err.downcast_ref::<ReportedError>().is_some());
    }

    #[test]
    fn invalid_explicit_tag() {
        assert!(parse(&["--tags=-bad"]).tags.tags().is_err());
    }

    #[test]
    fn github_owner_override() {
        let args = TestArgs::try_parse_from([
            "test",
            "--image",
            "some-repo/image-name",
            "--registry",
            "ghcr.io",
            "--github-owner",
            "Owner",
        ])
        .unwrap();

        assert_eq!(
            args.image.resolve().unwrap().to_string(),
            "ghcr.io/owner/some-repo/image-name"
        );
    }

    #[test]
    fn standard_registry() {
        assert_eq!(
            parse(&[]).image.resolve().unwrap().to_string(),
            "docker.io/some-repo/image-name"
        );
    }
}
