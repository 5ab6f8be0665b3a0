use docker_build_push_utils::{
    append_to_file,
    constants::{GITHUB_OUTPUT, GITHUB_REF, GITHUB_REPOSITORY, GITHUB_SHA},
};
use log::trace;
use miette::{miette, Context};

#[cfg(not(test))]
use docker_build_push_utils::get_env_var;

#[cfg(test)]
use docker_build_push_utils::test_utils::get_env_var;

use super::CiDriver;

pub struct GithubDriver;

impl CiDriver for GithubDriver {
    fn git_ref() -> miette::Result<String> {
        get_env_var(GITHUB_REF).inspect(|v| trace!("{GITHUB_REF}={v}"))
    }

    fn commit_sha() -> miette::Result<String> {
        get_env_var(GITHUB_SHA).inspect(|v| trace!("{GITHUB_SHA}={v}"))
    }

    fn default_owner() -> miette::Result<String> {
        let repository =
            get_env_var(GITHUB_REPOSITORY).inspect(|v| trace!("{GITHUB_REPOSITORY}={v}"))?;

        repository
            .split_once('/')
            .map(|(owner, _)| owner)
            .filter(|owner| !owner.is_empty())
            .map(ToOwned::to_owned)
            .ok_or_else(|| miette!("{GITHUB_REPOSITORY} should look like owner/repo, got {repository:?}"))
    }

    fn set_output(name: &str, value: &str) -> miette::Result<()> {
        trace!("GithubDriver::set_output({name}, {value})");

        let output_file = get_env_var(GITHUB_OUTPUT)?;
        append_to_file(&output_file, &format!("{name}={value}"))
            .wrap_err_with(|| format!("Failed to set output {name}"))
    }

    fn set_failed(message: &str) {
        println!("{}", workflow_error(message));
    }
}

/// Formats an `::error::` workflow command.
///
/// The message is escaped so that it stays on one line.
fn workflow_error(message: &str) -> String {
    format!(
        "::error::{}",
        message
            .replace('%', "%25")
            .replace('\r', "%0D")
            .replace('\n', "%0A")
    )
}

#[cfg(test)]
mod test {
    use docker_build_push_utils::{
        constants::{GITHUB_OUTPUT, GITHUB_REF, GITHUB_REPOSITORY, GITHUB_SHA},
        test_utils::{remove_env_var, set_env_var},
    };
    use rstest::rstest;

    use crate::{
        drivers::{opts::GenerateImageNameOpts, CiDriver},
        test::COMMIT_SHA,
    };

    use super::{workflow_error, GithubDriver};

    #[test]
    fn reads_ref_and_sha() {
        set_env_var(GITHUB_REF, "refs/heads/main");
        set_env_var(GITHUB_SHA, COMMIT_SHA);

        assert_eq!(GithubDriver::git_ref().unwrap(), "refs/heads/main");
        assert_eq!(GithubDriver::commit_sha().unwrap(), COMMIT_SHA);

        remove_env_var(GITHUB_REF);
        assert!(GithubDriver::git_ref().is_err());
    }

    #[rstest]
    #[case::owner_repo("Blue-Build/cli", Some("Blue-Build"))]
    #[case::no_slash("cli", None)]
    #[case::no_owner("/cli", None)]
    fn default_owner(#[case] repository: &str, #[case] expected: Option<&str>) {
        set_env_var(GITHUB_REPOSITORY, repository);

        assert_eq!(GithubDriver::default_owner().ok().as_deref(), expected);
    }

    #[test]
    fn image_name_uses_repository_owner() {
        set_env_var(GITHUB_REPOSITORY, "Some-Org/some-repo");

        let image = GithubDriver::generate_image_name(
            &GenerateImageNameOpts::builder()
                .registry("ghcr.io")
                .name("some-repo/image-name")
                .build(),
        )
        .unwrap();
        assert_eq!(image.to_string(), "ghcr.io/some-org/some-repo/image-name");

        let image = GithubDriver::generate_image_name(
            &GenerateImageNameOpts::builder()
                .registry("ghcr.io")
                .name("image-name")
                .owner("Override")
                .build(),
        )
        .unwrap();
        assert_eq!(image.to_string(), "ghcr.io/override/image-name");
    }

    #[rstest]
    #[case::empty("")]
    #[case::blank(" ")]
    fn empty_owner_uses_repository_owner(#[case] owner: &str) {
        set_env_var(GITHUB_REPOSITORY, "Some-Org/repo");

        let image = GithubDriver::generate_image_name(
            &GenerateImageNameOpts::builder()
                .registry("ghcr.io")
                .name("image-name")
                .owner(owner)
                .build(),
        )
        .unwrap();
        assert_eq!(image.to_string(), "ghcr.io/some-org/image-name");
    }

    #[test]
    fn image_name_without_owner() {
        remove_env_var(GITHUB_REPOSITORY);

        assert!(GithubDriver::generate_image_name(
            &GenerateImageNameOpts::builder()
                .registry("ghcr.io")
                .name("image-name")
                .build(),
        )
        .is_err());
    }

    #[test]
    fn outputs_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output");
        set_env_var(GITHUB_OUTPUT, path.display().to_string());

        GithubDriver::set_output("imageName", "p/img").unwrap();
        GithubDriver::set_output("tags", "latest,v1").unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "imageName=p/img\ntags=latest,v1\n"
        );
    }

    #[test]
    fn outputs_need_file() {
        remove_env_var(GITHUB_OUTPUT);

        assert!(GithubDriver::set_output("tags", "latest").is_err());
    }

    #[rstest]
    #[case::plain("Build failed", "::error::Build failed")]
    #[case::multi_line("Build failed\nexit 1", "::error::Build failed%0Aexit 1")]
    #[case::percent("100% broken\r\n", "::error::100%25 broken%0D%0A")]
    fn workflow_errors(#[case] message: &str, #[case] expected: &str) {
        assert_eq!(workflow_error(message), expected);
    }
}
