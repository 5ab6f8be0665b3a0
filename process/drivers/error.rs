use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum TagError {
    #[error("Unsupported git reference {0:?}")]
    #[diagnostic(help(
        "Only tag (refs/tags/), branch (refs/heads/), and pull request (refs/pull/) references can be tagged"
    ))]
    UnsupportedRef(String),

    #[error("Generated an invalid tag {tag:?} from {git_ref:?}")]
    #[diagnostic(help("Pass the tags explicitly with --tags"))]
    InvalidTag { tag: String, git_ref: String },
}

#[derive(Error, Diagnostic, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unable to parse the ECR region from {0:?}")]
    #[diagnostic(help(
        "ECR hosts look like <account>.dkr.ecr.<region>.amazonaws.com"
    ))]
    UnparseableEcrHost(String),

    #[error("An owner is required for the registry {0}")]
    #[diagnostic(help("Set --github-owner or the GITHUB_REPOSITORY env var"))]
    MissingOwner(String),
}

#[derive(Error, Diagnostic, Debug)]
pub enum BuildError {
    #[error("Dockerfile {} does not exist", .0.display())]
    #[diagnostic(help("Set --dockerfile to the path of your Dockerfile"))]
    DockerfileNotFound(PathBuf),

    #[error("Credentials are required to login to {0}")]
    #[diagnostic(help("Set --username and --password, or --skip-push to skip the login"))]
    CredentialsRequired(String),

    #[error("Captured output of `{command}` was more than the {max} byte limit")]
    #[diagnostic()]
    OutputTooLarge { command: String, max: usize },
}
