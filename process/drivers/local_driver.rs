use comlexr::cmd;
use log::{error, info, trace};
use miette::{bail, miette, IntoDiagnostic};

use crate::logging::CommandString;

use super::CiDriver;

/// Used when not running in a CI system.
///
/// The reference and commit are read from the git
/// repository in the current directory.
pub struct LocalDriver;

impl LocalDriver {
    fn git(args: &[&str]) -> miette::Result<String> {
        let mut command = cmd!("git", for args);
        trace!("{}", command.to_command_string());

        let output = command.output().into_diagnostic()?;
        if !output.status.success() {
            bail!(
                "Failed to run `{}`:\n{}",
                command.to_command_string(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_owned())
    }
}

impl CiDriver for LocalDriver {
    fn git_ref() -> miette::Result<String> {
        trace!("LocalDriver::git_ref()");

        let git_ref = Self::git(&["rev-parse", "--symbolic-full-name", "HEAD"])?;
        if git_ref == "HEAD" {
            bail!(help = "Pass the reference with --git-ref", "HEAD is detached");
        }
        Ok(git_ref)
    }

    fn commit_sha() -> miette::Result<String> {
        trace!("LocalDriver::commit_sha()");
        Self::git(&["rev-parse", "HEAD"])
    }

    fn default_owner() -> miette::Result<String> {
        trace!("LocalDriver::default_owner()");
        Err(miette!(
            help = "Pass the owner with --github-owner",
            "No repository owner outside of GitHub Actions"
        ))
    }

    fn set_output(name: &str, value: &str) -> miette::Result<()> {
        trace!("LocalDriver::set_output({name}, {value})");
        info!("{name}={value}");
        Ok(())
    }

    fn set_failed(message: &str) {
        error!("{message}");
    }
}
