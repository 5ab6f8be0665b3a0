use std::path::PathBuf;

use clap::{crate_authors, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use docker_build_push_process_management::drivers::{CiDriver, Driver};
use log::debug;
use miette::Diagnostic;
use thiserror::Error;

pub use args::{ImageArgs, TagArgs};

mod args;
pub mod build;
pub mod image_name;
pub mod login;
pub mod tags;

/// A failure that was already reported to the CI system.
#[derive(Debug, Error, Diagnostic)]
#[error("{0}")]
pub struct ReportedError(String);

pub trait DockerBuildPushCommand {
    /// Runs the command and returns a result
    /// of the execution
    ///
    /// # Errors
    /// Can return a `miette` Error
    fn try_run(&mut self) -> miette::Result<()>;

    /// Runs the command, reporting the failure to
    /// the CI system and exiting if there is an error.
    fn run(&mut self) {
        if let Err(e) = self.try_run() {
            if e.downcast_ref::<ReportedError>().is_none() {
                Driver::set_failed(&e.to_string());
            }
            debug!("{e:?}");
            std::process::exit(1);
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "docker-build-push",
    about,
    long_about = None,
    author = crate_authors!(),
    version,
)]
pub struct DockerBuildPushArgs {
    #[command(subcommand)]
    pub command: CommandArgs,

    /// The directory to write log files to.
    #[arg(long, global = true)]
    pub log_out: Option<PathBuf>,

    #[clap(flatten)]
    pub verbosity: Verbosity<InfoLevel>,
}

#[derive(Debug, Subcommand)]
pub enum CommandArgs {
    /// Login, build an image from a Dockerfile,
    /// and push every tag
    Build(build::BuildCommand),

    /// Login to a registry
    Login(login::LoginCommand),

    /// Print the tags derived for the current git reference
    Tags(tags::TagsCommand),

    /// Print the fully qualified image name
    ImageName(image_name::ImageNameCommand),
}
