//! This module is responsible for the strategies used to
//! derive tags, resolve image names, and run docker. The
//! command logic only talks to [`Driver`], which hides
//! whether it's running under GitHub Actions or locally.

use std::sync::OnceLock;

use bon::Builder;
use clap::Args;
use log::trace;
use miette::Result;

use self::{
    docker_driver::DockerDriver,
    github_driver::GithubDriver,
    local_driver::LocalDriver,
    opts::{BuildOpts, BuildTagPushOpts, LoginOpts, PushOpts},
    types::{CiDriverType, DetermineDriver},
};

pub use traits::*;

pub mod docker_driver;
pub mod error;
pub mod git_ref;
mod github_driver;
mod local_driver;
pub mod opts;
pub mod registry;
pub mod tags;
mod traits;
pub mod types;

static SELECTED_CI_DRIVER: OnceLock<CiDriverType> = OnceLock::new();

/// Args for selecting the drivers to use for runtime.
///
/// If the args are left uninitialized, the program will determine
/// the best one available.
#[derive(Default, Clone, Copy, Debug, Builder, Args)]
pub struct DriverArgs {
    /// Select which CI system to read variables
    /// from and report results to.
    #[arg(long)]
    ci_driver: Option<CiDriverType>,
}

macro_rules! impl_ci_driver {
    ($func:ident($($args:expr),*)) => {
        match Driver::get_ci_driver() {
            CiDriverType::Github => GithubDriver::$func($($args,)*),
            CiDriverType::Local => LocalDriver::$func($($args,)*),
        }
    };
}

pub struct Driver;

impl Driver {
    /// Selects the drivers to use for the rest of the run.
    ///
    /// Only the first call has an effect.
    pub fn init(mut args: DriverArgs) {
        trace!("Driver::init()");

        let selected = *SELECTED_CI_DRIVER.get_or_init(|| args.ci_driver.determine_driver());
        trace!("CI driver set {selected:?}");
    }

    pub fn get_ci_driver() -> CiDriverType {
        *SELECTED_CI_DRIVER.get_or_init(|| None::<CiDriverType>.determine_driver())
    }
}

impl CiDriver for Driver {
    fn git_ref() -> Result<String> {
        impl_ci_driver!(git_ref())
    }

    fn commit_sha() -> Result<String> {
        impl_ci_driver!(commit_sha())
    }

    fn default_owner() -> Result<String> {
        impl_ci_driver!(default_owner())
    }

    fn set_output(name: &str, value: &str) -> Result<()> {
        impl_ci_driver!(set_output(name, value))
    }

    fn set_failed(message: &str) {
        impl_ci_driver!(set_failed(message));
    }
}

impl BuildDriver for Driver {
    fn build(opts: &BuildOpts) -> Result<()> {
        DockerDriver::build(opts)
    }

    fn push(opts: &PushOpts) -> Result<()> {
        DockerDriver::push(opts)
    }

    fn login(opts: &LoginOpts) -> Result<()> {
        DockerDriver::login(opts)
    }

    fn setup_multi_platform() -> Result<()> {
        DockerDriver::setup_multi_platform()
    }

    fn preflight(opts: &BuildTagPushOpts) -> Result<()> {
        DockerDriver::preflight(opts)
    }
}
