use clap::Args;
use docker_build_push_process_management::drivers::{
    opts::LoginOpts, BuildDriver, Driver, DriverArgs,
};
use docker_build_push_utils::{constants::INPUT_REGISTRY, credentials::CredentialsArgs};
use log::trace;
use miette::Result;

use super::DockerBuildPushCommand;

#[derive(Debug, Clone, Args)]
pub struct LoginCommand {
    /// The registry's domain name,
    /// e.g. `docker.io` or `ghcr.io`.
    #[arg(short, long, env = INPUT_REGISTRY)]
    registry: String,

    #[clap(flatten)]
    credentials: CredentialsArgs,

    #[clap(flatten)]
    drivers: DriverArgs,
}

impl DockerBuildPushCommand for LoginCommand {
    fn try_run(&mut self) -> Result<()> {
        trace!("LoginCommand::try_run()");

        Driver::init(self.drivers);

        let credentials = self.credentials.clone().into_credentials(&self.registry);
        Driver::login(&LoginOpts::builder().credentials(&credentials).build())
    }
}
