use clap::Args;
use docker_build_push_process_management::drivers::{CiDriver, Driver, DriverArgs};
use docker_build_push_utils::constants::{OUTPUT_IMAGE_FULL_NAME, OUTPUT_IMAGE_NAME};
use log::trace;
use miette::Result;

use super::{DockerBuildPushCommand, ImageArgs};

#[derive(Debug, Clone, Args)]
pub struct ImageNameCommand {
    #[clap(flatten)]
    image: ImageArgs,

    #[clap(flatten)]
    drivers: DriverArgs,
}

impl DockerBuildPushCommand for ImageNameCommand {
    fn try_run(&mut self) -> Result<()> {
        trace!("ImageNameCommand::try_run()");

        Driver::init(self.drivers);

        let image = self.image.resolve()?;
        Driver::set_output(OUTPUT_IMAGE_FULL_NAME, &image.to_string())?;
        Driver::set_output(OUTPUT_IMAGE_NAME, image.name())?;

        println!("{image}");
        Ok(())
    }
}
