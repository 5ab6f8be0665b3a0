use clap::Args;
use docker_build_push_process_management::drivers::{CiDriver, Driver, DriverArgs};
use docker_build_push_utils::constants::OUTPUT_TAGS;
use log::trace;
use miette::Result;

use super::{DockerBuildPushCommand, TagArgs};

#[derive(Debug, Clone, Args)]
pub struct TagsCommand {
    #[clap(flatten)]
    tags: TagArgs,

    #[clap(flatten)]
    drivers: DriverArgs,
}

impl DockerBuildPushCommand for TagsCommand {
    fn try_run(&mut self) -> Result<()> {
        trace!("TagsCommand::try_run()");

        Driver::init(self.drivers);

        let tags = self.tags.tags()?;
        Driver::set_output(OUTPUT_TAGS, &tags.to_string())?;

        for tag in &tags {
            println!("{tag}");
        }
        Ok(())
    }
}
