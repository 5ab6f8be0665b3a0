use clap::Parser;
use docker_build_push::commands::{CommandArgs, DockerBuildPushArgs, DockerBuildPushCommand};
use docker_build_push_process_management::logging::Logger;

fn main() {
    let args = DockerBuildPushArgs::parse();

    Logger::new()
        .filter_level(args.verbosity.log_level_filter())
        .log_out_dir(args.log_out.as_ref())
        .init();

    log::trace!("Parsed arguments: {args:#?}");

    match args.command {
        CommandArgs::Build(mut command) => command.run(),
        CommandArgs::Login(mut command) => command.run(),
        CommandArgs::Tags(mut command) => command.run(),
        CommandArgs::ImageName(mut command) => command.run(),
    }
}
