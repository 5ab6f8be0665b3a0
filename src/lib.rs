//! The CLI side of docker-build-push. Each subcommand
//! gathers its inputs from flags or `INPUT_*` env vars
//! and hands the work off to the process drivers.

pub mod commands;
