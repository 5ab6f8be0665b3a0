//! This module is responsible for managing processes spawned
//! by this tool. It contains the drivers for deriving tags,
//! resolving image names, and building, logging into, and
//! pushing to registries with the docker CLI.

pub mod drivers;
pub mod logging;
