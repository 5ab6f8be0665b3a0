pub use build::*;
pub use ci::*;

mod build;
mod ci;
