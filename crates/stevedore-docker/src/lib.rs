//! Docker-side operations for stevedore: external command execution, image
//! tag resolution, and the build → tag → push cycle.

pub mod cli;
pub mod image;
pub mod runner;

pub use cli::DockerCli;
pub use image::Image;
pub use runner::{CommandError, CommandRunner, ProcessRunner, exec_lenient};
