pub mod args;
pub mod commands;

pub use args::{Cli, Commands, TargetChoice};
pub use commands::run;
