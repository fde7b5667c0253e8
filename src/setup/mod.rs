//! Setup tooling: turn a configuration tree into a runnable config file.

pub mod config_file;
pub mod generator;
pub mod value;

pub use config_file::ConfigFile;
pub use generator::{ConfigGenerator, Eol};
