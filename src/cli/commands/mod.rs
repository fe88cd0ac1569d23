pub mod archive;
pub mod build;
pub mod create_configuration;
pub mod deploy;
pub mod diff;
pub mod list;
pub mod print_helpers;
pub mod release;
pub mod start;
