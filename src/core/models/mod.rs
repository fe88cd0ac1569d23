pub mod difference;
pub mod manifest;
pub mod plugin;
