pub mod diff_service;
pub mod display;
pub mod version_service;
