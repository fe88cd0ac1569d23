pub mod logger;
pub mod script_runner;
pub mod toolkit;
