pub mod api;
pub mod scripts;
