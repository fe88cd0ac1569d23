pub mod http_toolkit;
pub mod resources;
pub mod snapshot_diff;
