pub mod npx_runner;
