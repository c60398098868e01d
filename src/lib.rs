// LogExtract - lib.rs
//
// Library entry point, exposing the extraction pipeline for the CLI,
// integration tests, and any other front-end.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
