// LogExtract - platform/mod.rs
//
// Platform abstraction layer.
// Dependencies: standard library, directories, glob, toml.
// Must NOT depend on: core, app.

pub mod config;
pub mod fs;
