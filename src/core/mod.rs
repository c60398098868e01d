// LogExtract - core/mod.rs
//
// Core extraction pipeline.
// Dependencies: util, platform::fs (file reads only), csv, chrono.
// Must NOT depend on: app, or any presentation code.

pub mod delimiter;
pub mod export;
pub mod extract;
pub mod header;
pub mod merge;
pub mod model;
pub mod range;
pub mod timestamp;
pub mod validate;
