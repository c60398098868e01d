// LogExtract - app/mod.rs
//
// Application layer: session state and orchestration of the core pipeline.
// Dependencies: core, platform, util.

pub mod session;
