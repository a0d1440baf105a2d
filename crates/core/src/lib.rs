//! tracewalk-core
//!
//! Core library for correlating a recorded execution trace against a static
//! binary's known instruction addresses.
//!
//! This crate recovers the ASLR slide applied to the binary at load time,
//! builds a bidirectional address remapping between binary-space and
//! trace-space, and extracts the boundaries where execution left the mapped
//! binary image for unmapped memory (JIT output, shellcode, other modules).
//!
//! The goal is to keep all substantive logic here so it is fully testable and
//! reusable from multiple frontends (CLI, trace viewers, etc.).

pub mod analysis;
pub mod config;
pub mod model;
pub mod sources;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
