//! Shared utilities for obsoleter.
//!
//! This crate provides cross-cutting concerns used by all other obsoleter
//! crates: the error type, filesystem helpers, process spawning for external
//! tools, and terminal status lines.

pub mod errors;
pub mod fs;
pub mod process;
pub mod progress;
