//! Core data types for obsoleter.
//!
//! This crate defines the package and release model, the [`PackageIndex`]
//! query contract implemented by the repository layer, and the run
//! configuration.
//!
//! It performs no repository I/O of its own.

pub mod config;
pub mod index;
pub mod package;
pub mod release;

pub use index::PackageIndex;
pub use package::Package;
pub use release::{Release, ReleaseSet};
