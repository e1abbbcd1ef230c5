//! Reverse-dependency closure engine and `%obsolete` formatting.
//!
//! [`removed_packages`] walks the legacy releases from the retired
//! capabilities outward and records every dependent that the current release
//! no longer ships. [`format_entries`] turns that map into directives or
//! diagnostics.

pub mod closure;
pub mod directive;
pub mod removed;
pub mod visited;

pub use closure::{removed_packages, ClosureOptions};
pub use directive::{format_entries, FormatOptions, ObsoleteEntry};
pub use removed::RemovedPackages;
