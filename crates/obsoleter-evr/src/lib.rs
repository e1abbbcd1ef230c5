//! Epoch-version-release ("EVR") algebra.
//!
//! EVRs are handled as opaque strings of the form `[epoch:]version[-release]`.
//! Ordering is delegated to an [`EvrComparator`]: either the native
//! [`rpmvercmp`](vercmp::rpmvercmp) port or the `rpmdev-vercmp` tool. The
//! normalization helpers in [`evr`] never interpret version numbers.

pub mod comparator;
pub mod evr;
pub mod vercmp;

pub use comparator::{ComparatorKind, EvrComparator, NativeVercmp, RpmdevVercmp};
