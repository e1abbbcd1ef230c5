//! High-level operations wiring CLI commands to the closure engine, the
//! package index and the EVR comparators.

pub mod ops_compare;
pub mod ops_obsolete;
