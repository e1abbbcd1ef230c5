//! rpm-md package index for obsoleter.
//!
//! Maps release channels to mirrored repodata, parses `repomd.xml` and
//! `primary.xml`, answers the [`PackageIndex`](obsoleter_core::PackageIndex)
//! queries and memoizes built indices per run and on disk.

pub mod cache;
pub mod capability;
pub mod index;
pub mod primary;
pub mod repository;
pub mod source;

pub use cache::{IndexCache, IndexStore};
pub use capability::Capability;
pub use index::RepoIndex;
pub use primary::PackageRecord;
pub use repository::RpmRepository;
pub use source::{IndexSource, RepodataSource, StaticSource};
