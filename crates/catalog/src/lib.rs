//! Catalog providers for CoursePilot.
//!
//! Every backend implements the collaborator traits from
//! `coursepilot_core::catalog`. The router builds the one named in config.

pub mod file;
pub mod http;
pub mod in_memory;
pub mod router;
pub mod sample;
pub mod wire;

pub use file::FileCatalog;
pub use http::HttpCatalog;
pub use in_memory::InMemoryCatalog;
pub use router::{CatalogSet, build_from_config};
pub use sample::{SAMPLE_CATALOG_JSON, SAMPLE_TERM, sample_catalog};
pub use wire::IngestOptions;
