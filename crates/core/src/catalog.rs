//! Catalog traits — the collaborators the engine reads from.
//!
//! The engine never stores or fetches data on its own; whatever persistence
//! or transport layer surrounds it implements these traits.
//!
//! Implementations: in-memory fixture, JSON snapshot file, HTTP record service.

use async_trait::async_trait;
use std::collections::BTreeSet;

use crate::code::CourseCode;
use crate::course::{CourseRecord, RequirementTemplate, UserProfile};
use crate::diagnostic::Diagnostic;
use crate::error::CatalogError;
use crate::section::Section;

/// Sections returned by a provider, plus the ones it refused at its boundary.
#[derive(Debug, Clone, Default)]
pub struct SectionBatch {
    pub sections: Vec<Section>,
    pub rejected: Vec<Diagnostic>,
}

impl SectionBatch {
    pub fn new(sections: Vec<Section>) -> Self {
        Self {
            sections,
            rejected: Vec::new(),
        }
    }
}

/// Per-code course records and per-major requirement templates.
#[async_trait]
pub trait CourseCatalogProvider: Send + Sync {
    /// The provider name (e.g., "memory", "file", "http").
    fn name(&self) -> &str;

    /// Look up one course. `Ok(None)` means the catalog has no such course;
    /// `Err(CatalogError::Malformed { .. })` means it has one that cannot be used.
    async fn get_course(&self, code: &CourseCode) -> Result<Option<CourseRecord>, CatalogError>;

    /// Look up the requirement template of a major.
    async fn get_major(&self, major_id: &str) -> Result<Option<RequirementTemplate>, CatalogError>;
}

/// Offered sections for a term.
#[async_trait]
pub trait SectionCatalogProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Sections in `term` at any of `campuses` (empty = any campus) for any
    /// of `course_codes`.
    async fn get_sections(
        &self,
        term: &str,
        campuses: &BTreeSet<String>,
        course_codes: &BTreeSet<CourseCode>,
    ) -> Result<SectionBatch, CatalogError>;
}

/// Student profiles, used only by the orchestration layer.
#[async_trait]
pub trait ProfileProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn get_user_profile(&self, user_id: &str) -> Result<Option<UserProfile>, CatalogError>;
}
