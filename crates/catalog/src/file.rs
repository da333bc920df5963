//! File-based catalog — a whole catalog snapshot in one JSON document.
//!
//! The file holds the same documents the record service serves:
//!
//! ```json
//! {
//!   "courses":  [{"code": "COP2210", "credits": 4}],
//!   "majors":   [{"major_id": "COMPSC:BS", "required_courses": ["COP2210"]}],
//!   "sections": [{"course": "COP2210", "term": "2026 Spring", "campus": "MMC",
//!                 "crn": "80001", "days": "MW", "start": "09:00", "end": "10:15", "credits": 4}],
//!   "users":    [{"user_id": "u1", "major": "CS", "taken_courses": []}]
//! }
//! ```
//!
//! The snapshot is validated once at load time. Malformed courses and
//! invalid sections are kept as diagnostics rather than failing the load.

use async_trait::async_trait;
use coursepilot_core::catalog::{
    CourseCatalogProvider, ProfileProvider, SectionBatch, SectionCatalogProvider,
};
use coursepilot_core::{
    CatalogError, CourseCode, CourseRecord, Diagnostic, RequirementTemplate, UserProfile,
};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::in_memory::InMemoryCatalog;
use crate::wire::{IngestOptions, WireSnapshot, course_from_value, section_from_value};

/// A read-only catalog loaded from a JSON snapshot.
pub struct FileCatalog {
    path: PathBuf,
    inner: InMemoryCatalog,
    load_warnings: Vec<Diagnostic>,
}

impl FileCatalog {
    /// Read and validate the snapshot at `path`.
    pub fn open(path: impl AsRef<Path>, options: &IngestOptions) -> Result<Self, CatalogError> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            CatalogError::NotConfigured(format!(
                "cannot read catalog snapshot {}: {e}",
                path.display()
            ))
        })?;
        let mut catalog = Self::from_json(&content, options)?;
        catalog.path = path;
        Ok(catalog)
    }

    /// Build from snapshot JSON text.
    pub fn from_json(content: &str, options: &IngestOptions) -> Result<Self, CatalogError> {
        let snapshot: WireSnapshot = serde_json::from_str(content)
            .map_err(|e| CatalogError::malformed("snapshot", e.to_string()))?;
        Ok(Self::from_snapshot(snapshot, options))
    }

    fn from_snapshot(snapshot: WireSnapshot, options: &IngestOptions) -> Self {
        let mut inner = InMemoryCatalog::new();
        let mut load_warnings = Vec::new();

        for value in snapshot.courses {
            let Some(raw_code) = value.get("code").and_then(|c| c.as_str()).map(str::to_string)
            else {
                warn!("Skipping course document without a code");
                continue;
            };
            match course_from_value(value, options.empty_groups) {
                Ok(record) => inner = inner.with_course(record),
                Err(e) => {
                    let code = CourseCode::new(&raw_code);
                    warn!(code = %code, error = %e, "Malformed course in snapshot");
                    inner = inner.with_malformed_course(code, e.to_string());
                }
            }
        }

        for major in snapshot.majors {
            inner = inner.with_major(major.into_template(options));
        }

        for value in snapshot.sections {
            let term = string_field(&value, "term");
            let campus = string_field(&value, "campus");
            match section_from_value(value) {
                Ok(section) => inner = inner.with_section(section),
                Err(diagnostic) => {
                    warn!(%diagnostic, "Invalid section in snapshot");
                    load_warnings.push(diagnostic.clone());
                    inner = inner.with_rejected_section(term, campus, diagnostic);
                }
            }
        }

        for user in snapshot.users {
            inner = inner.with_profile(user.into_profile());
        }

        debug!(warnings = load_warnings.len(), "Catalog snapshot loaded");
        Self {
            path: PathBuf::new(),
            inner,
            load_warnings,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sections rejected while loading the snapshot.
    pub fn load_warnings(&self) -> &[Diagnostic] {
        &self.load_warnings
    }

    pub fn catalog(&self) -> &InMemoryCatalog {
        &self.inner
    }
}

fn string_field(value: &serde_json::Value, key: &str) -> String {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

#[async_trait]
impl CourseCatalogProvider for FileCatalog {
    fn name(&self) -> &str {
        "file"
    }

    async fn get_course(&self, code: &CourseCode) -> Result<Option<CourseRecord>, CatalogError> {
        self.inner.get_course(code).await
    }

    async fn get_major(&self, major_id: &str) -> Result<Option<RequirementTemplate>, CatalogError> {
        self.inner.get_major(major_id).await
    }
}

#[async_trait]
impl SectionCatalogProvider for FileCatalog {
    fn name(&self) -> &str {
        "file"
    }

    async fn get_sections(
        &self,
        term: &str,
        campuses: &BTreeSet<String>,
        course_codes: &BTreeSet<CourseCode>,
    ) -> Result<SectionBatch, CatalogError> {
        self.inner.get_sections(term, campuses, course_codes).await
    }
}

#[async_trait]
impl ProfileProvider for FileCatalog {
    fn name(&self) -> &str {
        "file"
    }

    async fn get_user_profile(&self, user_id: &str) -> Result<Option<UserProfile>, CatalogError> {
        self.inner.get_user_profile(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SNAPSHOT: &str = r#"{
        "courses": [
            {"code": "COP2210", "name": "Programming I", "credits": 4},
            {"code": "COP 3337", "credits": 3, "prereqs": "COP2210"},
            {"code": "COP3530", "credits": "three"},
            {"name": "no code at all", "credits": 3}
        ],
        "majors": [
            {"major_id": "COMPSC:BS", "required_courses": ["COP2210", "COP3337", "COP3530"]}
        ],
        "sections": [
            {"course": "COP3337", "term": "2026 Spring", "campus": "MMC", "crn": "80001",
             "days": "MW", "start": "10:00", "end": "11:15", "credits": 3},
            {"course": "COP3337", "term": "2026 Spring", "campus": "MMC", "crn": "80002",
             "days": "MW", "start": "12:00", "end": "11:00", "credits": 3}
        ],
        "users": [
            {"user_id": "u1", "major": "CS", "taken_courses": ["COP 2210"]}
        ]
    }"#;

    #[tokio::test]
    async fn open_snapshot_from_disk() {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(SNAPSHOT.as_bytes()).unwrap();

        let catalog = FileCatalog::open(tmp.path(), &IngestOptions::default()).unwrap();
        assert_eq!(catalog.path(), tmp.path());

        let record = catalog
            .get_course(&CourseCode::new("COP3337"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.prereqs.to_string(), "COP2210");

        let profile = catalog.get_user_profile("u1").await.unwrap().unwrap();
        assert_eq!(profile.completed_courses, vec![CourseCode::new("COP2210")]);
    }

    #[tokio::test]
    async fn malformed_course_surfaces_as_malformed() {
        let catalog = FileCatalog::from_json(SNAPSHOT, &IngestOptions::default()).unwrap();
        let err = catalog
            .get_course(&CourseCode::new("COP3530"))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Malformed { .. }));
        assert_eq!(catalog.catalog().course_count().await, 3);
    }

    #[tokio::test]
    async fn invalid_sections_become_rejections() {
        let catalog = FileCatalog::from_json(SNAPSHOT, &IngestOptions::default()).unwrap();
        assert_eq!(catalog.load_warnings().len(), 1);

        let batch = catalog
            .get_sections(
                "2026 Spring",
                &BTreeSet::from(["MMC".to_string()]),
                &BTreeSet::from([CourseCode::new("COP3337")]),
            )
            .await
            .unwrap();
        assert_eq!(batch.sections.len(), 1);
        assert_eq!(batch.rejected.len(), 1);
    }

    #[test]
    fn missing_file_is_not_configured() {
        let result = FileCatalog::open("/nonexistent/catalog.json", &IngestOptions::default());
        assert!(matches!(result, Err(CatalogError::NotConfigured(_))));
    }

    #[test]
    fn garbage_snapshot_is_malformed() {
        let result = FileCatalog::from_json("{not json", &IngestOptions::default());
        assert!(matches!(result, Err(CatalogError::Malformed { .. })));
    }
}
