//! In-memory catalog — useful for testing, fixtures, and loaded snapshots.

use async_trait::async_trait;
use coursepilot_core::catalog::{
    CourseCatalogProvider, ProfileProvider, SectionBatch, SectionCatalogProvider,
};
use coursepilot_core::{
    CatalogError, CourseCode, CourseRecord, Diagnostic, RequirementTemplate, Section, UserProfile,
};
use std::collections::{BTreeSet, HashMap};
use tokio::sync::RwLock;
use tracing::debug;

/// A course slot: either a usable record or the reason it is unusable.
#[derive(Debug, Clone)]
enum CourseEntry {
    Valid(CourseRecord),
    Malformed(String),
}

/// A section refused at load time, kept so lookups can report it.
#[derive(Debug, Clone)]
struct RejectedSection {
    term: String,
    campus: String,
    course: CourseCode,
    diagnostic: Diagnostic,
}

/// An in-memory catalog implementing every provider trait.
///
/// Builder methods (`with_*`) are for setup; the `insert_*` methods allow
/// mutation behind a shared reference.
pub struct InMemoryCatalog {
    courses: RwLock<HashMap<CourseCode, CourseEntry>>,
    majors: RwLock<HashMap<String, RequirementTemplate>>,
    sections: RwLock<Vec<Section>>,
    rejected: RwLock<Vec<RejectedSection>>,
    profiles: RwLock<HashMap<String, UserProfile>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self {
            courses: RwLock::new(HashMap::new()),
            majors: RwLock::new(HashMap::new()),
            sections: RwLock::new(Vec::new()),
            rejected: RwLock::new(Vec::new()),
            profiles: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_course(mut self, record: CourseRecord) -> Self {
        self.courses
            .get_mut()
            .insert(record.code.clone(), CourseEntry::Valid(record));
        self
    }

    /// Register a course the catalog knows about but cannot use.
    pub fn with_malformed_course(mut self, code: CourseCode, reason: impl Into<String>) -> Self {
        self.courses
            .get_mut()
            .insert(code, CourseEntry::Malformed(reason.into()));
        self
    }

    pub fn with_major(mut self, template: RequirementTemplate) -> Self {
        self.majors
            .get_mut()
            .insert(template.major_id.clone(), template);
        self
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.get_mut().push(section);
        self
    }

    /// Record a section that failed validation at load time.
    pub fn with_rejected_section(
        mut self,
        term: impl Into<String>,
        campus: impl Into<String>,
        diagnostic: Diagnostic,
    ) -> Self {
        let course = match &diagnostic {
            Diagnostic::RejectedSection { course, .. } => course.clone(),
            _ => CourseCode::new(""),
        };
        self.rejected.get_mut().push(RejectedSection {
            term: term.into(),
            campus: campus.into(),
            course,
            diagnostic,
        });
        self
    }

    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.profiles
            .get_mut()
            .insert(profile.user_id.clone(), profile);
        self
    }

    pub async fn insert_course(&self, record: CourseRecord) {
        self.courses
            .write()
            .await
            .insert(record.code.clone(), CourseEntry::Valid(record));
    }

    pub async fn insert_major(&self, template: RequirementTemplate) {
        self.majors
            .write()
            .await
            .insert(template.major_id.clone(), template);
    }

    pub async fn insert_section(&self, section: Section) {
        self.sections.write().await.push(section);
    }

    pub async fn insert_profile(&self, profile: UserProfile) {
        self.profiles
            .write()
            .await
            .insert(profile.user_id.clone(), profile);
    }

    pub async fn course_count(&self) -> usize {
        self.courses.read().await.len()
    }

    pub async fn section_count(&self) -> usize {
        self.sections.read().await.len()
    }

    /// All major ids, sorted.
    pub async fn major_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.majors.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn matches_filter(
    section_term: &str,
    section_campus: &str,
    section_course: &CourseCode,
    term: &str,
    campuses: &BTreeSet<String>,
    course_codes: &BTreeSet<CourseCode>,
) -> bool {
    section_term == term.trim()
        && (campuses.is_empty() || campuses.contains(section_campus))
        && course_codes.contains(section_course)
}

#[async_trait]
impl CourseCatalogProvider for InMemoryCatalog {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get_course(&self, code: &CourseCode) -> Result<Option<CourseRecord>, CatalogError> {
        match self.courses.read().await.get(code) {
            Some(CourseEntry::Valid(record)) => Ok(Some(record.clone())),
            Some(CourseEntry::Malformed(reason)) => {
                Err(CatalogError::malformed("course", format!("{code}: {reason}")))
            }
            None => Ok(None),
        }
    }

    async fn get_major(&self, major_id: &str) -> Result<Option<RequirementTemplate>, CatalogError> {
        Ok(self.majors.read().await.get(major_id.trim()).cloned())
    }
}

#[async_trait]
impl SectionCatalogProvider for InMemoryCatalog {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get_sections(
        &self,
        term: &str,
        campuses: &BTreeSet<String>,
        course_codes: &BTreeSet<CourseCode>,
    ) -> Result<SectionBatch, CatalogError> {
        let mut batch = SectionBatch::default();

        for section in self.sections.read().await.iter() {
            if !matches_filter(
                &section.term,
                &section.campus,
                &section.course,
                term,
                campuses,
                course_codes,
            ) {
                continue;
            }
            match section.validate() {
                Ok(()) => batch.sections.push(section.clone()),
                Err(e) => batch.rejected.push(Diagnostic::RejectedSection {
                    crn: section.crn.clone(),
                    course: section.course.clone(),
                    reason: e.to_string(),
                }),
            }
        }

        for rejected in self.rejected.read().await.iter() {
            if matches_filter(
                &rejected.term,
                &rejected.campus,
                &rejected.course,
                term,
                campuses,
                course_codes,
            ) {
                batch.rejected.push(rejected.diagnostic.clone());
            }
        }

        debug!(
            term,
            accepted = batch.sections.len(),
            rejected = batch.rejected.len(),
            "In-memory section lookup"
        );
        Ok(batch)
    }
}

#[async_trait]
impl ProfileProvider for InMemoryCatalog {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get_user_profile(&self, user_id: &str) -> Result<Option<UserProfile>, CatalogError> {
        Ok(self.profiles.read().await.get(user_id.trim()).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursepilot_core::{RequisiteExpression, parse_days, parse_time_of_day};

    fn section(course: &str, crn: &str, campus: &str, start: &str, end: &str) -> Section {
        Section::new(
            course,
            crn,
            parse_days("MW").unwrap(),
            parse_time_of_day(start).unwrap(),
            parse_time_of_day(end).unwrap(),
            3,
        )
        .with_term("2026 Spring")
        .with_campus(campus)
    }

    fn codes(list: &[&str]) -> BTreeSet<CourseCode> {
        list.iter().map(|c| CourseCode::new(c)).collect()
    }

    #[tokio::test]
    async fn course_lookup_normalizes() {
        let catalog = InMemoryCatalog::new().with_course(
            CourseRecord::new("COP3530", 3).with_prereqs(RequisiteExpression::parse("COP3337")),
        );
        let found = catalog.get_course(&CourseCode::new("cop 3530")).await.unwrap();
        assert!(found.is_some());
        assert!(
            catalog
                .get_course(&CourseCode::new("COP9999"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn malformed_course_is_an_error() {
        let catalog = InMemoryCatalog::new()
            .with_malformed_course(CourseCode::new("BAD1000"), "credits missing");
        let err = catalog
            .get_course(&CourseCode::new("BAD1000"))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Malformed { .. }));
    }

    #[tokio::test]
    async fn section_filter_by_term_campus_and_course() {
        let catalog = InMemoryCatalog::new()
            .with_section(section("COP3337", "1", "MMC", "10:00", "11:15"))
            .with_section(section("COP3337", "2", "BBC", "10:00", "11:15"))
            .with_section(section("COP3530", "3", "Online", "12:00", "13:15"))
            .with_section(section("COT3100", "4", "MMC", "09:00", "09:50"));

        let campuses = BTreeSet::from(["MMC".to_string(), "Online".to_string()]);
        let batch = catalog
            .get_sections("2026 Spring", &campuses, &codes(&["COP3337", "COP3530"]))
            .await
            .unwrap();
        let crns: Vec<&str> = batch.sections.iter().map(|s| s.crn.as_str()).collect();
        assert_eq!(crns, vec!["1", "3"]);

        let other_term = catalog
            .get_sections("2026 Fall", &campuses, &codes(&["COP3337"]))
            .await
            .unwrap();
        assert!(other_term.sections.is_empty());

        let any_campus = catalog
            .get_sections("2026 Spring", &BTreeSet::new(), &codes(&["COP3337"]))
            .await
            .unwrap();
        assert_eq!(any_campus.sections.len(), 2);
    }

    #[tokio::test]
    async fn invalid_sections_are_reported_not_returned() {
        let catalog = InMemoryCatalog::new()
            .with_section(section("COP3337", "1", "MMC", "10:00", "11:15"))
            .with_section(section("COP3337", "2", "MMC", "11:15", "10:00"));
        let batch = catalog
            .get_sections("2026 Spring", &BTreeSet::new(), &codes(&["COP3337"]))
            .await
            .unwrap();
        assert_eq!(batch.sections.len(), 1);
        assert_eq!(batch.rejected.len(), 1);
    }

    #[tokio::test]
    async fn profiles_and_majors() {
        let catalog = InMemoryCatalog::new()
            .with_major(RequirementTemplate::empty("COMPSC:BS"))
            .with_profile(UserProfile {
                user_id: "u1".into(),
                major: "CS".into(),
                completed_courses: vec![CourseCode::new("COP2210")],
            });
        assert!(catalog.get_major("COMPSC:BS").await.unwrap().is_some());
        assert!(catalog.get_major("MATH:BS").await.unwrap().is_none());
        assert_eq!(
            catalog.get_user_profile("u1").await.unwrap().unwrap().major,
            "CS"
        );
        assert_eq!(catalog.major_ids().await, vec!["COMPSC:BS".to_string()]);
    }

    #[tokio::test]
    async fn insert_after_construction() {
        let catalog = InMemoryCatalog::new();
        catalog.insert_course(CourseRecord::new("COP2210", 4)).await;
        catalog
            .insert_section(section("COP2210", "7", "MMC", "08:00", "09:15"))
            .await;
        assert_eq!(catalog.course_count().await, 1);
        assert_eq!(catalog.section_count().await, 1);
    }
}
