//! Catalog records: courses, degree requirement templates, student profiles.

use crate::code::CourseCode;
use crate::requisite::RequisiteExpression;
use serde::{Deserialize, Serialize};

/// Credits assumed for a course whose catalog record is missing or malformed.
pub const DEFAULT_CREDITS: u32 = 3;

/// A course as the catalog describes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub code: CourseCode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Always positive.
    pub credits: u32,

    #[serde(default)]
    pub prereqs: RequisiteExpression,

    #[serde(default)]
    pub coreqs: RequisiteExpression,
}

impl CourseRecord {
    pub fn new(code: impl Into<CourseCode>, credits: u32) -> Self {
        Self {
            code: code.into(),
            title: None,
            credits,
            prereqs: RequisiteExpression::none(),
            coreqs: RequisiteExpression::none(),
        }
    }

    /// The synthetic stand-in used when the catalog has nothing usable.
    pub fn degraded(code: CourseCode) -> Self {
        Self::new(code, DEFAULT_CREDITS)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_prereqs(mut self, prereqs: RequisiteExpression) -> Self {
        self.prereqs = prereqs;
        self
    }

    pub fn with_coreqs(mut self, coreqs: RequisiteExpression) -> Self {
        self.coreqs = coreqs;
        self
    }
}

/// A group of required courses within a major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub id: String,

    /// How many courses from this bucket count toward the requirement.
    /// Informational only; resolution does not enforce it.
    #[serde(default)]
    pub choose: u32,

    #[serde(default)]
    pub courses: Vec<CourseCode>,
}

/// The requirement structure of a major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementTemplate {
    pub major_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub buckets: Vec<Bucket>,
}

impl RequirementTemplate {
    /// A template with no buckets. Valid input; nothing is required.
    pub fn empty(major_id: impl Into<String>) -> Self {
        Self {
            major_id: major_id.into(),
            name: None,
            buckets: Vec::new(),
        }
    }

    pub fn course_count(&self) -> usize {
        self.buckets.iter().map(|b| b.courses.len()).sum()
    }
}

/// What the orchestration layer needs to know about a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub major: String,
    #[serde(default)]
    pub completed_courses: Vec<CourseCode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degraded_record_defaults() {
        let record = CourseRecord::degraded(CourseCode::new("XYZ 1000"));
        assert_eq!(record.credits, DEFAULT_CREDITS);
        assert!(record.prereqs.is_empty());
        assert!(record.coreqs.is_empty());
        assert_eq!(record.code.as_str(), "XYZ1000");
    }

    #[test]
    fn empty_template_has_no_courses() {
        let template = RequirementTemplate::empty("UNDECLARED");
        assert!(template.buckets.is_empty());
        assert_eq!(template.course_count(), 0);
    }

    #[test]
    fn course_record_serialization() {
        let record = CourseRecord::new("COP3530", 3)
            .with_title("Data Structures")
            .with_prereqs(RequisiteExpression::parse("COP3337"));
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("COP3530"));
        assert!(json.contains("Data Structures"));
        let back: CourseRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
