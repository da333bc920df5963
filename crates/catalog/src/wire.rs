//! Wire shapes of the record service and snapshot files.
//!
//! Everything that crosses the provider boundary is validated and
//! normalised here, so the engine only ever sees well-formed value types.
//! The shapes follow the record service's JSON documents:
//!
//! ```json
//! {"code": "COP 3530", "name": "Data Structures", "credits": 3, "prereqs": "COP3337"}
//! {"code": "MAC2311", "credits": 4, "prereqs": ["MAC1140", "MAC1114"]}
//! {"major_id": "COMPSC:BS", "required_courses": ["COP2210", {"code": "COP3337"}]}
//! {"course": "COP3530", "term": "2026 Spring", "campus": "MMC", "crn": 80123,
//!  "days": "MW", "start": "10:00", "end": "11:15", "credits": 3}
//! ```

use coursepilot_config::AppConfig;
use coursepilot_core::{
    Bucket, CatalogError, CourseCode, CourseRecord, Diagnostic, EmptyGroupPolicy,
    RequirementTemplate, RequisiteExpression, Section, SectionError, UserProfile, Weekday,
    parse_days, parse_time_of_day,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Knobs applied while converting wire records into domain values.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub empty_groups: EmptyGroupPolicy,
    pub default_bucket_id: String,
    pub default_bucket_choose: u32,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl IngestOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            empty_groups: config.requisites.empty_groups,
            default_bucket_id: config.eligibility.default_bucket_id.clone(),
            default_bucket_choose: config.eligibility.default_bucket_choose,
        }
    }
}

/// A requisite as stored: either an expression string, or a list whose
/// entries are AND-groups (each entry may itself contain `|` alternatives).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireRequisite {
    Text(String),
    Groups(Vec<String>),
}

impl WireRequisite {
    pub fn to_expression(&self, policy: EmptyGroupPolicy) -> RequisiteExpression {
        match self {
            WireRequisite::Text(text) => RequisiteExpression::parse_with(text, policy),
            WireRequisite::Groups(groups) => {
                RequisiteExpression::parse_with(&groups.join(","), policy)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireCourse {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub credits: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prereqs: Option<WireRequisite>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coreqs: Option<WireRequisite>,
}

impl WireCourse {
    pub fn into_record(self, policy: EmptyGroupPolicy) -> Result<CourseRecord, CatalogError> {
        let code = CourseCode::new(&self.code);
        if !code.is_well_formed() {
            return Err(CatalogError::malformed(
                "course",
                format!("invalid course code '{}'", self.code),
            ));
        }

        let credits = match &self.credits {
            Some(value) => value
                .as_u64()
                .filter(|c| *c > 0)
                .and_then(|c| u32::try_from(c).ok())
                .ok_or_else(|| {
                    CatalogError::malformed(
                        "course",
                        format!("{code}: credits must be a positive integer, got {value}"),
                    )
                })?,
            None => {
                return Err(CatalogError::malformed(
                    "course",
                    format!("{code}: credits missing"),
                ));
            }
        };

        let prereqs = self
            .prereqs
            .as_ref()
            .map(|r| r.to_expression(policy))
            .unwrap_or_default();
        let coreqs = self
            .coreqs
            .as_ref()
            .map(|r| r.to_expression(policy))
            .unwrap_or_default();

        Ok(CourseRecord {
            code,
            title: self.name.filter(|n| !n.trim().is_empty()),
            credits,
            prereqs,
            coreqs,
        })
    }
}

/// Decode a raw course document, reporting any shape problem as `Malformed`.
pub fn course_from_value(
    value: serde_json::Value,
    policy: EmptyGroupPolicy,
) -> Result<CourseRecord, CatalogError> {
    let wire: WireCourse = serde_json::from_value(value)
        .map_err(|e| CatalogError::malformed("course", e.to_string()))?;
    wire.into_record(policy)
}

/// Entries of `required_courses` are either bare codes or course documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireRequiredCourse {
    Code(String),
    Doc { code: String },
}

impl WireRequiredCourse {
    fn code(&self) -> CourseCode {
        match self {
            WireRequiredCourse::Code(code) | WireRequiredCourse::Doc { code } => {
                CourseCode::new(code)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireBucket {
    pub id: String,
    #[serde(default)]
    pub choose: u32,
    #[serde(default)]
    pub courses: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMajor {
    pub major_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub required_courses: Vec<WireRequiredCourse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buckets: Option<Vec<WireBucket>>,
}

impl WireMajor {
    /// Explicit buckets win; otherwise the flat `required_courses` list
    /// becomes a single default bucket.
    pub fn into_template(self, options: &IngestOptions) -> RequirementTemplate {
        let buckets = match self.buckets {
            Some(buckets) if !buckets.is_empty() => buckets
                .into_iter()
                .map(|b| Bucket {
                    id: b.id,
                    choose: b.choose,
                    courses: keep_codes(b.courses.iter().map(CourseCode::new)),
                })
                .collect(),
            _ if self.required_courses.is_empty() => Vec::new(),
            _ => vec![Bucket {
                id: options.default_bucket_id.clone(),
                choose: options.default_bucket_choose,
                courses: keep_codes(self.required_courses.iter().map(WireRequiredCourse::code)),
            }],
        };

        RequirementTemplate {
            major_id: self.major_id.trim().to_string(),
            name: self.name,
            buckets,
        }
    }
}

fn keep_codes(codes: impl Iterator<Item = CourseCode>) -> Vec<CourseCode> {
    codes.filter(|c| !c.is_empty()).collect()
}

/// CRNs arrive as strings or numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Text(String),
    Number(u64),
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireId::Text(s) => f.write_str(s.trim()),
            WireId::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Meeting days as a token list (`["Mon", "Wed"]`) or a compact pattern (`"MW"`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireDays {
    List(Vec<String>),
    Compact(String),
}

impl Default for WireDays {
    fn default() -> Self {
        WireDays::List(Vec::new())
    }
}

impl WireDays {
    fn to_days(&self) -> Result<BTreeSet<Weekday>, SectionError> {
        match self {
            WireDays::List(tokens) => {
                let mut days = BTreeSet::new();
                for token in tokens {
                    days.extend(parse_days(token)?);
                }
                Ok(days)
            }
            WireDays::Compact(text) if text.trim().is_empty() => Ok(BTreeSet::new()),
            WireDays::Compact(text) => parse_days(text),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireSection {
    pub course: String,
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub campus: String,
    pub crn: WireId,
    #[serde(default)]
    pub days: WireDays,
    pub start: String,
    pub end: String,
    pub credits: u32,
}

impl WireSection {
    pub fn into_section(self) -> Result<Section, SectionError> {
        let section = Section {
            course: CourseCode::new(&self.course),
            term: self.term.trim().to_string(),
            campus: self.campus.trim().to_string(),
            crn: self.crn.to_string(),
            days: self.days.to_days()?,
            start: parse_time_of_day(&self.start)?,
            end: parse_time_of_day(&self.end)?,
            credits: self.credits,
        };
        section.validate()?;
        Ok(section)
    }
}

/// Decode a raw section document. On failure, returns the diagnostic to
/// report in place of the section.
pub fn section_from_value(value: serde_json::Value) -> Result<Section, Diagnostic> {
    let crn = match value.get("crn") {
        Some(serde_json::Value::String(s)) => s.trim().to_string(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => "unknown".to_string(),
    };
    let course = CourseCode::new(value.get("course").and_then(|c| c.as_str()).unwrap_or(""));

    let wire: WireSection = serde_json::from_value(value).map_err(|e| Diagnostic::RejectedSection {
        crn: crn.clone(),
        course: course.clone(),
        reason: e.to_string(),
    })?;
    wire.into_section().map_err(|e| Diagnostic::RejectedSection {
        crn,
        course,
        reason: e.to_string(),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireUser {
    pub user_id: String,
    #[serde(default)]
    pub major: String,
    #[serde(default, alias = "completed_courses")]
    pub taken_courses: Vec<String>,
}

impl WireUser {
    pub fn into_profile(self) -> UserProfile {
        UserProfile {
            user_id: self.user_id,
            major: self.major.trim().to_string(),
            completed_courses: keep_codes(self.taken_courses.iter().map(CourseCode::new)),
        }
    }
}

/// A whole catalog in one JSON document (the snapshot file format).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireSnapshot {
    #[serde(default)]
    pub courses: Vec<serde_json::Value>,
    #[serde(default)]
    pub majors: Vec<WireMajor>,
    #[serde(default)]
    pub sections: Vec<serde_json::Value>,
    #[serde(default)]
    pub users: Vec<WireUser>,
}
