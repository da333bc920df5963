//! Non-fatal findings reported alongside a best-effort result.

use crate::code::CourseCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a course record was replaced by the degraded default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cause", content = "detail", rename_all = "snake_case")]
pub enum DegradeReason {
    NotFound,
    Malformed(String),
}

/// A warning attached to an eligibility or scheduling result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The catalog had no requirement template for the major.
    UnknownMajor { major_id: String },

    /// The major's template could not be decoded; an empty one was assumed.
    MalformedMajor { major_id: String, reason: String },

    /// A course record was missing or unusable; defaults were substituted.
    DegradedRecord { code: CourseCode, reason: DegradeReason },

    /// A section was excluded before scheduling.
    RejectedSection {
        crn: String,
        course: CourseCode,
        reason: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownMajor { major_id } => {
                write!(f, "no requirement template for major {major_id}")
            }
            Diagnostic::MalformedMajor { major_id, reason } => {
                write!(f, "requirement template for major {major_id} is malformed ({reason})")
            }
            Diagnostic::DegradedRecord { code, reason } => match reason {
                DegradeReason::NotFound => {
                    write!(f, "{code}: not in catalog, assuming defaults")
                }
                DegradeReason::Malformed(detail) => {
                    write!(f, "{code}: malformed record ({detail}), assuming defaults")
                }
            },
            Diagnostic::RejectedSection { crn, course, reason } => {
                write!(f, "section {crn} ({course}) rejected: {reason}")
            }
        }
    }
}
