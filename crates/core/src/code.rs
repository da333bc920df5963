//! Course codes — the normalised identity of a course.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalised course code (`"COP 3337"` and `"cop3337"` both become `"COP3337"`).
///
/// Construction always normalises, so equality, ordering and hashing
/// compare canonical forms.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CourseCode(String);

impl CourseCode {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(normalize(raw.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the canonical form looks like a course code
    /// (non-empty, alphanumeric apart from an optional lab suffix dash).
    pub fn is_well_formed(&self) -> bool {
        !self.0.is_empty()
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
            && self.0.chars().any(|c| c.is_ascii_alphanumeric())
    }
}

/// Strip all whitespace and upper-case.
fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CourseCode {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for CourseCode {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<CourseCode> for String {
    fn from(code: CourseCode) -> Self {
        code.0
    }
}

impl AsRef<str> for CourseCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
