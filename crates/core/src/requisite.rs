//! Prerequisite / corequisite expressions.
//!
//! The textual form is a comma-separated list of AND-groups, each a
//! pipe-separated list of alternatives:
//!
//! ```text
//! COP2210                   one required course
//! MAC1140,MAC1114           both required
//! COP2210,MAC1105|MAC1140   COP2210 and (MAC1105 or MAC1140)
//! ```
//!
//! An empty string means "no requirement" and is always satisfied. A kept
//! empty group (see [`EmptyGroupPolicy::Unsatisfiable`]) renders as a bare
//! `|`, so the canonical text of an unsatisfiable expression is never blank.

use crate::code::CourseCode;
use crate::error::RequisiteError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

const GROUP_SEPARATOR: char = ',';
const OPTION_SEPARATOR: char = '|';

/// How to treat an AND-group that has no options left after trimming.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyGroupPolicy {
    /// Drop the group; it imposes no requirement.
    #[default]
    Drop,
    /// Keep the group; nothing can satisfy it.
    Unsatisfiable,
}

/// An ordered sequence of AND-groups, each a list of OR-options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequisiteExpression {
    groups: Vec<Vec<CourseCode>>,
}

impl RequisiteExpression {
    /// The expression with no groups (always satisfied).
    pub fn none() -> Self {
        Self::default()
    }

    /// Build directly from groups. Options are normalised by `CourseCode`;
    /// duplicate options inside a group collapse.
    pub fn from_groups(groups: impl IntoIterator<Item = Vec<CourseCode>>) -> Self {
        Self {
            groups: groups.into_iter().map(dedup_options).collect(),
        }
    }

    /// Lenient parse with the default [`EmptyGroupPolicy::Drop`].
    pub fn parse(text: &str) -> Self {
        Self::parse_with(text, EmptyGroupPolicy::Drop)
    }

    /// Lenient parse. Never fails: empty tokens are discarded and empty
    /// groups are handled according to `policy`.
    pub fn parse_with(text: &str, policy: EmptyGroupPolicy) -> Self {
        if text.trim().is_empty() {
            return Self::none();
        }

        let mut groups = Vec::new();
        for group in text.split(GROUP_SEPARATOR) {
            let options: Vec<CourseCode> = group
                .split(OPTION_SEPARATOR)
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(CourseCode::new)
                .collect();

            if options.is_empty() {
                match policy {
                    EmptyGroupPolicy::Drop => continue,
                    EmptyGroupPolicy::Unsatisfiable => groups.push(Vec::new()),
                }
            } else {
                groups.push(dedup_options(options));
            }
        }
        Self { groups }
    }

    /// Strict parse for validation tooling.
    ///
    /// Rejects empty groups, empty options and tokens that are not course
    /// codes. Blank input is still valid and yields [`RequisiteExpression::none`].
    pub fn parse_strict(text: &str) -> Result<Self, RequisiteError> {
        if text.trim().is_empty() {
            return Ok(Self::none());
        }

        let mut groups = Vec::new();
        for (gi, group) in text.split(GROUP_SEPARATOR).enumerate() {
            if group.trim().is_empty() {
                return Err(RequisiteError::EmptyGroup { group: gi });
            }
            let mut options = Vec::new();
            for token in group.split(OPTION_SEPARATOR) {
                let token = token.trim();
                if token.is_empty() {
                    return Err(RequisiteError::EmptyOption { group: gi });
                }
                let code = CourseCode::new(token);
                if !code.is_well_formed() {
                    return Err(RequisiteError::InvalidCode {
                        token: token.to_string(),
                    });
                }
                options.push(code);
            }
            groups.push(dedup_options(options));
        }
        Ok(Self { groups })
    }

    pub fn groups(&self) -> &[Vec<CourseCode>] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Every AND-group has at least one option in `completed`.
    pub fn is_satisfied(&self, completed: &BTreeSet<CourseCode>) -> bool {
        self.groups
            .iter()
            .all(|group| group.iter().any(|option| completed.contains(option)))
    }

    /// The AND-groups that `completed` does not satisfy, in order.
    pub fn unmet(&self, completed: &BTreeSet<CourseCode>) -> Vec<Vec<CourseCode>> {
        self.groups
            .iter()
            .filter(|group| !group.iter().any(|option| completed.contains(option)))
            .cloned()
            .collect()
    }

    /// Every course code mentioned anywhere in the expression.
    pub fn referenced(&self) -> BTreeSet<CourseCode> {
        self.groups.iter().flatten().cloned().collect()
    }
}

fn dedup_options(options: Vec<CourseCode>) -> Vec<CourseCode> {
    let mut seen = BTreeSet::new();
    options
        .into_iter()
        .filter(|code| seen.insert(code.clone()))
        .collect()
}

/// Canonical rendering: groups joined by `,`, options by `|`, and an empty
/// group as a lone `|`.
impl fmt::Display for RequisiteExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                write!(f, "{GROUP_SEPARATOR}")?;
            }
            if group.is_empty() {
                write!(f, "{OPTION_SEPARATOR}")?;
                continue;
            }
            for (j, option) in group.iter().enumerate() {
                if j > 0 {
                    write!(f, "{OPTION_SEPARATOR}")?;
                }
                write!(f, "{option}")?;
            }
        }
        Ok(())
    }
}
