//! Offered sections and their weekly meeting pattern.

use crate::code::CourseCode;
use crate::error::SectionError;
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A meeting day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = SectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mon" | "monday" | "m" => Ok(Weekday::Mon),
            "tue" | "tues" | "tuesday" | "tu" | "t" => Ok(Weekday::Tue),
            "wed" | "wednesday" | "w" => Ok(Weekday::Wed),
            "thu" | "thur" | "thurs" | "thursday" | "th" | "r" => Ok(Weekday::Thu),
            "fri" | "friday" | "f" => Ok(Weekday::Fri),
            "sat" | "saturday" | "sa" | "s" => Ok(Weekday::Sat),
            "sun" | "sunday" | "su" | "u" => Ok(Weekday::Sun),
            _ => Err(SectionError::InvalidDay(s.to_string())),
        }
    }
}

impl TryFrom<String> for Weekday {
    type Error = SectionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Weekday> for String {
    fn from(day: Weekday) -> Self {
        day.as_str().to_string()
    }
}

/// Parse a day token: a single day name (`"Mon"`, `"Thursday"`, `"R"`), a
/// compact registrar pattern (`"MWF"`, `"TR"`, `"TuTh"`), or several of
/// either separated by whitespace, `/`, `-` or `,` (`"Mon Wed"`, `"M-W"`).
pub fn parse_days(token: &str) -> Result<BTreeSet<Weekday>, SectionError> {
    let mut days = BTreeSet::new();
    for piece in token
        .split(|c: char| c.is_whitespace() || matches!(c, '/' | '-' | ','))
        .filter(|piece| !piece.is_empty())
    {
        match piece.parse::<Weekday>() {
            Ok(day) => {
                days.insert(day);
            }
            Err(_) => {
                days.extend(parse_compact(piece).ok_or_else(|| invalid_day(token))?);
            }
        }
    }
    if days.is_empty() {
        return Err(invalid_day(token));
    }
    Ok(days)
}

fn invalid_day(token: &str) -> SectionError {
    SectionError::InvalidDay(token.to_string())
}

/// Letter-by-letter reading of a pattern like `"MWF"` or `"TuTh"`.
fn parse_compact(piece: &str) -> Option<BTreeSet<Weekday>> {
    let chars: Vec<char> = piece.chars().map(|c| c.to_ascii_lowercase()).collect();

    let mut days = BTreeSet::new();
    let mut i = 0;
    while i < chars.len() {
        let pair = chars.get(i + 1).map(|next| (chars[i], *next));
        let two = match pair {
            Some(('t', 'h')) => Some(Weekday::Thu),
            Some(('t', 'u')) => Some(Weekday::Tue),
            Some(('s', 'a')) => Some(Weekday::Sat),
            Some(('s', 'u')) => Some(Weekday::Sun),
            _ => None,
        };
        if let Some(day) = two {
            days.insert(day);
            i += 2;
            continue;
        }
        days.insert(chars[i].to_string().parse::<Weekday>().ok()?);
        i += 1;
    }
    Some(days)
}

/// Parse `HH:MM` (or `HH:MM:SS`) into a time of day.
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime, SectionError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| SectionError::InvalidTime(s.to_string()))
}

/// Serde adapter rendering times as `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time_of_day(&raw).map_err(serde::de::Error::custom)
    }
}

/// One offered section of a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub course: CourseCode,
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub campus: String,
    pub crn: String,
    #[serde(default)]
    pub days: BTreeSet<Weekday>,
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    pub credits: u32,
}

impl Section {
    pub fn new(
        course: impl Into<CourseCode>,
        crn: impl Into<String>,
        days: impl IntoIterator<Item = Weekday>,
        start: NaiveTime,
        end: NaiveTime,
        credits: u32,
    ) -> Self {
        Self {
            course: course.into(),
            term: String::new(),
            campus: String::new(),
            crn: crn.into(),
            days: days.into_iter().collect(),
            start,
            end,
            credits,
        }
    }

    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = term.into();
        self
    }

    pub fn with_campus(mut self, campus: impl Into<String>) -> Self {
        self.campus = campus.into();
        self
    }

    /// Check the section invariants: `start < end` and positive credits.
    pub fn validate(&self) -> Result<(), SectionError> {
        if self.start >= self.end {
            return Err(SectionError::InvalidTimeRange {
                crn: self.crn.clone(),
                start: self.start.format("%H:%M").to_string(),
                end: self.end.format("%H:%M").to_string(),
            });
        }
        if self.credits == 0 {
            return Err(SectionError::ZeroCredits {
                crn: self.crn.clone(),
            });
        }
        Ok(())
    }

    /// Two sections overlap iff they share a day and their half-open
    /// intervals `[start, end)` intersect.
    pub fn overlaps(&self, other: &Section) -> bool {
        let same_day = self.days.iter().any(|d| other.days.contains(d));
        let time_conflict = !(self.end <= other.start || other.end <= self.start);
        same_day && time_conflict
    }

    pub fn meets_on_any(&self, days: &BTreeSet<Weekday>) -> bool {
        self.days.iter().any(|d| days.contains(d))
    }

    pub fn starts_before_noon(&self) -> bool {
        self.start.hour() < 12
    }

    /// Compact day pattern, e.g. `MonWed`.
    pub fn days_label(&self) -> String {
        self.days.iter().map(Weekday::as_str).collect()
    }
}
