//! Bundled sample catalog: a slice of the Computer Science B.S. with a
//! handful of Spring 2026 sections. Used by `catalog.source = "sample"`
//! and by demos.

use coursepilot_core::CatalogError;

use crate::file::FileCatalog;
use crate::wire::IngestOptions;

pub const SAMPLE_TERM: &str = "2026 Spring";

pub const SAMPLE_CATALOG_JSON: &str = r#"{
  "courses": [
    {"code": "MAC1105", "name": "College Algebra", "credits": 3},
    {"code": "MAC1140", "name": "PreCalc Algebra", "credits": 3, "prereqs": ["MAC1105"]},
    {"code": "MAC1114", "name": "Trigonometry", "credits": 4, "prereqs": ["MAC1105"]},
    {"code": "MAC2311", "name": "Calc I", "credits": 4, "prereqs": ["MAC1140", "MAC1114"]},
    {"code": "MAC2312", "name": "Calc II", "credits": 4, "prereqs": ["MAC2311"]},
    {"code": "ENC1101", "name": "Writing and Rhetoric I", "credits": 3},
    {"code": "ENC1102", "name": "Writing and Rhetoric II", "credits": 3, "prereqs": "ENC1101"},
    {"code": "CGS1920", "name": "Intro to Computing", "credits": 1},
    {"code": "COP2210", "name": "Programming I", "credits": 4},
    {"code": "COP3337", "name": "Programming II", "credits": 3, "prereqs": "COP2210"},
    {"code": "COP3530", "name": "Data Structures", "credits": 3, "prereqs": "COP3337,COT3100|MAD2104"},
    {"code": "COT3100", "name": "Discrete Structures", "credits": 3, "prereqs": "MAC1105|MAC1140"},
    {"code": "CDA3102", "name": "Computer Architecture", "credits": 3, "prereqs": "COP2210"},
    {"code": "BSC2010", "name": "Gen Bio I", "credits": 3, "coreqs": "BSC2010L"},
    {"code": "BSC2010L", "name": "Gen Bio I Lab", "credits": 1, "coreqs": "BSC2010"}
  ],
  "majors": [
    {
      "major_id": "COMPSC:BS",
      "name": "Bachelor of Science in Computer Science",
      "required_courses": [
        "MAC1105", "ENC1101", "ENC1102", "MAC1140", "MAC1114", "MAC2311", "MAC2312",
        "CGS1920", "COP2210", "COP3337", "COT3100", "CDA3102", "COP3530",
        "BSC2010", "BSC2010L"
      ]
    }
  ],
  "sections": [
    {"course": "COP3337", "term": "2026 Spring", "campus": "MMC", "crn": "80101", "days": "MW", "start": "10:00", "end": "11:15", "credits": 3},
    {"course": "COP3337", "term": "2026 Spring", "campus": "Online", "crn": "80102", "days": "TR", "start": "17:00", "end": "18:15", "credits": 3},
    {"course": "COT3100", "term": "2026 Spring", "campus": "MMC", "crn": "80201", "days": "TR", "start": "09:30", "end": "10:45", "credits": 3},
    {"course": "COT3100", "term": "2026 Spring", "campus": "MMC", "crn": "80202", "days": "MW", "start": "10:00", "end": "11:15", "credits": 3},
    {"course": "CDA3102", "term": "2026 Spring", "campus": "MMC", "crn": "80301", "days": "MW", "start": "12:30", "end": "13:45", "credits": 3},
    {"course": "CDA3102", "term": "2026 Spring", "campus": "BBC", "crn": "80302", "days": "F", "start": "09:00", "end": "11:45", "credits": 3},
    {"course": "ENC1102", "term": "2026 Spring", "campus": "Online", "crn": "80401", "days": "TR", "start": "11:00", "end": "12:15", "credits": 3},
    {"course": "MAC1140", "term": "2026 Spring", "campus": "MMC", "crn": "80501", "days": "MWF", "start": "08:00", "end": "08:50", "credits": 3},
    {"course": "MAC1114", "term": "2026 Spring", "campus": "MMC", "crn": "80601", "days": "TR", "start": "08:00", "end": "09:15", "credits": 4},
    {"course": "CGS1920", "term": "2026 Spring", "campus": "MMC", "crn": "80701", "days": "F", "start": "13:00", "end": "13:50", "credits": 1},
    {"course": "BSC2010", "term": "2026 Spring", "campus": "MMC", "crn": "80801", "days": "MW", "start": "14:00", "end": "15:15", "credits": 3},
    {"course": "BSC2010L", "term": "2026 Spring", "campus": "MMC", "crn": "80802", "days": "W", "start": "15:30", "end": "17:20", "credits": 1}
  ],
  "users": [
    {"user_id": "demo", "major": "CS", "taken_courses": ["MAC1105", "ENC1101", "COP2210"]}
  ]
}"#;

/// Load the bundled sample catalog.
pub fn sample_catalog(options: &IngestOptions) -> Result<FileCatalog, CatalogError> {
    FileCatalog::from_json(SAMPLE_CATALOG_JSON, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursepilot_core::catalog::{CourseCatalogProvider, ProfileProvider};
    use coursepilot_core::CourseCode;

    #[tokio::test]
    async fn sample_catalog_loads_cleanly() {
        let catalog = sample_catalog(&IngestOptions::default()).unwrap();
        assert!(catalog.load_warnings().is_empty());

        let major = catalog.get_major("COMPSC:BS").await.unwrap().unwrap();
        assert_eq!(major.buckets.len(), 1);
        for code in &major.buckets[0].courses {
            assert!(
                catalog.get_course(code).await.unwrap().is_some(),
                "sample major references {code} which the sample catalog lacks"
            );
        }

        let demo = catalog.get_user_profile("demo").await.unwrap().unwrap();
        assert!(demo.completed_courses.contains(&CourseCode::new("COP2210")));
    }
}
