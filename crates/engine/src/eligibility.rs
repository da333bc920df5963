//! Eligibility resolution — which required courses remain, and which of
//! those a student can take right now.
//!
//! A pass fetches the major's template, then every distinct outstanding
//! course record exactly once. Missing or malformed records are replaced by
//! [`CourseRecord::degraded`] and reported; any other provider failure
//! aborts the pass.

use coursepilot_config::AppConfig;
use coursepilot_core::catalog::CourseCatalogProvider;
use coursepilot_core::{
    CatalogError, CourseCode, CourseRecord, DegradeReason, Diagnostic, RequirementTemplate,
    RequisiteExpression, ResolutionError,
};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default bound on concurrent course lookups.
pub const DEFAULT_FETCH_CONCURRENCY: usize = 8;

/// One outstanding required course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemainingCourse {
    pub code: CourseCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub credits: u32,
    pub eligible: bool,
    /// Prerequisite AND-groups not yet satisfied. Empty when eligible.
    #[serde(default)]
    pub missing_prereqs: Vec<Vec<CourseCode>>,
    #[serde(default)]
    pub coreqs: RequisiteExpression,
    /// Corequisite groups not satisfied by completed courses. Informational.
    #[serde(default)]
    pub unmet_coreqs: Vec<Vec<CourseCode>>,
    /// The catalog record was missing or malformed; defaults were assumed.
    #[serde(default)]
    pub degraded: bool,
}

/// Outstanding courses of one requirement bucket, in template order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketProgress {
    pub id: String,
    pub choose: u32,
    pub remaining: Vec<RemainingCourse>,
}

/// Result of one resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityResult {
    pub major_id: String,
    pub remaining_by_bucket: Vec<BucketProgress>,
    /// Sorted, duplicate-free.
    pub eligible_now: Vec<CourseCode>,
    #[serde(default)]
    pub warnings: Vec<Diagnostic>,
}

impl EligibilityResult {
    /// Every outstanding code across buckets, sorted and deduplicated.
    pub fn remaining_codes(&self) -> BTreeSet<CourseCode> {
        self.remaining_by_bucket
            .iter()
            .flat_map(|b| b.remaining.iter().map(|c| c.code.clone()))
            .collect()
    }

    pub fn is_eligible(&self, code: &CourseCode) -> bool {
        self.eligible_now.binary_search(code).is_ok()
    }

    /// Look up the resolved entry for `code` in any bucket.
    pub fn course(&self, code: &CourseCode) -> Option<&RemainingCourse> {
        self.remaining_by_bucket
            .iter()
            .flat_map(|b| b.remaining.iter())
            .find(|c| &c.code == code)
    }
}

/// A fetched record, or the degraded stand-in and why.
struct Resolved {
    record: CourseRecord,
    degraded: Option<DegradeReason>,
}

/// Computes remaining and eligible courses for a major.
pub struct EligibilityResolver {
    catalog: Arc<dyn CourseCatalogProvider>,
    fetch_concurrency: usize,
}

impl EligibilityResolver {
    pub fn new(catalog: Arc<dyn CourseCatalogProvider>) -> Self {
        Self {
            catalog,
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
        }
    }

    pub fn from_config(catalog: Arc<dyn CourseCatalogProvider>, config: &AppConfig) -> Self {
        Self::new(catalog).with_fetch_concurrency(config.eligibility.fetch_concurrency)
    }

    /// Bound concurrent lookups; `0` is treated as `1`.
    pub fn with_fetch_concurrency(mut self, limit: usize) -> Self {
        self.fetch_concurrency = limit.max(1);
        self
    }

    pub fn fetch_concurrency(&self) -> usize {
        self.fetch_concurrency
    }

    /// Resolve `major_id` against the courses in `completed`.
    pub async fn resolve(
        &self,
        major_id: &str,
        completed: &BTreeSet<CourseCode>,
    ) -> Result<EligibilityResult, ResolutionError> {
        let major_id = major_id.trim();
        let mut warnings = Vec::new();

        let template = match self.catalog.get_major(major_id).await {
            Ok(Some(template)) => template,
            Ok(None) => {
                warn!(major_id, provider = self.catalog.name(), "Unknown major");
                warnings.push(Diagnostic::UnknownMajor {
                    major_id: major_id.to_string(),
                });
                RequirementTemplate::empty(major_id)
            }
            Err(CatalogError::Malformed { reason, .. }) => {
                warn!(major_id, %reason, "Malformed requirement template, assuming no buckets");
                warnings.push(Diagnostic::MalformedMajor {
                    major_id: major_id.to_string(),
                    reason,
                });
                RequirementTemplate::empty(major_id)
            }
            Err(e) => return Err(e.into()),
        };

        let outstanding: BTreeSet<CourseCode> = template
            .buckets
            .iter()
            .flat_map(|b| b.courses.iter())
            .filter(|code| !completed.contains(*code))
            .cloned()
            .collect();

        let records = self.fetch_all(&outstanding).await?;

        for code in &outstanding {
            if let Some(Resolved {
                degraded: Some(reason),
                ..
            }) = records.get(code)
            {
                warnings.push(Diagnostic::DegradedRecord {
                    code: code.clone(),
                    reason: reason.clone(),
                });
            }
        }

        let mut eligible_now = BTreeSet::new();
        let mut remaining_by_bucket = Vec::with_capacity(template.buckets.len());

        for bucket in &template.buckets {
            let mut seen = BTreeSet::new();
            let mut remaining = Vec::new();

            for code in &bucket.courses {
                if completed.contains(code) || !seen.insert(code.clone()) {
                    continue;
                }
                let Some(resolved) = records.get(code) else {
                    continue;
                };
                let record = &resolved.record;
                let eligible = record.prereqs.is_satisfied(completed);
                debug!(code = %code, eligible, bucket = %bucket.id, "Evaluated course");

                if eligible {
                    eligible_now.insert(code.clone());
                }
                remaining.push(RemainingCourse {
                    code: code.clone(),
                    title: record.title.clone(),
                    credits: record.credits,
                    eligible,
                    missing_prereqs: record.prereqs.unmet(completed),
                    coreqs: record.coreqs.clone(),
                    unmet_coreqs: record.coreqs.unmet(completed),
                    degraded: resolved.degraded.is_some(),
                });
            }

            remaining_by_bucket.push(BucketProgress {
                id: bucket.id.clone(),
                choose: bucket.choose,
                remaining,
            });
        }

        info!(
            major_id = %template.major_id,
            outstanding = outstanding.len(),
            eligible = eligible_now.len(),
            warnings = warnings.len(),
            "Eligibility resolved"
        );

        Ok(EligibilityResult {
            major_id: template.major_id,
            remaining_by_bucket,
            eligible_now: eligible_now.into_iter().collect(),
            warnings,
        })
    }

    /// Fetch each code once, at most `fetch_concurrency` at a time.
    /// Results are consumed in code order so the first failure reported
    /// is the same on every run.
    async fn fetch_all(
        &self,
        codes: &BTreeSet<CourseCode>,
    ) -> Result<HashMap<CourseCode, Resolved>, ResolutionError> {
        let catalog = &self.catalog;
        let fetched: Vec<(CourseCode, Result<Option<CourseRecord>, CatalogError>)> =
            stream::iter(codes.iter().cloned())
                .map(|code| async move {
                    let result = catalog.get_course(&code).await;
                    (code, result)
                })
                .buffered(self.fetch_concurrency)
                .collect()
                .await;

        let mut records = HashMap::with_capacity(fetched.len());
        for (code, result) in fetched {
            let resolved = match result {
                Ok(Some(record)) => Resolved {
                    record,
                    degraded: None,
                },
                Ok(None) => {
                    warn!(code = %code, "Course not in catalog, assuming defaults");
                    Resolved {
                        record: CourseRecord::degraded(code.clone()),
                        degraded: Some(DegradeReason::NotFound),
                    }
                }
                Err(CatalogError::Malformed { reason, .. }) => {
                    warn!(code = %code, %reason, "Malformed course record, assuming defaults");
                    Resolved {
                        record: CourseRecord::degraded(code.clone()),
                        degraded: Some(DegradeReason::Malformed(reason)),
                    }
                }
                Err(e) => {
                    warn!(code = %code, error = %e, "Course lookup failed");
                    return Err(ResolutionError::Provider(e));
                }
            };
            records.insert(code, resolved);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use coursepilot_catalog::InMemoryCatalog;
    use coursepilot_core::Bucket;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn codes(list: &[&str]) -> BTreeSet<CourseCode> {
        list.iter().map(|c| CourseCode::new(c)).collect()
    }

    fn template(major_id: &str, courses: &[&str]) -> RequirementTemplate {
        RequirementTemplate {
            major_id: major_id.into(),
            name: None,
            buckets: vec![Bucket {
                id: "core".into(),
                choose: 2,
                courses: courses.iter().map(|c| CourseCode::new(c)).collect(),
            }],
        }
    }

    fn compsc_catalog() -> InMemoryCatalog {
        InMemoryCatalog::new()
            .with_major(template("COMPSC:BS", &["COP2210", "COP3337", "COP3530"]))
            .with_course(CourseRecord::new("COP2210", 4))
            .with_course(
                CourseRecord::new("COP3337", 3).with_prereqs(RequisiteExpression::parse("COP2210")),
            )
            .with_course(
                CourseRecord::new("COP3530", 3).with_prereqs(RequisiteExpression::parse("COP3337")),
            )
    }

    /// Counts lookups per call and fails on demand.
    struct CountingCatalog {
        inner: InMemoryCatalog,
        lookups: AtomicUsize,
        fail_with: Option<CatalogError>,
    }

    #[async_trait]
    impl CourseCatalogProvider for CountingCatalog {
        fn name(&self) -> &str {
            "counting"
        }

        async fn get_course(
            &self,
            code: &CourseCode,
        ) -> Result<Option<CourseRecord>, CatalogError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = &self.fail_with {
                return Err(err.clone());
            }
            self.inner.get_course(code).await
        }

        async fn get_major(
            &self,
            major_id: &str,
        ) -> Result<Option<RequirementTemplate>, CatalogError> {
            self.inner.get_major(major_id).await
        }
    }

    #[tokio::test]
    async fn compsc_scenario() {
        let resolver = EligibilityResolver::new(Arc::new(compsc_catalog()));
        let result = resolver
            .resolve("COMPSC:BS", &codes(&["COP2210"]))
            .await
            .unwrap();

        assert_eq!(result.eligible_now, vec![CourseCode::new("COP3337")]);
        assert!(result.warnings.is_empty());

        let remaining = &result.remaining_by_bucket[0].remaining;
        assert_eq!(remaining.len(), 2);
        let cop3530 = result.course(&CourseCode::new("COP3530")).unwrap();
        assert!(!cop3530.eligible);
        assert_eq!(cop3530.missing_prereqs, vec![vec![CourseCode::new("COP3337")]]);
        assert!(result.course(&CourseCode::new("COP2210")).is_none());
    }

    #[tokio::test]
    async fn completed_codes_are_normalized() {
        let resolver = EligibilityResolver::new(Arc::new(compsc_catalog()));
        let result = resolver
            .resolve("COMPSC:BS", &codes(&["cop 2210"]))
            .await
            .unwrap();
        assert!(result.is_eligible(&CourseCode::new("COP3337")));
    }

    #[tokio::test]
    async fn unknown_major_is_empty_with_warning() {
        let resolver = EligibilityResolver::new(Arc::new(compsc_catalog()));
        let result = resolver.resolve("MATH:BS", &BTreeSet::new()).await.unwrap();
        assert!(result.remaining_by_bucket.is_empty());
        assert!(result.eligible_now.is_empty());
        assert_eq!(
            result.warnings,
            vec![Diagnostic::UnknownMajor {
                major_id: "MATH:BS".into()
            }]
        );
    }

    /// Serves courses normally but fails every template lookup.
    struct BrokenMajor {
        inner: InMemoryCatalog,
        error: CatalogError,
    }

    #[async_trait]
    impl CourseCatalogProvider for BrokenMajor {
        fn name(&self) -> &str {
            "broken_major"
        }

        async fn get_course(
            &self,
            code: &CourseCode,
        ) -> Result<Option<CourseRecord>, CatalogError> {
            self.inner.get_course(code).await
        }

        async fn get_major(
            &self,
            _major_id: &str,
        ) -> Result<Option<RequirementTemplate>, CatalogError> {
            Err(self.error.clone())
        }
    }

    #[tokio::test]
    async fn malformed_major_is_empty_with_warning() {
        let resolver = EligibilityResolver::new(Arc::new(BrokenMajor {
            inner: compsc_catalog(),
            error: CatalogError::malformed("major", "missing field `major_id`"),
        }));
        let result = resolver.resolve("COMPSC:BS", &BTreeSet::new()).await.unwrap();

        assert_eq!(result.major_id, "COMPSC:BS");
        assert!(result.remaining_by_bucket.is_empty());
        assert!(result.eligible_now.is_empty());
        assert_eq!(
            result.warnings,
            vec![Diagnostic::MalformedMajor {
                major_id: "COMPSC:BS".into(),
                reason: "missing field `major_id`".into(),
            }]
        );
    }

    #[tokio::test]
    async fn template_transport_failure_aborts() {
        let resolver = EligibilityResolver::new(Arc::new(BrokenMajor {
            inner: compsc_catalog(),
            error: CatalogError::Transport("connection refused".into()),
        }));
        let err = resolver
            .resolve("COMPSC:BS", &BTreeSet::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ResolutionError::Provider(CatalogError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn missing_and_malformed_records_degrade() {
        let catalog = InMemoryCatalog::new()
            .with_major(template("X:BS", &["AAA1000", "BBB2000"]))
            .with_malformed_course(CourseCode::new("BBB2000"), "credits missing");
        let resolver = EligibilityResolver::new(Arc::new(catalog));
        let result = resolver.resolve("X:BS", &BTreeSet::new()).await.unwrap();

        // Degraded records have no prereqs, so they are eligible at 3 credits.
        assert_eq!(
            result.eligible_now,
            vec![CourseCode::new("AAA1000"), CourseCode::new("BBB2000")]
        );
        for course in &result.remaining_by_bucket[0].remaining {
            assert!(course.degraded);
            assert_eq!(course.credits, 3);
        }
        assert_eq!(result.warnings.len(), 2);
        assert!(matches!(
            &result.warnings[0],
            Diagnostic::DegradedRecord {
                reason: DegradeReason::NotFound,
                ..
            }
        ));
        assert!(matches!(
            &result.warnings[1],
            Diagnostic::DegradedRecord {
                reason: DegradeReason::Malformed(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn coreqs_never_gate_eligibility() {
        let catalog = InMemoryCatalog::new()
            .with_major(template("BIO:BS", &["BSC2010", "BSC2010L"]))
            .with_course(
                CourseRecord::new("BSC2010", 3).with_coreqs(RequisiteExpression::parse("BSC2010L")),
            )
            .with_course(
                CourseRecord::new("BSC2010L", 1).with_coreqs(RequisiteExpression::parse("BSC2010")),
            );
        let resolver = EligibilityResolver::new(Arc::new(catalog));
        let result = resolver.resolve("BIO:BS", &BTreeSet::new()).await.unwrap();

        assert_eq!(result.eligible_now.len(), 2);
        let lecture = result.course(&CourseCode::new("BSC2010")).unwrap();
        assert_eq!(lecture.unmet_coreqs, vec![vec![CourseCode::new("BSC2010L")]]);
    }

    #[tokio::test]
    async fn each_code_fetched_once_per_pass() {
        let mut shared = template("X:BS", &["AAA1000", "BBB2000"]);
        shared.buckets.push(Bucket {
            id: "electives".into(),
            choose: 1,
            courses: vec![CourseCode::new("AAA1000"), CourseCode::new("aaa 1000")],
        });
        let catalog = Arc::new(CountingCatalog {
            inner: InMemoryCatalog::new()
                .with_major(shared)
                .with_course(CourseRecord::new("AAA1000", 3))
                .with_course(CourseRecord::new("BBB2000", 3)),
            lookups: AtomicUsize::new(0),
            fail_with: None,
        });
        let resolver = EligibilityResolver::new(catalog.clone()).with_fetch_concurrency(1);
        let result = resolver.resolve("X:BS", &BTreeSet::new()).await.unwrap();

        assert_eq!(catalog.lookups.load(Ordering::SeqCst), 2);
        assert_eq!(result.remaining_by_bucket[1].remaining.len(), 1);
    }

    #[tokio::test]
    async fn provider_failure_aborts() {
        let catalog = Arc::new(CountingCatalog {
            inner: compsc_catalog(),
            lookups: AtomicUsize::new(0),
            fail_with: Some(CatalogError::Timeout("deadline exceeded".into())),
        });
        let resolver = EligibilityResolver::new(catalog);
        let err = resolver
            .resolve("COMPSC:BS", &codes(&["COP2210"]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ResolutionError::Provider(CatalogError::Timeout(_))
        ));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn everything_completed_means_nothing_remaining() {
        let resolver = EligibilityResolver::new(Arc::new(compsc_catalog()));
        let result = resolver
            .resolve("COMPSC:BS", &codes(&["COP2210", "COP3337", "COP3530"]))
            .await
            .unwrap();
        assert!(result.remaining_codes().is_empty());
        assert!(result.eligible_now.is_empty());
    }

    #[test]
    fn concurrency_floor_is_one() {
        let resolver =
            EligibilityResolver::new(Arc::new(InMemoryCatalog::new())).with_fetch_concurrency(0);
        assert_eq!(resolver.fetch_concurrency(), 1);
    }

    #[tokio::test]
    async fn result_serializes_with_wire_names() {
        let resolver = EligibilityResolver::new(Arc::new(compsc_catalog()));
        let result = resolver
            .resolve("COMPSC:BS", &codes(&["COP2210"]))
            .await
            .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["eligibleNow"][0], "COP3337");
        assert!(json["remainingByBucket"].is_array());
    }
}
