//! HTTP catalog — reads records from the registrar record service.
//!
//! Routes (relative to the configured base URL):
//! - `GET /courses/{code}`
//! - `GET /majors/{major_id}`
//! - `GET /users/{user_id}`
//! - `GET /sections?term=..&campus=..&course=..` (`campus`/`course` repeat)
//!
//! A 404 means "not found"; any other non-success status, transport error
//! or timeout is a [`CatalogError`] that the caller sees unchanged. This
//! provider does not retry.

use async_trait::async_trait;
use coursepilot_core::catalog::{
    CourseCatalogProvider, ProfileProvider, SectionBatch, SectionCatalogProvider,
};
use coursepilot_core::{CatalogError, CourseCode, CourseRecord, RequirementTemplate, UserProfile};
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, warn};

use crate::wire::{IngestOptions, WireMajor, WireUser, course_from_value, section_from_value};

/// A catalog backed by the record service's REST API.
pub struct HttpCatalog {
    base_url: reqwest::Url,
    api_key: Option<String>,
    client: reqwest::Client,
    options: IngestOptions,
}

impl HttpCatalog {
    /// Create a client for the service at `base_url`.
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
        options: IngestOptions,
    ) -> Result<Self, CatalogError> {
        let base_url = reqwest::Url::parse(base_url.trim_end_matches('/')).map_err(|e| {
            CatalogError::NotConfigured(format!("invalid catalog base URL '{base_url}': {e}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(CatalogError::NotConfigured(format!(
                "catalog base URL '{base_url}' cannot carry a path"
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::NotConfigured(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            api_key,
            client,
            options,
        })
    }

    /// Base URL with `segments` appended (each segment percent-encoded).
    fn url(&self, segments: &[&str]) -> reqwest::Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        url
    }

    /// GET a JSON document. `Ok(None)` on 404.
    async fn get_json(
        &self,
        url: reqwest::Url,
        query: &[(&str, String)],
    ) -> Result<Option<serde_json::Value>, CatalogError> {
        debug!(url = %url, "Catalog request");

        let mut request = self.client.get(url.clone());
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(map_transport)?;
        let status = response.status().as_u16();

        if status == 404 {
            return Ok(None);
        }

        if !response.status().is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, url = %url, body = %error_body, "Catalog returned error");
            return Err(CatalogError::Status {
                status_code: status,
                message: error_body,
            });
        }

        let value = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| CatalogError::malformed(url.path().to_string(), e.to_string()))?;

        // The record service answers `null` for some missing documents.
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(value))
    }
}

fn map_transport(e: reqwest::Error) -> CatalogError {
    if e.is_timeout() {
        CatalogError::Timeout(e.to_string())
    } else {
        CatalogError::Transport(e.to_string())
    }
}

#[async_trait]
impl CourseCatalogProvider for HttpCatalog {
    fn name(&self) -> &str {
        "http"
    }

    async fn get_course(&self, code: &CourseCode) -> Result<Option<CourseRecord>, CatalogError> {
        let url = self.url(&["courses", code.as_str()]);
        match self.get_json(url, &[]).await? {
            Some(value) => course_from_value(value, self.options.empty_groups).map(Some),
            None => Ok(None),
        }
    }

    async fn get_major(&self, major_id: &str) -> Result<Option<RequirementTemplate>, CatalogError> {
        let url = self.url(&["majors", major_id.trim()]);
        let Some(value) = self.get_json(url, &[]).await? else {
            return Ok(None);
        };
        let wire: WireMajor = serde_json::from_value(value)
            .map_err(|e| CatalogError::malformed("major", e.to_string()))?;
        Ok(Some(wire.into_template(&self.options)))
    }
}

#[async_trait]
impl SectionCatalogProvider for HttpCatalog {
    fn name(&self) -> &str {
        "http"
    }

    async fn get_sections(
        &self,
        term: &str,
        campuses: &BTreeSet<String>,
        course_codes: &BTreeSet<CourseCode>,
    ) -> Result<SectionBatch, CatalogError> {
        if course_codes.is_empty() {
            return Ok(SectionBatch::default());
        }

        let mut query = vec![("term", term.trim().to_string())];
        query.extend(campuses.iter().map(|c| ("campus", c.clone())));
        query.extend(course_codes.iter().map(|c| ("course", c.to_string())));

        let url = self.url(&["sections"]);
        let Some(value) = self.get_json(url, &query).await? else {
            return Ok(SectionBatch::default());
        };
        let serde_json::Value::Array(items) = value else {
            return Err(CatalogError::malformed(
                "sections",
                "expected a JSON array of sections",
            ));
        };

        let mut batch = SectionBatch::default();
        for item in items {
            match section_from_value(item) {
                Ok(section) => batch.sections.push(section),
                Err(diagnostic) => {
                    warn!(%diagnostic, "Rejected section from catalog");
                    batch.rejected.push(diagnostic);
                }
            }
        }
        Ok(batch)
    }
}

#[async_trait]
impl ProfileProvider for HttpCatalog {
    fn name(&self) -> &str {
        "http"
    }

    async fn get_user_profile(&self, user_id: &str) -> Result<Option<UserProfile>, CatalogError> {
        let url = self.url(&["users", user_id.trim()]);
        let Some(value) = self.get_json(url, &[]).await? else {
            return Ok(None);
        };
        let wire: WireUser = serde_json::from_value(value)
            .map_err(|e| CatalogError::malformed("user", e.to_string()))?;
        Ok(Some(wire.into_profile()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn catalog(base: &str) -> HttpCatalog {
        HttpCatalog::new(
            base,
            Some("token".into()),
            Duration::from_secs(5),
            IngestOptions::default(),
        )
        .unwrap()
    }

    /// Serve exactly one HTTP response on an ephemeral port; returns the
    /// base URL and a handle yielding the raw request text.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });
        (format!("http://{addr}/api"), handle)
    }

    #[test]
    fn url_building_escapes_segments() {
        let c = catalog("http://localhost:8000/api/");
        assert_eq!(
            c.url(&["majors", "COMPSC:BS"]).as_str(),
            "http://localhost:8000/api/majors/COMPSC:BS"
        );
        assert_eq!(
            c.url(&["users", "a b"]).as_str(),
            "http://localhost:8000/api/users/a%20b"
        );
    }

    #[test]
    fn invalid_base_url_rejected() {
        let result = HttpCatalog::new(
            "not a url",
            None,
            Duration::from_secs(1),
            IngestOptions::default(),
        );
        assert!(matches!(result, Err(CatalogError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn fetches_course_document() {
        let (base, handle) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"_id": "abc", "code": "COP3530", "credits": 3, "prereqs": "COP3337"}"#,
        )
        .await;
        let record = catalog(&base)
            .get_course(&CourseCode::new("COP 3530"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.prereqs.to_string(), "COP3337");

        let request = handle.await.unwrap();
        assert!(request.starts_with("GET /api/courses/COP3530 "));
        assert!(request.to_lowercase().contains("authorization: bearer token"));
    }

    #[tokio::test]
    async fn not_found_is_none() {
        let (base, _handle) =
            serve_once("HTTP/1.1 404 Not Found", r#"{"detail": "Course not found"}"#).await;
        let result = catalog(&base)
            .get_course(&CourseCode::new("XYZ0000"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn server_error_is_provider_failure() {
        let (base, _handle) = serve_once("HTTP/1.1 503 Service Unavailable", "{}").await;
        let err = catalog(&base).get_major("COMPSC:BS").await.unwrap_err();
        assert!(matches!(err, CatalogError::Status { status_code: 503, .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn sections_query_and_rejections() {
        let (base, handle) = serve_once(
            "HTTP/1.1 200 OK",
            r#"[
                {"course": "COP3337", "term": "2026 Spring", "campus": "MMC", "crn": 80001,
                 "days": "MW", "start": "10:00", "end": "11:15", "credits": 3},
                {"course": "COP3530", "term": "2026 Spring", "campus": "MMC", "crn": 80002,
                 "days": "MW", "start": "11:15", "end": "10:00", "credits": 3}
            ]"#,
        )
        .await;
        let batch = catalog(&base)
            .get_sections(
                "2026 Spring",
                &BTreeSet::from(["MMC".to_string()]),
                &BTreeSet::from([CourseCode::new("COP3337"), CourseCode::new("COP3530")]),
            )
            .await
            .unwrap();
        assert_eq!(batch.sections.len(), 1);
        assert_eq!(batch.rejected.len(), 1);

        let request = handle.await.unwrap();
        assert!(request.contains("term=2026+Spring"));
        assert!(request.contains("campus=MMC"));
        assert!(request.contains("course=COP3337"));
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = catalog(&format!("http://{addr}/api"))
            .get_user_profile("u1")
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Transport(_)));
        assert!(err.is_retryable());
    }
}
