//! Catalog router: picks the backing catalog from configuration and hands
//! the engine one handle per collaborator.

use coursepilot_config::{AppConfig, CatalogSource};
use coursepilot_core::CatalogError;
use coursepilot_core::catalog::{CourseCatalogProvider, ProfileProvider, SectionCatalogProvider};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::file::FileCatalog;
use crate::http::HttpCatalog;
use crate::sample::sample_catalog;
use crate::wire::IngestOptions;

/// The three collaborators the engine reads from.
#[derive(Clone)]
pub struct CatalogSet {
    pub courses: Arc<dyn CourseCatalogProvider>,
    pub sections: Arc<dyn SectionCatalogProvider>,
    pub profiles: Arc<dyn ProfileProvider>,
}

impl CatalogSet {
    pub fn new(
        courses: Arc<dyn CourseCatalogProvider>,
        sections: Arc<dyn SectionCatalogProvider>,
        profiles: Arc<dyn ProfileProvider>,
    ) -> Self {
        Self {
            courses,
            sections,
            profiles,
        }
    }

    /// One backend serving all three roles.
    pub fn from_shared<T>(catalog: Arc<T>) -> Self
    where
        T: CourseCatalogProvider + SectionCatalogProvider + ProfileProvider + 'static,
    {
        Self {
            courses: catalog.clone(),
            sections: catalog.clone(),
            profiles: catalog,
        }
    }

    /// Name of the course backend, for status output.
    pub fn describe(&self) -> String {
        let courses = self.courses.name();
        let sections = self.sections.name();
        let profiles = self.profiles.name();
        if courses == sections && sections == profiles {
            courses.to_string()
        } else {
            format!("courses={courses} sections={sections} profiles={profiles}")
        }
    }
}

/// Build the catalog named by `config.catalog.source`.
pub fn build_from_config(config: &AppConfig) -> Result<CatalogSet, CatalogError> {
    let options = IngestOptions::from_config(config);

    let set = match config.catalog.source {
        CatalogSource::Sample => CatalogSet::from_shared(Arc::new(sample_catalog(&options)?)),
        CatalogSource::File => {
            let path = config.catalog.path.as_ref().ok_or_else(|| {
                CatalogError::NotConfigured("catalog.path is required for the file source".into())
            })?;
            CatalogSet::from_shared(Arc::new(FileCatalog::open(path, &options)?))
        }
        CatalogSource::Http => CatalogSet::from_shared(Arc::new(HttpCatalog::new(
            &config.catalog.base_url,
            config.catalog.api_key.clone(),
            Duration::from_secs(config.catalog.timeout_secs),
            options,
        )?)),
    };

    info!(source = %config.catalog.source, backend = %set.describe(), "Catalog ready");
    Ok(set)
}
