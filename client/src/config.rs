//! Service endpoint configuration loaded via OrthoConfig.
//!
//! Five backend services share one `/api/<version>` path prefix but live on
//! separate base URLs (separate local ports in development, one origin in
//! production). Everything is overridable through `SOZDIK_*` environment
//! variables or a config file.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const DEFAULT_AUTH_URL: &str = "http://localhost:8001";
const DEFAULT_DICTIONARY_URL: &str = "http://localhost:8002";
const DEFAULT_SEARCH_URL: &str = "http://localhost:8003";
const DEFAULT_IMPORT_EXPORT_URL: &str = "http://localhost:8004";
const DEFAULT_ADMIN_URL: &str = "http://localhost:8005";
const DEFAULT_API_VERSION: &str = "v1";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// The five backend domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// Accounts, sessions, profile.
    Auth,
    /// Terms, categories, favourites, suggestions.
    Dictionary,
    /// Ranked search and autocomplete.
    Search,
    /// Bulk import and export.
    ImportExport,
    /// Audit log and administration.
    Admin,
}

/// Settings controlling endpoint construction and transport defaults.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SOZDIK")]
pub struct ApiSettings {
    /// Auth service base URL.
    pub auth_url: Option<String>,
    /// Dictionary service base URL.
    pub dictionary_url: Option<String>,
    /// Search service base URL.
    pub search_url: Option<String>,
    /// Import/export service base URL.
    pub import_export_url: Option<String>,
    /// Admin service base URL.
    pub admin_url: Option<String>,
    /// Versioned path prefix segment, e.g. `v1`.
    pub api_version: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: Option<u64>,
    /// Local store file override.
    pub store_path: Option<PathBuf>,
}

/// Endpoint construction failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    /// A configured base URL does not parse.
    #[error("invalid base URL for {service:?}: {message}")]
    InvalidBase {
        /// The offending service.
        service: Service,
        /// Parser description.
        message: String,
    },
}

impl ApiSettings {
    /// Configured or default base URL for a service.
    #[must_use]
    pub fn base_url(&self, service: Service) -> &str {
        let (configured, default) = match service {
            Service::Auth => (&self.auth_url, DEFAULT_AUTH_URL),
            Service::Dictionary => (&self.dictionary_url, DEFAULT_DICTIONARY_URL),
            Service::Search => (&self.search_url, DEFAULT_SEARCH_URL),
            Service::ImportExport => (&self.import_export_url, DEFAULT_IMPORT_EXPORT_URL),
            Service::Admin => (&self.admin_url, DEFAULT_ADMIN_URL),
        };
        configured.as_deref().unwrap_or(default)
    }

    /// Versioned API prefix segment.
    #[must_use]
    pub fn api_version(&self) -> &str {
        self.api_version.as_deref().unwrap_or(DEFAULT_API_VERSION)
    }

    /// Request timeout applied to the HTTP client.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    /// Path of the local store file.
    ///
    /// Defaults to `.sozdik/store.json` under the home directory, or the
    /// working directory when no home is set.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.store_path.clone().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(PathBuf::from)
                .unwrap_or_default()
                .join(".sozdik")
                .join("store.json")
        })
    }

    /// Build the full URL for `path` (which must start with `/`) under the
    /// service's versioned prefix.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError`] when the configured base URL is malformed.
    pub fn endpoint(&self, service: Service, path: &str) -> Result<Url, EndpointError> {
        let base = self.base_url(service).trim_end_matches('/');
        let version = self.api_version();
        Url::parse(&format!("{base}/api/{version}{path}")).map_err(|error| {
            EndpointError::InvalidBase {
                service,
                message: error.to_string(),
            }
        })
    }
}
