//! Admin service adapter: the audit log.

use std::sync::Arc;

use crate::config::Service;
use crate::domain::error::ClientError;
use crate::domain::model::AuditRecord;
use crate::outbound::http::{Auth, HttpClient};

/// Rows returned when a caller does not choose a limit.
pub const DEFAULT_AUDIT_LIMIT: u32 = 50;

/// Filters and window for an audit log read.
///
/// The audit endpoint paginates with `limit`/`offset` rather than the
/// `page`/`size` convention the other services use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditQuery {
    /// Restrict to one acting account.
    pub actor_id: Option<i64>,
    /// Restrict to one entity kind, e.g. `term`.
    pub entity_type: Option<String>,
    /// Maximum rows to return.
    pub limit: u32,
    /// Rows to skip, newest first.
    pub offset: u64,
}

impl Default for AuditQuery {
    fn default() -> Self {
        Self {
            actor_id: None,
            entity_type: None,
            limit: DEFAULT_AUDIT_LIMIT,
            offset: 0,
        }
    }
}

impl AuditQuery {
    /// Render the query pairs, always leading with the window.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("limit".to_owned(), self.limit.to_string()),
            ("offset".to_owned(), self.offset.to_string()),
        ];
        if let Some(actor_id) = self.actor_id {
            pairs.push(("actor_id".to_owned(), actor_id.to_string()));
        }
        if let Some(entity_type) = &self.entity_type {
            pairs.push(("entity_type".to_owned(), entity_type.clone()));
        }
        pairs
    }
}

/// Typed client for the admin service. Every endpoint requires the admin
/// role; lesser roles receive a 403.
pub struct AdminClient {
    http: Arc<HttpClient>,
}

impl AdminClient {
    /// Wire the adapter to the shared request core.
    #[must_use]
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Read a window of the audit log, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport, authentication, and server
    /// failures, including the 403 for non-admin callers.
    pub async fn audits(&self, query: &AuditQuery) -> Result<Vec<AuditRecord>, ClientError> {
        self.http
            .get_json(Service::Admin, "/audits", &query.query_pairs(), Auth::Required)
            .await
    }
}
