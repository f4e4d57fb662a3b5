//! Search service adapter: ranked search and autocomplete.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::Paged;

use crate::config::Service;
use crate::domain::error::ClientError;
use crate::domain::language::Language;
use crate::domain::model::{AutocompleteHit, SearchHit};
use crate::domain::ports::SearchGateway;
use crate::domain::query::SearchQuery;
use crate::outbound::http::{Auth, HttpClient};

/// Suggestions returned when the caller does not say otherwise.
pub const DEFAULT_AUTOCOMPLETE_LIMIT: u32 = 10;

/// Typed client for the search service. Both endpoints are public.
pub struct SearchClient {
    http: Arc<HttpClient>,
}

impl SearchClient {
    /// Wire the adapter to the shared request core.
    #[must_use]
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl SearchGateway for SearchClient {
    async fn search(&self, query: &SearchQuery) -> Result<Paged<SearchHit>, ClientError> {
        self.http
            .get_json(
                Service::Search,
                "/search",
                &query.query_pairs(),
                Auth::Anonymous,
            )
            .await
    }

    async fn autocomplete(
        &self,
        prefix: &str,
        lang: Language,
        limit: u32,
    ) -> Result<Vec<AutocompleteHit>, ClientError> {
        let pairs = [
            ("q".to_owned(), prefix.to_owned()),
            ("lang".to_owned(), lang.wire_code().to_owned()),
            ("limit".to_owned(), limit.to_string()),
        ];
        self.http
            .get_json(
                Service::Search,
                "/search/autocomplete",
                &pairs,
                Auth::Anonymous,
            )
            .await
    }
}
