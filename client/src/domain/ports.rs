//! Ports consumed by the domain orchestrators.
//!
//! The lookup orchestrator talks to the search and dictionary services
//! through these traits so its decision logic (single-best query, reshape,
//! degraded-mode fallback) is testable without a network. The reqwest
//! adapters in `outbound` implement them.

use async_trait::async_trait;
use pagination::Paged;

use super::error::ClientError;
use super::language::Language;
use super::model::{AutocompleteHit, Favorite, SearchHit, Term};
use super::query::SearchQuery;

/// Ranked full-text search against the search service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchGateway: Send + Sync {
    /// Execute a ranked search.
    async fn search(&self, query: &SearchQuery) -> Result<Paged<SearchHit>, ClientError>;

    /// Fetch prefix-match suggestions.
    async fn autocomplete(
        &self,
        prefix: &str,
        lang: Language,
        limit: u32,
    ) -> Result<Vec<AutocompleteHit>, ClientError>;
}

/// Term reads against the dictionary service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TermGateway: Send + Sync {
    /// Fetch one term rendered in the given language.
    async fn fetch_term(&self, id: i64, lang: Language) -> Result<Term, ClientError>;
}

/// Favourite membership against the dictionary service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavoriteGateway: Send + Sync {
    /// List the caller's favourites.
    async fn favorites(&self) -> Result<Vec<Favorite>, ClientError>;

    /// Add a term to the caller's favourites.
    async fn add_favorite(&self, term_id: i64) -> Result<(), ClientError>;

    /// Remove a term from the caller's favourites.
    async fn remove_favorite(&self, term_id: i64) -> Result<(), ClientError>;
}
