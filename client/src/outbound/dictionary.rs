//! Dictionary service adapter: terms, categories, favourites, suggestions.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::join3;
use serde::Serialize;

use crate::config::Service;
use crate::domain::error::ClientError;
use crate::domain::language::Language;
use crate::domain::model::{
    Category, CategoryCreate, Favorite, SuggestionCreate, Term, TermCreate, TermUpdate,
};
use crate::domain::ports::{FavoriteGateway, TermGateway};
use crate::domain::query::TermListQuery;
use crate::outbound::http::{Auth, HttpClient};

#[derive(Debug, Serialize)]
struct RejectRequest<'a> {
    reason: &'a str,
}

fn favorite_path(term_id: i64) -> String {
    format!("/favorites/{term_id}")
}

/// One term's renderings in all three languages, used by the term editor.
/// A missing rendering means that translation does not exist yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TermRenderings {
    /// Kazakh rendering.
    pub kk: Option<Term>,
    /// Russian rendering.
    pub ru: Option<Term>,
    /// English rendering.
    pub en: Option<Term>,
}

/// Typed client for the dictionary service.
pub struct DictionaryClient {
    http: Arc<HttpClient>,
}

impl DictionaryClient {
    /// Wire the adapter to the shared request core.
    #[must_use]
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    fn lang_pairs(lang: Language) -> Vec<(String, String)> {
        vec![("lang".to_owned(), lang.wire_code().to_owned())]
    }

    /// List categories rendered in `lang`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport and server failures.
    pub async fn categories(&self, lang: Language) -> Result<Vec<Category>, ClientError> {
        self.http
            .get_json(
                Service::Dictionary,
                "/categories",
                &Self::lang_pairs(lang),
                Auth::Anonymous,
            )
            .await
    }

    /// Fetch one category rendered in `lang`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport and server failures, including
    /// the 404 for an unknown identifier.
    pub async fn category(&self, id: i64, lang: Language) -> Result<Category, ClientError> {
        self.http
            .get_json(
                Service::Dictionary,
                &format!("/categories/{id}"),
                &Self::lang_pairs(lang),
                Auth::Anonymous,
            )
            .await
    }

    /// Create a category (editor role).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport, authentication, and server
    /// failures.
    pub async fn create_category(&self, payload: &CategoryCreate) -> Result<Category, ClientError> {
        self.http
            .post_json(Service::Dictionary, "/categories", payload, Auth::Required)
            .await
    }

    /// Replace a category's slug, parent, and translations (editor role).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport, authentication, and server
    /// failures.
    pub async fn update_category(
        &self,
        id: i64,
        payload: &CategoryCreate,
    ) -> Result<Category, ClientError> {
        self.http
            .put_json(
                Service::Dictionary,
                &format!("/categories/{id}"),
                payload,
                Auth::Required,
            )
            .await
    }

    /// Delete a category (editor role).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport, authentication, and server
    /// failures, including the 409 for a category that still holds terms.
    pub async fn delete_category(&self, id: i64) -> Result<(), ClientError> {
        self.http
            .delete(Service::Dictionary, &format!("/categories/{id}"), Auth::Required)
            .await
    }

    /// List terms with the given filters, rendered in `lang`.
    ///
    /// The service answers with a bare array; paging happens through the
    /// `page`/`size` query parameters, and each page change is a fresh
    /// fetch. Runs authenticated so drafts and pending terms belonging to
    /// the caller are included; the server ignores the filters a role may
    /// not use.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport, authentication, and server
    /// failures.
    pub async fn terms(
        &self,
        query: &TermListQuery,
        lang: Language,
    ) -> Result<Vec<Term>, ClientError> {
        self.http
            .get_json(
                Service::Dictionary,
                "/terms",
                &query.query_pairs(lang),
                Auth::Required,
            )
            .await
    }

    /// Fetch one approved term rendered in `lang`; bumps the view counter
    /// server-side.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport and server failures, including
    /// the 404 for unknown or unapproved terms.
    pub async fn term(&self, id: i64, lang: Language) -> Result<Term, ClientError> {
        self.http
            .get_json(
                Service::Dictionary,
                &format!("/terms/{id}"),
                &Self::lang_pairs(lang),
                Auth::Anonymous,
            )
            .await
    }

    /// Create a draft term (editor role).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport, authentication, and server
    /// failures, including the 422 for a missing translation set.
    pub async fn create_term(&self, payload: &TermCreate) -> Result<Term, ClientError> {
        self.http
            .post_json(Service::Dictionary, "/terms", payload, Auth::Required)
            .await
    }

    /// Update a term; absent fields stay unchanged (editor role).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport, authentication, and server
    /// failures.
    pub async fn update_term(&self, id: i64, payload: &TermUpdate) -> Result<Term, ClientError> {
        self.http
            .put_json(
                Service::Dictionary,
                &format!("/terms/{id}"),
                payload,
                Auth::Required,
            )
            .await
    }

    /// Delete a term (editor role).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport, authentication, and server
    /// failures.
    pub async fn delete_term(&self, id: i64) -> Result<(), ClientError> {
        self.http
            .delete(Service::Dictionary, &format!("/terms/{id}"), Auth::Required)
            .await
    }

    /// Move a draft term to pending (editor role).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport, authentication, and server
    /// failures, including the 409 for a term not in draft.
    pub async fn submit_term(&self, id: i64) -> Result<Term, ClientError> {
        self.http
            .post_empty_json(
                Service::Dictionary,
                &format!("/terms/{id}/submit"),
                Auth::Required,
            )
            .await
    }

    /// Approve a pending term (moderator role).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport, authentication, and server
    /// failures, including the 409 for a term not in pending.
    pub async fn approve_term(&self, id: i64) -> Result<Term, ClientError> {
        self.http
            .post_empty_json(
                Service::Dictionary,
                &format!("/terms/{id}/approve"),
                Auth::Required,
            )
            .await
    }

    /// Reject a pending term with a reason (moderator role).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport, authentication, and server
    /// failures.
    pub async fn reject_term(&self, id: i64, reason: &str) -> Result<Term, ClientError> {
        self.http
            .post_json(
                Service::Dictionary,
                &format!("/terms/{id}/reject"),
                &RejectRequest { reason },
                Auth::Required,
            )
            .await
    }

    /// Fetch all three renderings of a term concurrently.
    ///
    /// Individual missing translations degrade to `None`; the call only
    /// fails when no language yields a rendering at all.
    ///
    /// # Errors
    ///
    /// Returns the Kazakh fetch's [`ClientError`] when all three languages
    /// fail.
    pub async fn term_renderings(&self, id: i64) -> Result<TermRenderings, ClientError> {
        let (kk, ru, en) = join3(
            self.term(id, Language::Kk),
            self.term(id, Language::Ru),
            self.term(id, Language::En),
        )
        .await;
        if let (Err(error), Err(_), Err(_)) = (&kk, &ru, &en) {
            return Err(error.clone());
        }
        Ok(TermRenderings {
            kk: kk.ok(),
            ru: ru.ok(),
            en: en.ok(),
        })
    }

    /// Submit a reader suggestion for curation.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport, authentication, and server
    /// failures.
    pub async fn create_suggestion(&self, payload: &SuggestionCreate) -> Result<(), ClientError> {
        self.http
            .post_unit(Service::Dictionary, "/suggestions", payload, Auth::Required)
            .await
    }
}

#[async_trait]
impl TermGateway for DictionaryClient {
    async fn fetch_term(&self, id: i64, lang: Language) -> Result<Term, ClientError> {
        self.term(id, lang).await
    }
}

#[async_trait]
impl FavoriteGateway for DictionaryClient {
    async fn favorites(&self) -> Result<Vec<Favorite>, ClientError> {
        self.http
            .get_json(Service::Dictionary, "/favorites", &[], Auth::Required)
            .await
    }

    /// `POST favorites/:term_id`; adding twice is a server-side no-op.
    async fn add_favorite(&self, term_id: i64) -> Result<(), ClientError> {
        self.http
            .post_empty_unit(Service::Dictionary, &favorite_path(term_id), Auth::Required)
            .await
    }

    /// `DELETE favorites/:term_id`.
    async fn remove_favorite(&self, term_id: i64) -> Result<(), ClientError> {
        self.http
            .delete(Service::Dictionary, &favorite_path(term_id), Auth::Required)
            .await
    }
}

#[cfg(test)]
mod tests {
    //! Wire-contract coverage: the bare term array and the favourites path.

    use super::*;
    use crate::config::ApiSettings;
    use crate::domain::model::TermStatus;

    #[test]
    fn term_listing_is_a_bare_array() {
        let body = r#"[
            {
                "id": 1, "slug": "egemendik", "category_id": 7,
                "status": "approved", "views": 1250,
                "created_at": "2024-01-10T12:00:00Z",
                "updated_at": "2024-03-02T08:30:00Z",
                "language": "kz", "title": "Егемендік",
                "definition": "Аумақ бойынша жоғары билік."
            },
            {
                "id": 2, "slug": "infrastructure", "category_id": 7,
                "status": "approved", "views": 640,
                "created_at": "2024-01-11T12:00:00Z",
                "updated_at": "2024-01-11T12:00:00Z",
                "language": "en", "title": "Infrastructure",
                "definition": "Underlying physical systems."
            }
        ]"#;

        let terms: Vec<Term> = serde_json::from_str(body).expect("bare array decodes");
        assert_eq!(terms.len(), 2);
        assert_eq!(terms[0].status, TermStatus::Approved);
    }

    #[test]
    fn favorite_membership_addresses_the_term() {
        let settings = ApiSettings {
            auth_url: None,
            dictionary_url: None,
            search_url: None,
            import_export_url: None,
            admin_url: None,
            api_version: None,
            timeout_seconds: None,
            store_path: None,
        };
        let url = settings
            .endpoint(Service::Dictionary, &favorite_path(42))
            .expect("endpoint builds");
        assert_eq!(url.as_str(), "http://localhost:8002/api/v1/favorites/42");
    }
}
