//! The lookup orchestrator and its offline glossary.
//!
//! Given a headword and a language pair, the orchestrator asks the search
//! service for the single best match, fetches that term in the target
//! language, and reshapes it into a [`TermCard`]. When the remote services
//! are unreachable it degrades to a fixed, embedded glossary of seed terms —
//! a demo affordance, not a resilience mechanism: there is no retry, no
//! backoff, and no circuit breaking.

use std::sync::{Arc, OnceLock};

use thiserror::Error;
use tracing::warn;

use super::error::ClientError;
use super::language::Language;
use super::model::{Definition, Term, TermCard};
use super::ports::{SearchGateway, TermGateway};
use super::query::SearchQuery;

static OFFLINE_GLOSSARY_JSON: &str = include_str!("../../data/offline_terms.json");
static OFFLINE_GLOSSARY: OnceLock<Vec<TermCard>> = OnceLock::new();

/// Failures surfaced by [`LookupService::lookup`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    /// The query was empty after trimming.
    #[error("search query must not be empty")]
    EmptyQuery,
    /// The search service answered but found nothing.
    #[error("term \"{word}\" was not found")]
    NotFound {
        /// The queried headword.
        word: String,
    },
    /// Degraded mode could not serve the word either.
    #[error("term \"{word}\" is not available offline; known terms: {known}")]
    OfflineMiss {
        /// The queried headword.
        word: String,
        /// Comma-separated seed headwords.
        known: String,
    },
}

/// The embedded seed glossary served in degraded mode.
///
/// Parsed once from an asset compiled into the binary; a malformed asset
/// degrades to an empty glossary with a logged warning rather than aborting.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGlossary;

impl OfflineGlossary {
    /// All seed cards.
    #[must_use]
    pub fn cards(&self) -> &'static [TermCard] {
        OFFLINE_GLOSSARY.get_or_init(|| {
            serde_json::from_str(OFFLINE_GLOSSARY_JSON).unwrap_or_else(|error| {
                warn!(error = %error, "embedded offline glossary is malformed");
                Vec::new()
            })
        })
    }

    /// Find a card whose headword or any translation matches the word,
    /// case-insensitively.
    #[must_use]
    pub fn find(&self, word: &str) -> Option<&'static TermCard> {
        let normalized = normalize(word);
        self.cards().iter().find(|card| {
            normalize(&card.word) == normalized
                || card
                    .translations
                    .values()
                    .any(|translation| normalize(translation) == normalized)
        })
    }

    /// Comma-separated list of seed headwords for error messages.
    #[must_use]
    pub fn known_words(&self) -> String {
        self.cards()
            .iter()
            .map(|card| card.word.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}

/// Orchestrates search, term fetch, and degraded-mode fallback.
pub struct LookupService {
    search: Arc<dyn SearchGateway>,
    terms: Arc<dyn TermGateway>,
    offline: OfflineGlossary,
}

impl LookupService {
    /// Wire the orchestrator to its gateways.
    #[must_use]
    pub fn new(search: Arc<dyn SearchGateway>, terms: Arc<dyn TermGateway>) -> Self {
        Self {
            search,
            terms,
            offline: OfflineGlossary,
        }
    }

    /// Resolve a headword into its full cross-language rendering.
    ///
    /// `from` names the language the reader typed in; `to` the language the
    /// definition is fetched in. A zero-hit answer from a healthy search
    /// service is a plain not-found; only failing calls fall back to the
    /// offline glossary.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] for empty queries, missing terms, and
    /// degraded-mode misses.
    pub async fn lookup(
        &self,
        word: &str,
        from: Language,
        to: Language,
    ) -> Result<TermCard, LookupError> {
        let word = word.trim();
        if word.is_empty() {
            return Err(LookupError::EmptyQuery);
        }

        match self.lookup_remote(word, to).await {
            Ok(card) => Ok(card),
            Err(RemoteLookupError::NotFound) => Err(LookupError::NotFound {
                word: word.to_owned(),
            }),
            Err(RemoteLookupError::Failed(error)) => {
                warn!(%word, from = %from, to = %to, error = %error,
                    "remote lookup failed, serving offline glossary");
                self.offline
                    .find(word)
                    .cloned()
                    .ok_or_else(|| LookupError::OfflineMiss {
                        word: word.to_owned(),
                        known: self.offline.known_words(),
                    })
            }
        }
    }

    async fn lookup_remote(&self, word: &str, to: Language) -> Result<TermCard, RemoteLookupError> {
        let query = SearchQuery::new(word, to).single_best();
        let page = self.search.search(&query).await?;
        let Some(hit) = page.items.first() else {
            return Err(RemoteLookupError::NotFound);
        };
        let term = self.terms.fetch_term(hit.term_id, to).await?;
        Ok(card_from_term(&term))
    }
}

enum RemoteLookupError {
    NotFound,
    Failed(ClientError),
}

impl From<ClientError> for RemoteLookupError {
    fn from(error: ClientError) -> Self {
        Self::Failed(error)
    }
}

/// Reshape a single-language term rendering into a [`TermCard`].
///
/// The fetched rendering fills its own language slot; the remaining slots
/// stay empty until other renderings are fetched.
#[must_use]
pub fn card_from_term(term: &Term) -> TermCard {
    let mut card = TermCard {
        word: term.title.clone(),
        ..TermCard::default()
    };
    card.translations.insert(term.language, term.title.clone());
    card.definitions.insert(
        term.language,
        Definition {
            meaning: term.definition.clone(),
            examples: term.example_list(),
            synonyms: term.synonym_list(),
        },
    );
    card
}

#[cfg(test)]
mod tests {
    //! Orchestration decisions: single-best query, fallback policy, reshape.

    use super::*;
    use crate::domain::model::{SearchHit, TermStatus};
    use crate::domain::ports::{MockSearchGateway, MockTermGateway};
    use chrono::Utc;
    use pagination::{PageMeta, Paged};

    fn hit(term_id: i64) -> SearchHit {
        SearchHit {
            term_id,
            slug: "egemendik".to_owned(),
            title: "Егемендік".to_owned(),
            short_definition: None,
            definition: None,
            category_id: 7,
            rank: 0.9,
            views: Some(1250),
        }
    }

    fn page(items: Vec<SearchHit>) -> Paged<SearchHit> {
        let total = items.len() as u64;
        Paged {
            meta: PageMeta {
                page: 1,
                size: 1,
                total,
                pages: u32::from(total > 0),
            },
            items,
        }
    }

    fn term(id: i64, lang: Language) -> Term {
        Term {
            id,
            slug: "egemendik".to_owned(),
            category_id: 7,
            status: TermStatus::Approved,
            views: 1250,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            language: lang,
            title: "Егемендік".to_owned(),
            definition: "Аумақ бойынша жоғары билік.".to_owned(),
            short_definition: None,
            examples: Some("Бірінші мысал.\nЕкінші мысал.".to_owned()),
            synonyms: Some("Автономия, Тәуелсіздік".to_owned()),
            antonyms: None,
            tags: Vec::new(),
        }
    }

    fn service(search: MockSearchGateway, terms: MockTermGateway) -> LookupService {
        LookupService::new(Arc::new(search), Arc::new(terms))
    }

    #[tokio::test]
    async fn resolves_best_hit_into_a_card() {
        let mut search = MockSearchGateway::new();
        search
            .expect_search()
            .withf(|query| {
                query.q == "егемендік"
                    && query.page.is_some_and(|page| page.size() == 1)
            })
            .times(1)
            .returning(|_| Ok(page(vec![hit(42)])));
        let mut terms = MockTermGateway::new();
        terms
            .expect_fetch_term()
            .withf(|id, lang| *id == 42 && *lang == Language::Kk)
            .times(1)
            .returning(|id, lang| Ok(term(id, lang)));

        let card = service(search, terms)
            .lookup("егемендік", Language::Ru, Language::Kk)
            .await
            .expect("lookup succeeds");

        assert_eq!(card.word, "Егемендік");
        let definition = card.definitions.get(&Language::Kk).expect("kk definition");
        assert_eq!(definition.examples.len(), 2);
        assert_eq!(definition.synonyms, ["Автономия", "Тәуелсіздік"]);
    }

    #[tokio::test]
    async fn zero_hits_is_not_found_without_fallback() {
        let mut search = MockSearchGateway::new();
        search.expect_search().times(1).returning(|_| Ok(page(vec![])));
        let mut terms = MockTermGateway::new();
        terms.expect_fetch_term().never();

        let error = service(search, terms)
            .lookup("nosuchword", Language::En, Language::En)
            .await
            .expect_err("zero hits must not resolve");

        assert!(matches!(error, LookupError::NotFound { .. }));
    }

    #[tokio::test]
    async fn failing_search_falls_back_to_offline_seed() {
        let mut search = MockSearchGateway::new();
        search
            .expect_search()
            .times(1)
            .returning(|_| Err(ClientError::transport("connection refused")));
        let terms = MockTermGateway::new();

        let card = service(search, terms)
            .lookup("Sovereignty", Language::En, Language::Ru)
            .await
            .expect("seed word resolves offline");

        assert_eq!(card.word, "Sovereignty");
        assert_eq!(
            card.translations.get(&Language::Kk).map(String::as_str),
            Some("Егемендік")
        );
    }

    #[tokio::test]
    async fn offline_fallback_matches_translations_too() {
        let mut search = MockSearchGateway::new();
        search
            .expect_search()
            .times(1)
            .returning(|_| Err(ClientError::transport("offline")));

        let card = service(search, MockTermGateway::new())
            .lookup("суверенитет", Language::Ru, Language::En)
            .await
            .expect("russian translation resolves the same seed");
        assert_eq!(card.word, "Sovereignty");
    }

    #[tokio::test]
    async fn offline_miss_lists_known_words() {
        let mut search = MockSearchGateway::new();
        search
            .expect_search()
            .times(1)
            .returning(|_| Err(ClientError::transport("offline")));

        let error = service(search, MockTermGateway::new())
            .lookup("blockchain", Language::En, Language::En)
            .await
            .expect_err("unknown word misses offline");

        match error {
            LookupError::OfflineMiss { known, .. } => {
                assert!(known.contains("Sovereignty"));
                assert!(known.contains("Heritage"));
            }
            other => panic!("expected OfflineMiss, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_query_is_rejected_before_dispatch() {
        let mut search = MockSearchGateway::new();
        search.expect_search().never();

        let error = service(search, MockTermGateway::new())
            .lookup("   ", Language::En, Language::En)
            .await
            .expect_err("blank query is invalid");
        assert_eq!(error, LookupError::EmptyQuery);
    }

    #[test]
    fn glossary_holds_all_seven_seeds() {
        assert_eq!(OfflineGlossary.cards().len(), 7);
    }
}
