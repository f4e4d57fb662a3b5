//! Records exchanged with the backend services.
//!
//! These are plain serde shapes mirroring the JSON contracts; the client
//! never owns authoritative copies of them. Request payload types live next
//! to the responses they produce.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::language::Language;

/// Moderation stage of a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermStatus {
    /// Being authored, not yet submitted.
    Draft,
    /// Submitted and awaiting moderation.
    Pending,
    /// Verified by a moderator.
    Approved,
    /// Rejected with a reason.
    Rejected,
}

impl TermStatus {
    /// Stable lowercase code used in query parameters.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// Tag attached to a term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag identifier.
    pub id: i64,
    /// URL-safe tag slug.
    pub slug: String,
}

/// A dictionary entry rendered in a single language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    /// Term identifier.
    pub id: i64,
    /// URL-safe slug.
    pub slug: String,
    /// Owning category.
    pub category_id: i64,
    /// Moderation stage.
    pub status: TermStatus,
    /// View counter.
    pub views: u64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Language this rendering was requested in.
    pub language: Language,
    /// Title in the requested language.
    pub title: String,
    /// Full definition.
    pub definition: String,
    /// Abbreviated definition for list views.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_definition: Option<String>,
    /// Newline-separated usage examples.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<String>,
    /// Comma-separated synonyms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synonyms: Option<String>,
    /// Comma-separated antonyms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub antonyms: Option<String>,
    /// Attached tags.
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Term {
    /// Usage examples split out of the newline-separated wire field.
    #[must_use]
    pub fn example_list(&self) -> Vec<String> {
        self.examples
            .as_deref()
            .unwrap_or_default()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Synonyms split out of the comma-separated wire field.
    #[must_use]
    pub fn synonym_list(&self) -> Vec<String> {
        self.synonyms
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

/// Per-language payload used when creating or updating a term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermTranslation {
    /// Language of this translation (wire code).
    pub language: String,
    /// Title.
    pub title: String,
    /// Full definition.
    pub definition: String,
    /// Abbreviated definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_definition: Option<String>,
    /// Newline-separated usage examples.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<String>,
    /// Comma-separated synonyms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synonyms: Option<String>,
    /// Comma-separated antonyms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub antonyms: Option<String>,
}

/// Payload for `POST terms`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermCreate {
    /// URL-safe slug.
    pub slug: String,
    /// Owning category.
    pub category_id: i64,
    /// Translations, at least one.
    pub translations: Vec<TermTranslation>,
    /// Optional tag slugs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_slugs: Option<Vec<String>>,
}

/// Payload for `PUT terms/:id`; absent fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TermUpdate {
    /// New slug.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// New owning category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    /// Replacement translations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translations: Option<Vec<TermTranslation>>,
    /// Replacement tag slugs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_slugs: Option<Vec<String>>,
}

/// A term grouping, possibly nested under a parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Category identifier.
    pub id: i64,
    /// URL-safe slug.
    pub slug: String,
    /// Parent category, when nested.
    #[serde(default)]
    pub parent_id: Option<i64>,
    /// Title in the requested language.
    pub title: String,
    /// Description in the requested language.
    #[serde(default)]
    pub description: Option<String>,
}

/// Per-language payload used when creating or updating a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTranslation {
    /// Language of this translation (wire code).
    pub language: String,
    /// Title.
    pub title: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Payload for `POST categories`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCreate {
    /// URL-safe slug.
    pub slug: String,
    /// Parent category, when nested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    /// Translations, at least one.
    pub translations: Vec<CategoryTranslation>,
}

/// Ranked, denormalised search projection of a term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Identifier of the matching term.
    pub term_id: i64,
    /// URL-safe slug.
    pub slug: String,
    /// Title in the searched language.
    pub title: String,
    /// Abbreviated definition, when indexed.
    #[serde(default)]
    pub short_definition: Option<String>,
    /// Full definition, when indexed.
    #[serde(default)]
    pub definition: Option<String>,
    /// Owning category.
    pub category_id: i64,
    /// Relevance rank, higher is better.
    pub rank: f64,
    /// View counter, when indexed.
    #[serde(default)]
    pub views: Option<u64>,
}

/// Prefix-match suggestion returned by autocomplete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutocompleteHit {
    /// Identifier of the suggested term.
    pub term_id: i64,
    /// URL-safe slug.
    pub slug: String,
    /// Suggested title.
    pub title: String,
}

/// Role attached to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access.
    Admin,
    /// May curate terms and categories.
    Editor,
    /// May approve or reject submissions.
    Moderator,
    /// Regular account.
    User,
}

/// Account record returned by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Assigned role.
    pub role: Role,
    /// Whether the email address was verified.
    pub is_email_verified: bool,
}

/// Credential pair issued by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived bearer token.
    pub access_token: String,
    /// Long-lived renewal token.
    pub refresh_token: String,
    /// Token scheme, always `bearer`.
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
}

/// (user, term) favourite membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    /// Favourited term.
    pub term_id: i64,
    /// When the favourite was added.
    pub created_at: DateTime<Utc>,
}

/// Reader-suggested term awaiting curation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionCreate {
    /// Suggested term text.
    pub term_text: String,
    /// Optional suggested definition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    /// Language of the suggestion (wire code).
    pub language: String,
    /// Optional target category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
}

/// Single-language block inside a [`TermCard`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    /// The meaning itself.
    pub meaning: String,
    /// Usage examples.
    #[serde(default)]
    pub examples: Vec<String>,
    /// Synonyms.
    #[serde(default)]
    pub synonyms: Vec<String>,
}

/// Uniform cross-language lookup result rendered to the reader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TermCard {
    /// Headword.
    pub word: String,
    /// IPA pronunciation, when known.
    #[serde(default)]
    pub pronunciation: Option<String>,
    /// Headword translations keyed by language.
    #[serde(default)]
    pub translations: BTreeMap<Language, String>,
    /// Definitions keyed by language.
    #[serde(default)]
    pub definitions: BTreeMap<Language, Definition>,
    /// Word origin, when known.
    #[serde(default)]
    pub etymology: Option<String>,
}

/// Import job state reported by the import/export service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportJob {
    /// Job identifier.
    pub job_id: String,
    /// Job state (`pending`, `running`, `done`, `failed`).
    pub status: String,
    /// Rows imported so far.
    pub imported: u64,
    /// Rows rejected so far.
    pub failed: u64,
    /// Per-row validation failures.
    #[serde(default)]
    pub errors: Vec<ImportRowError>,
}

/// One rejected row inside an import job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRowError {
    /// 1-based row number in the uploaded document.
    pub row_number: u64,
    /// Field that failed validation.
    pub field: String,
    /// Human-readable message.
    pub message: String,
}

/// Acknowledgement returned when an import is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStarted {
    /// Job identifier to poll.
    pub job_id: String,
    /// Initial job state.
    pub status: String,
}

/// Admin audit log row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Audit entry identifier.
    pub id: i64,
    /// Acting account.
    pub actor_id: i64,
    /// Performed action code.
    pub action: String,
    /// Kind of the affected entity, e.g. `term`.
    #[serde(default)]
    pub entity_type: Option<String>,
    /// Identifier of the affected entity.
    #[serde(default)]
    pub entity_id: Option<i64>,
    /// Free-form action context.
    #[serde(default, rename = "metadata_json")]
    pub metadata: Option<serde_json::Value>,
    /// When the action happened.
    pub created_at: DateTime<Utc>,
}
