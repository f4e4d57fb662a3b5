//! Outbound adapters for the five backend services.
//!
//! Every adapter is a thin, typed wrapper over [`http::HttpClient`], which
//! owns endpoint construction, bearer injection, the single
//! 401-refresh-replay cycle, and error-envelope normalisation. Adapters add
//! nothing but paths, request bodies, and response types.

pub mod admin;
pub mod auth;
pub mod dictionary;
pub mod http;
pub mod search;
pub mod transfer;

pub use admin::{AdminClient, AuditQuery, DEFAULT_AUDIT_LIMIT};
pub use auth::{AuthClient, AuthSession, ProfileUpdate, RefreshTransport};
pub use dictionary::{DictionaryClient, TermRenderings};
pub use http::{Auth, HttpClient};
pub use search::{SearchClient, DEFAULT_AUTOCOMPLETE_LIMIT};
pub use transfer::{ExportFilter, ImportExportClient, TransferFormat};
