//! Transport-agnostic types and orchestration logic.
//!
//! Everything here can be exercised without a network: records, languages,
//! error normalisation, route parsing, catalog refinement, form validation,
//! and the lookup orchestrator behind its gateway ports.

pub mod catalog;
pub mod error;
pub mod favorites;
pub mod language;
pub mod lookup;
pub mod model;
pub mod ports;
pub mod query;
pub mod routing;
pub mod validate;

pub use error::{ClientError, ErrorEnvelope};
pub use language::Language;
pub use model::{Category, Favorite, SearchHit, Term, TermCard, TermStatus, User};
