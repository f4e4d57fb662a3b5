//! Sozdik: a trilingual (Kazakh/Russian/English) terminology dictionary
//! client.
//!
//! The crate is split along a hexagonal seam:
//!
//! - [`domain`] holds the pure decision logic: the language set, routing,
//!   catalog refinement, query builders, error normalisation, and the lookup
//!   orchestrator with its offline glossary.
//! - [`outbound`] holds the reqwest adapters for the five backend services,
//!   all sharing one request core that owns bearer injection and the
//!   401-refresh-replay cycle.
//! - [`session`] owns the token lifecycle, including the single-flight
//!   refresh coordinator.
//! - [`storage`] is the file-backed stand-in for browser local storage.
//! - [`cli`] is the terminal shell over all of the above.

pub mod cli;
pub mod config;
pub mod domain;
pub mod outbound;
pub mod session;
pub mod storage;

pub use domain::{ClientError, ErrorEnvelope, Language};
