//! Session lifecycle: anonymous → authenticated → anonymous.
//!
//! The session is defined entirely by what the local store holds: a token
//! pair means authenticated, none means anonymous. Transitions happen on
//! login/registration, logout, and irrecoverable refresh failure; the
//! refresh coordinator in [`refresh`] owns the only piece of real
//! coordination in the client.

pub mod refresh;

use std::sync::Arc;

use crate::storage::LocalStore;

pub use refresh::{RefreshCoordinator, RefreshError, TokenRefresher};

/// Current session state as witnessed by the local store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No usable token pair.
    Anonymous,
    /// A token pair is present (it may still be expired; requests find out).
    Authenticated,
}

/// Read the session state off the store.
#[must_use]
pub fn session_state(store: &Arc<LocalStore>) -> SessionState {
    if store.tokens().is_some() {
        SessionState::Authenticated
    } else {
        SessionState::Anonymous
    }
}
