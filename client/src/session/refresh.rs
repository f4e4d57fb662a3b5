//! Single-flight token refresh with a FIFO replay queue.
//!
//! Any authenticated request that receives a 401 asks the coordinator for a
//! fresh access token. At most one refresh exchange runs at a time: the
//! first caller becomes the leader and performs the exchange; callers that
//! arrive while it is in flight enqueue a oneshot continuation and are
//! answered in arrival order once the exchange resolves. A failed exchange
//! rejects the leader and every queued caller, and clears the stored token
//! pair so the session drops back to anonymous.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{oneshot, Mutex};
use tracing::{debug, warn};

use crate::domain::error::ClientError;
use crate::domain::model::TokenPair;
use crate::storage::LocalStore;

/// Exchanges a refresh token for a fresh pair against the auth service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Perform `POST auth/refresh` with the given refresh token.
    async fn exchange(&self, refresh_token: &str) -> Result<TokenPair, ClientError>;
}

/// Failures surfaced by [`RefreshCoordinator::fresh_access_token`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RefreshError {
    /// No refresh token is stored; the caller was never (or is no longer)
    /// signed in.
    #[error("no refresh token available, sign in required")]
    NoRefreshToken,
    /// The exchange itself failed; stored tokens have been cleared.
    #[error("token refresh failed: {0}")]
    Exchange(ClientError),
}

enum RefreshState {
    Idle,
    Refreshing {
        waiters: Vec<oneshot::Sender<Result<String, RefreshError>>>,
    },
}

/// Serialises refresh exchanges and replays queued callers.
pub struct RefreshCoordinator {
    refresher: Arc<dyn TokenRefresher>,
    store: Arc<LocalStore>,
    state: Mutex<RefreshState>,
}

impl RefreshCoordinator {
    /// Wire the coordinator to its exchange transport and token store.
    #[must_use]
    pub fn new(refresher: Arc<dyn TokenRefresher>, store: Arc<LocalStore>) -> Self {
        Self {
            refresher,
            store,
            state: Mutex::new(RefreshState::Idle),
        }
    }

    /// Obtain a fresh access token, joining an in-flight refresh if one
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError::NoRefreshToken`] for anonymous sessions and
    /// [`RefreshError::Exchange`] when the exchange fails; in both cases the
    /// stored pair is cleared.
    pub async fn fresh_access_token(&self) -> Result<String, RefreshError> {
        let waiter = {
            let mut state = self.state.lock().await;
            match &mut *state {
                RefreshState::Refreshing { waiters } => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    Some(rx)
                }
                RefreshState::Idle => {
                    *state = RefreshState::Refreshing {
                        waiters: Vec::new(),
                    };
                    None
                }
            }
        };

        if let Some(rx) = waiter {
            debug!("joining in-flight token refresh");
            return rx.await.unwrap_or_else(|_| {
                // The leader was dropped mid-refresh (task cancellation).
                Err(RefreshError::Exchange(ClientError::transport(
                    "refresh was cancelled",
                )))
            });
        }

        let outcome = self.perform_exchange().await;

        let waiters = {
            let mut state = self.state.lock().await;
            match std::mem::replace(&mut *state, RefreshState::Idle) {
                RefreshState::Refreshing { waiters } => waiters,
                RefreshState::Idle => Vec::new(),
            }
        };
        // Drain in arrival order so queued requests replay FIFO.
        for waiter in waiters {
            let _ = waiter.send(outcome.clone());
        }

        outcome
    }

    async fn perform_exchange(&self) -> Result<String, RefreshError> {
        let Some(tokens) = self.store.tokens() else {
            return Err(RefreshError::NoRefreshToken);
        };

        match self.refresher.exchange(&tokens.refresh_token).await {
            Ok(pair) => {
                if let Err(error) = self.store.set_tokens(&pair.access_token, &pair.refresh_token)
                {
                    warn!(error = %error, "refreshed tokens could not be persisted");
                }
                Ok(pair.access_token)
            }
            Err(error) => {
                warn!(error = %error, "token refresh failed, clearing session");
                if let Err(store_error) = self.store.clear_tokens() {
                    warn!(error = %store_error, "failed to clear tokens after refresh failure");
                }
                Err(RefreshError::Exchange(error))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Single-flight, replay, and failure-path coverage.

    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::domain::error::ErrorEnvelope;
    use tempfile::TempDir;

    fn pair(access: &str) -> TokenPair {
        TokenPair {
            access_token: access.to_owned(),
            refresh_token: format!("{access}-refresh"),
            token_type: "bearer".to_owned(),
            expires_in: 900,
        }
    }

    fn seeded_store(dir: &TempDir) -> Arc<LocalStore> {
        let store = Arc::new(LocalStore::open(dir.path().join("store.json")));
        store
            .set_tokens("stale-access", "stale-refresh")
            .expect("seed tokens");
        store
    }

    /// Transport stub that counts exchanges and holds each one briefly so
    /// concurrent callers overlap with the in-flight refresh.
    struct SlowRefresher {
        calls: AtomicUsize,
        outcome: Result<TokenPair, ClientError>,
    }

    #[async_trait]
    impl TokenRefresher for SlowRefresher {
        async fn exchange(&self, _refresh_token: &str) -> Result<TokenPair, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.outcome.clone()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_share_one_exchange() {
        let dir = TempDir::new().expect("temp dir");
        let store = seeded_store(&dir);
        let refresher = Arc::new(SlowRefresher {
            calls: AtomicUsize::new(0),
            outcome: Ok(pair("fresh-access")),
        });
        let coordinator = Arc::new(RefreshCoordinator::new(refresher.clone(), store.clone()));

        let leader = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.fresh_access_token().await })
        };
        // Let the leader take ownership of the exchange before others arrive.
        tokio::time::sleep(Duration::from_millis(1)).await;

        let followers: Vec<_> = (0..3)
            .map(|_| {
                let coordinator = coordinator.clone();
                tokio::spawn(async move { coordinator.fresh_access_token().await })
            })
            .collect();

        let leader_token = leader.await.expect("leader task").expect("leader refresh");
        assert_eq!(leader_token, "fresh-access");
        for follower in followers {
            let token = follower.await.expect("follower task").expect("replayed token");
            assert_eq!(token, "fresh-access", "queued callers get the new token");
        }

        assert_eq!(
            refresher.calls.load(Ordering::SeqCst),
            1,
            "exactly one exchange runs for the whole burst"
        );
        let stored = store.tokens().expect("tokens persisted");
        assert_eq!(stored.access_token, "fresh-access");
        assert_eq!(stored.refresh_token, "fresh-access-refresh");
    }

    #[tokio::test(start_paused = true)]
    async fn failed_exchange_rejects_all_and_clears_tokens() {
        let dir = TempDir::new().expect("temp dir");
        let store = seeded_store(&dir);
        let refresher = Arc::new(SlowRefresher {
            calls: AtomicUsize::new(0),
            outcome: Err(ClientError::Api {
                status: 401,
                envelope: ErrorEnvelope::new("UNAUTHORIZED", "refresh token revoked"),
            }),
        });
        let coordinator = Arc::new(RefreshCoordinator::new(refresher, store.clone()));

        let leader = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.fresh_access_token().await })
        };
        tokio::time::sleep(Duration::from_millis(1)).await;
        let follower = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.fresh_access_token().await })
        };

        assert!(matches!(
            leader.await.expect("leader task"),
            Err(RefreshError::Exchange(_))
        ));
        assert!(matches!(
            follower.await.expect("follower task"),
            Err(RefreshError::Exchange(_))
        ));
        assert!(store.tokens().is_none(), "session dropped to anonymous");
    }

    #[tokio::test]
    async fn anonymous_session_short_circuits() {
        let dir = TempDir::new().expect("temp dir");
        let store = Arc::new(LocalStore::open(dir.path().join("store.json")));
        let mut refresher = MockTokenRefresher::new();
        refresher.expect_exchange().never();

        let coordinator = RefreshCoordinator::new(Arc::new(refresher), store);
        assert_eq!(
            coordinator.fresh_access_token().await,
            Err(RefreshError::NoRefreshToken)
        );
    }

    #[tokio::test]
    async fn sequential_refreshes_run_independently() {
        let dir = TempDir::new().expect("temp dir");
        let store = seeded_store(&dir);
        let mut refresher = MockTokenRefresher::new();
        let mut sequence = mockall::Sequence::new();
        refresher
            .expect_exchange()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_| Ok(pair("first")));
        refresher
            .expect_exchange()
            .withf(|token| token == "first-refresh")
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_| Ok(pair("second")));

        let coordinator = RefreshCoordinator::new(Arc::new(refresher), store);
        assert_eq!(coordinator.fresh_access_token().await.as_deref(), Ok("first"));
        assert_eq!(
            coordinator.fresh_access_token().await.as_deref(),
            Ok("second"),
            "second refresh uses the rotated refresh token"
        );
    }
}
