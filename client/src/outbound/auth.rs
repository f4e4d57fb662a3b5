//! Auth service adapter: accounts, sessions, and the refresh transport.
//!
//! The auth service wraps every response body: registration and profile
//! reads return `{user}`, login returns `{user, tokens}`, and the refresh
//! exchange returns `{tokens}`. The wrapper DTOs here unwrap those
//! envelopes so callers see plain records.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{ApiSettings, Service};
use crate::domain::error::{normalize_error_body, ClientError};
use crate::domain::model::{TokenPair, User};
use crate::outbound::http::{Auth, HttpClient};
use crate::session::TokenRefresher;
use crate::storage::LocalStore;

const REGISTER_PATH: &str = "/auth/register";
const LOGIN_PATH: &str = "/auth/login";
const LOGOUT_PATH: &str = "/auth/logout";
const REFRESH_PATH: &str = "/auth/refresh";
const PROFILE_PATH: &str = "/profile";
const CHANGE_PASSWORD_PATH: &str = "/profile/password/change";
const FORGOT_PASSWORD_PATH: &str = "/auth/password/forgot";
const RESET_PASSWORD_PATH: &str = "/auth/password/reset";
const VERIFY_EMAIL_PATH: &str = "/auth/email/verify";

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Serialize)]
struct ChangePasswordRequest<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

#[derive(Debug, Serialize)]
struct ForgotPasswordRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct ResetPasswordRequest<'a> {
    token: &'a str,
    new_password: &'a str,
}

#[derive(Debug, Serialize)]
struct VerifyEmailRequest<'a> {
    token: &'a str,
}

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    user: User,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    user: User,
    tokens: TokenPair,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    tokens: TokenPair,
}

/// An established session: the signed-in account and its token pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// The signed-in account.
    pub user: User,
    /// The issued token pair, already persisted.
    pub tokens: TokenPair,
}

/// Profile fields that may be changed; absent fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Typed client for the auth service.
pub struct AuthClient {
    http: Arc<HttpClient>,
    store: Arc<LocalStore>,
}

impl AuthClient {
    /// Wire the adapter to the shared request core and token store.
    #[must_use]
    pub fn new(http: Arc<HttpClient>, store: Arc<LocalStore>) -> Self {
        Self { http, store }
    }

    /// Create an account. The caller still needs to log in afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport and server failures, including
    /// the 409 raised for an already-registered email.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, ClientError> {
        let envelope: UserEnvelope = self
            .http
            .post_json(
                Service::Auth,
                REGISTER_PATH,
                &RegisterRequest {
                    name,
                    email,
                    password,
                },
                Auth::Anonymous,
            )
            .await?;
        Ok(envelope.user)
    }

    /// Exchange credentials for a session and persist its token pair.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport and server failures; nothing is
    /// stored on failure.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ClientError> {
        let response: LoginResponse = self
            .http
            .post_json(
                Service::Auth,
                LOGIN_PATH,
                &LoginRequest { email, password },
                Auth::Anonymous,
            )
            .await?;
        if let Err(error) = self
            .store
            .set_tokens(&response.tokens.access_token, &response.tokens.refresh_token)
        {
            warn!(error = %error, "login succeeded but tokens could not be persisted");
        }
        info!(user_id = response.user.id, "session established");
        Ok(AuthSession {
            user: response.user,
            tokens: response.tokens,
        })
    }

    /// End the session. The server-side revocation is best effort; the local
    /// pair is always cleared.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] only when clearing the local store
    /// fails.
    pub async fn logout(&self) -> Result<(), ClientError> {
        if let Some(tokens) = self.store.tokens() {
            let request = RefreshRequest {
                refresh_token: &tokens.refresh_token,
            };
            if let Err(error) = self
                .http
                .post_unit(Service::Auth, LOGOUT_PATH, &request, Auth::Required)
                .await
            {
                warn!(error = %error, "remote logout failed, clearing local session anyway");
            }
        }
        self.store
            .clear_tokens()
            .map_err(|error| ClientError::transport(error.to_string()))
    }

    /// Fetch the signed-in account.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::SessionExpired`] when no session can be
    /// re-established, and other [`ClientError`] variants as usual.
    pub async fn profile(&self) -> Result<User, ClientError> {
        let envelope: UserEnvelope = self
            .http
            .get_json(Service::Auth, PROFILE_PATH, &[], Auth::Required)
            .await?;
        Ok(envelope.user)
    }

    /// Update profile fields on the signed-in account.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport, authentication, and server
    /// failures.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ClientError> {
        let envelope: UserEnvelope = self
            .http
            .patch_json(Service::Auth, PROFILE_PATH, update, Auth::Required)
            .await?;
        Ok(envelope.user)
    }

    /// Change the account password.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport, authentication, and server
    /// failures, including the 400 raised for a wrong current password.
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ClientError> {
        self.http
            .post_unit(
                Service::Auth,
                CHANGE_PASSWORD_PATH,
                &ChangePasswordRequest {
                    current_password,
                    new_password,
                },
                Auth::Required,
            )
            .await
    }

    /// Start a password reset for the given email.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport and server failures.
    pub async fn forgot_password(&self, email: &str) -> Result<(), ClientError> {
        self.http
            .post_unit(
                Service::Auth,
                FORGOT_PASSWORD_PATH,
                &ForgotPasswordRequest { email },
                Auth::Anonymous,
            )
            .await
    }

    /// Complete a password reset with the emailed token.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport and server failures.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), ClientError> {
        self.http
            .post_unit(
                Service::Auth,
                RESET_PASSWORD_PATH,
                &ResetPasswordRequest {
                    token,
                    new_password,
                },
                Auth::Anonymous,
            )
            .await
    }

    /// Confirm an email address with the emailed token.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport and server failures.
    pub async fn verify_email(&self, token: &str) -> Result<(), ClientError> {
        self.http
            .post_unit(
                Service::Auth,
                VERIFY_EMAIL_PATH,
                &VerifyEmailRequest { token },
                Auth::Anonymous,
            )
            .await
    }
}

/// Bare transport for `POST auth/refresh`.
///
/// The refresh exchange deliberately bypasses [`HttpClient`]: a 401 during
/// refresh must not trigger another refresh, so this transport talks
/// straight to reqwest and maps responses the same way the request core
/// does.
pub struct RefreshTransport {
    http: reqwest::Client,
    settings: ApiSettings,
}

impl RefreshTransport {
    /// Build the transport with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] when the connector setup fails.
    pub fn new(settings: ApiSettings) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|error| ClientError::transport(error.to_string()))?;
        Ok(Self { http, settings })
    }
}

#[async_trait]
impl TokenRefresher for RefreshTransport {
    async fn exchange(&self, refresh_token: &str) -> Result<TokenPair, ClientError> {
        let url = self
            .settings
            .endpoint(Service::Auth, REFRESH_PATH)
            .map_err(|error| ClientError::transport(error.to_string()))?;
        let response = self
            .http
            .post(url)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await
            .map_err(|error| {
                if error.is_timeout() {
                    ClientError::timeout(error.to_string())
                } else {
                    ClientError::transport(error.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| ClientError::transport(error.to_string()))?;
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                envelope: normalize_error_body(status.as_u16(), &body),
            });
        }
        let envelope: RefreshResponse = serde_json::from_slice(&body)
            .map_err(|error| ClientError::decode(error.to_string()))?;
        Ok(envelope.tokens)
    }
}

#[cfg(test)]
mod tests {
    //! Envelope decoding and endpoint-path coverage.

    use super::*;
    use rstest::rstest;

    const LOGIN_BODY: &str = r#"{
        "user": {
            "id": 3, "name": "Aida", "email": "aida@example.kz",
            "role": "editor", "is_email_verified": true
        },
        "tokens": {
            "access_token": "acc-1", "refresh_token": "ref-1",
            "token_type": "bearer", "expires_in": 900
        }
    }"#;

    #[test]
    fn login_body_unwraps_user_and_tokens() {
        let response: LoginResponse = serde_json::from_str(LOGIN_BODY).expect("login decodes");
        assert_eq!(response.user.email, "aida@example.kz");
        assert_eq!(response.tokens.access_token, "acc-1");
    }

    #[test]
    fn refresh_body_unwraps_tokens() {
        let body = r#"{
            "tokens": {
                "access_token": "acc-2", "refresh_token": "ref-2",
                "token_type": "bearer", "expires_in": 900
            }
        }"#;

        let response: RefreshResponse = serde_json::from_str(body).expect("refresh decodes");
        assert_eq!(response.tokens.refresh_token, "ref-2");
    }

    #[test]
    fn profile_body_unwraps_user() {
        let body = r#"{
            "user": {
                "id": 3, "name": "Aida", "email": "aida@example.kz",
                "role": "editor", "is_email_verified": false
            }
        }"#;

        let envelope: UserEnvelope = serde_json::from_str(body).expect("profile decodes");
        assert_eq!(envelope.user.id, 3);
    }

    #[test]
    fn bare_token_body_is_rejected() {
        let body = r#"{
            "access_token": "acc-1", "refresh_token": "ref-1",
            "token_type": "bearer", "expires_in": 900
        }"#;
        assert!(
            serde_json::from_str::<RefreshResponse>(body).is_err(),
            "unwrapped token bodies do not conform to the contract"
        );
    }

    fn settings() -> ApiSettings {
        ApiSettings {
            auth_url: None,
            dictionary_url: None,
            search_url: None,
            import_export_url: None,
            admin_url: None,
            api_version: None,
            timeout_seconds: None,
            store_path: None,
        }
    }

    #[rstest]
    #[case::profile(PROFILE_PATH, "http://localhost:8001/api/v1/profile")]
    #[case::change_password(
        CHANGE_PASSWORD_PATH,
        "http://localhost:8001/api/v1/profile/password/change"
    )]
    #[case::forgot(
        FORGOT_PASSWORD_PATH,
        "http://localhost:8001/api/v1/auth/password/forgot"
    )]
    #[case::reset(
        RESET_PASSWORD_PATH,
        "http://localhost:8001/api/v1/auth/password/reset"
    )]
    #[case::verify(VERIFY_EMAIL_PATH, "http://localhost:8001/api/v1/auth/email/verify")]
    fn account_endpoints_follow_the_service_routes(#[case] path: &str, #[case] expected: &str) {
        let url = settings()
            .endpoint(Service::Auth, path)
            .expect("endpoint builds");
        assert_eq!(url.as_str(), expected);
    }
}
