//! Shared request core for all service adapters.
//!
//! One [`HttpClient`] instance handles the concerns every adapter would
//! otherwise duplicate: building versioned endpoint URLs, attaching the
//! stored bearer token, retrying exactly once through the refresh
//! coordinator on a 401, distinguishing timeouts from other transport
//! failures, and folding non-2xx bodies into the canonical error envelope.

use std::sync::Arc;

use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::{ApiSettings, Service};
use crate::domain::error::{normalize_error_body, ClientError};
use crate::session::RefreshCoordinator;
use crate::storage::LocalStore;

/// Whether a request runs with the stored bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// Send without credentials.
    Anonymous,
    /// Attach the stored access token; on 401, refresh once and replay.
    Required,
}

/// Request core shared by the service adapters.
pub struct HttpClient {
    http: reqwest::Client,
    settings: ApiSettings,
    store: Arc<LocalStore>,
    refresh: Arc<RefreshCoordinator>,
}

impl HttpClient {
    /// Build the client with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] when the underlying TLS or
    /// connector setup fails.
    pub fn new(
        settings: ApiSettings,
        store: Arc<LocalStore>,
        refresh: Arc<RefreshCoordinator>,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|error| ClientError::transport(error.to_string()))?;
        Ok(Self {
            http,
            settings,
            store,
            refresh,
        })
    }

    /// `GET` returning a decoded JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport, authentication, server, and
    /// decode failures.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        service: Service,
        path: &str,
        query: &[(String, String)],
        auth: Auth,
    ) -> Result<T, ClientError> {
        let response = self
            .execute(auth, || {
                Ok(self.builder(Method::GET, service, path)?.query(query))
            })
            .await?;
        Self::decode_json(response).await
    }

    /// `GET` returning the raw body, for export downloads.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport, authentication, and server
    /// failures.
    pub async fn get_bytes(
        &self,
        service: Service,
        path: &str,
        query: &[(String, String)],
        auth: Auth,
    ) -> Result<Vec<u8>, ClientError> {
        let response = self
            .execute(auth, || {
                Ok(self.builder(Method::GET, service, path)?.query(query))
            })
            .await?;
        let body = response
            .bytes()
            .await
            .map_err(|error| ClientError::transport(error.to_string()))?;
        Ok(body.to_vec())
    }

    /// `POST` a JSON body, decoding a JSON response.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport, authentication, server, and
    /// decode failures.
    pub async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        service: Service,
        path: &str,
        body: &B,
        auth: Auth,
    ) -> Result<T, ClientError> {
        let response = self
            .execute(auth, || {
                Ok(self.builder(Method::POST, service, path)?.json(body))
            })
            .await?;
        Self::decode_json(response).await
    }

    /// `POST` a JSON body, discarding any response body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport, authentication, and server
    /// failures.
    pub async fn post_unit<B: Serialize + Sync>(
        &self,
        service: Service,
        path: &str,
        body: &B,
        auth: Auth,
    ) -> Result<(), ClientError> {
        self.execute(auth, || {
            Ok(self.builder(Method::POST, service, path)?.json(body))
        })
        .await
        .map(drop)
    }

    /// Bodiless `POST`, decoding a JSON response. Used by workflow
    /// transitions such as submit and approve.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport, authentication, server, and
    /// decode failures.
    pub async fn post_empty_json<T: DeserializeOwned>(
        &self,
        service: Service,
        path: &str,
        auth: Auth,
    ) -> Result<T, ClientError> {
        let response = self
            .execute(auth, || self.builder(Method::POST, service, path))
            .await?;
        Self::decode_json(response).await
    }

    /// Bodiless `POST`, discarding any response body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport, authentication, and server
    /// failures.
    pub async fn post_empty_unit(
        &self,
        service: Service,
        path: &str,
        auth: Auth,
    ) -> Result<(), ClientError> {
        self.execute(auth, || self.builder(Method::POST, service, path))
            .await
            .map(drop)
    }

    /// `POST` a multipart form, decoding a JSON response.
    ///
    /// The form is rebuilt through `make_form` on the refresh replay because
    /// multipart bodies cannot be cloned.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport, authentication, server, and
    /// decode failures.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        service: Service,
        path: &str,
        make_form: impl Fn() -> Result<Form, ClientError>,
        auth: Auth,
    ) -> Result<T, ClientError> {
        let response = self
            .execute(auth, || {
                Ok(self
                    .builder(Method::POST, service, path)?
                    .multipart(make_form()?))
            })
            .await?;
        Self::decode_json(response).await
    }

    /// `PUT` a JSON body, decoding a JSON response.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport, authentication, server, and
    /// decode failures.
    pub async fn put_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        service: Service,
        path: &str,
        body: &B,
        auth: Auth,
    ) -> Result<T, ClientError> {
        let response = self
            .execute(auth, || {
                Ok(self.builder(Method::PUT, service, path)?.json(body))
            })
            .await?;
        Self::decode_json(response).await
    }

    /// `PATCH` a JSON body, decoding a JSON response.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport, authentication, server, and
    /// decode failures.
    pub async fn patch_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        service: Service,
        path: &str,
        body: &B,
        auth: Auth,
    ) -> Result<T, ClientError> {
        let response = self
            .execute(auth, || {
                Ok(self.builder(Method::PATCH, service, path)?.json(body))
            })
            .await?;
        Self::decode_json(response).await
    }

    /// `DELETE`, discarding any response body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport, authentication, and server
    /// failures.
    pub async fn delete(
        &self,
        service: Service,
        path: &str,
        auth: Auth,
    ) -> Result<(), ClientError> {
        self.execute(auth, || self.builder(Method::DELETE, service, path))
            .await
            .map(drop)
    }

    fn builder(
        &self,
        method: Method,
        service: Service,
        path: &str,
    ) -> Result<RequestBuilder, ClientError> {
        let url = self
            .settings
            .endpoint(service, path)
            .map_err(|error| ClientError::transport(error.to_string()))?;
        Ok(self.http.request(method, url))
    }

    /// Send the request, refreshing and replaying exactly once on a 401 when
    /// the call requires authentication.
    async fn execute(
        &self,
        auth: Auth,
        make: impl Fn() -> Result<RequestBuilder, ClientError>,
    ) -> Result<Response, ClientError> {
        let response = self.dispatch(self.authorized(make()?, auth)).await?;
        if response.status() != StatusCode::UNAUTHORIZED || auth != Auth::Required {
            return Self::accept(response).await;
        }

        debug!("401 on authenticated request, refreshing token");
        let token = self
            .refresh
            .fresh_access_token()
            .await
            .map_err(|_| ClientError::SessionExpired)?;
        let replay = self.dispatch(make()?.bearer_auth(token)).await?;
        Self::accept(replay).await
    }

    fn authorized(&self, builder: RequestBuilder, auth: Auth) -> RequestBuilder {
        match auth {
            Auth::Anonymous => builder,
            Auth::Required => match self.store.tokens() {
                // No stored pair: let the server answer 401 and the refresh
                // path surface SessionExpired.
                None => builder,
                Some(tokens) => builder.bearer_auth(&tokens.access_token),
            },
        }
    }

    async fn dispatch(&self, builder: RequestBuilder) -> Result<Response, ClientError> {
        builder.send().await.map_err(|error| {
            if error.is_timeout() {
                ClientError::timeout(error.to_string())
            } else {
                ClientError::transport(error.to_string())
            }
        })
    }

    /// Pass 2xx responses through; fold anything else into the envelope.
    async fn accept(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .bytes()
            .await
            .map_err(|error| ClientError::transport(error.to_string()))?;
        Err(ClientError::Api {
            status: status.as_u16(),
            envelope: normalize_error_body(status.as_u16(), &body),
        })
    }

    async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let body = response
            .bytes()
            .await
            .map_err(|error| ClientError::transport(error.to_string()))?;
        serde_json::from_slice(&body).map_err(|error| ClientError::decode(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    //! Bearer-injection coverage; the refresh-replay cycle itself is
    //! exercised through the session tests.

    use super::*;
    use tempfile::TempDir;

    use crate::session::refresh::MockTokenRefresher;

    fn client(store: Arc<LocalStore>) -> HttpClient {
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
        let refresh = Arc::new(RefreshCoordinator::new(
            Arc::new(MockTokenRefresher::new()),
            store.clone(),
        ));
        HttpClient::new(settings, store, refresh).expect("client builds")
    }

    #[test]
    fn required_auth_attaches_the_stored_bearer() {
        let dir = TempDir::new().expect("temp dir");
        let store = Arc::new(LocalStore::open(dir.path().join("store.json")));
        store.set_tokens("access-abc", "refresh-abc").expect("seed");
        let client = client(store);

        let builder = client
            .builder(Method::GET, Service::Dictionary, "/terms")
            .expect("builder");
        let request = client
            .authorized(builder, Auth::Required)
            .build()
            .expect("request builds");
        let header = request
            .headers()
            .get("authorization")
            .and_then(|value| value.to_str().ok());
        assert_eq!(header, Some("Bearer access-abc"));
    }

    #[test]
    fn anonymous_requests_carry_no_credentials() {
        let dir = TempDir::new().expect("temp dir");
        let store = Arc::new(LocalStore::open(dir.path().join("store.json")));
        store.set_tokens("access-abc", "refresh-abc").expect("seed");
        let client = client(store);

        let builder = client
            .builder(Method::GET, Service::Search, "/search")
            .expect("builder");
        let request = client
            .authorized(builder, Auth::Anonymous)
            .build()
            .expect("request builds");
        assert!(request.headers().get("authorization").is_none());
    }

    #[test]
    fn missing_tokens_send_without_a_header() {
        let dir = TempDir::new().expect("temp dir");
        let store = Arc::new(LocalStore::open(dir.path().join("store.json")));
        let client = client(store);

        let builder = client
            .builder(Method::GET, Service::Dictionary, "/favorites")
            .expect("builder");
        let request = client
            .authorized(builder, Auth::Required)
            .build()
            .expect("request builds");
        assert!(request.headers().get("authorization").is_none());
    }
}
