//! HTTP transport shared by every screen and service.
//!
//! Two cross-cutting contracts live here so callers never repeat them:
//! - every request carries the persisted bearer token, if any, falling back
//!   to the session's token when it could not be persisted;
//! - a 401 from anything but the credential endpoints tears the session down
//!   and sends the navigator to the login screen.
//!
//! All other failures are handed back unchanged. Nothing is retried.

use log::{debug, warn};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::configuration::ClientConfig;
use crate::error_handling::types::ApiError;
use crate::routing::navigator::Navigator;
use crate::session_management::session::SharedSession;
use crate::storage::credentials::CredentialStore;

use super::types::{is_credentials_endpoint, RequestBody};

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    credentials: CredentialStore,
    session: SharedSession,
    navigator: Navigator,
}

impl ApiClient {
    pub fn new(
        config: &ClientConfig,
        credentials: CredentialStore,
        session: SharedSession,
        navigator: Navigator,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_base().to_string(),
            credentials,
            session,
            navigator,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> Result<String, ApiError> {
        if !path.starts_with('/') {
            return Err(ApiError::InvalidRequest(format!(
                "endpoint path must start with '/': {}",
                path
            )));
        }
        Ok(format!("{}{}", self.base_url, path))
    }

    /// Sends a request and returns the raw response when its status is 2xx.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<Response, ApiError> {
        let url = self.url_for(path)?;
        let mut request = self.http.request(method.clone(), &url);

        if let Some(token) = self.bearer_token() {
            request = request.bearer_auth(token);
        }

        request = match body {
            RequestBody::Empty => request,
            RequestBody::Json(value) => request.json(&value),
            RequestBody::Multipart(form) => request.multipart(form),
        };

        debug!("{} {}", method, url);
        let response = request.send().await.map_err(|e| {
            warn!("{} {} failed: {}", method, url, e);
            ApiError::Transport(e)
        })?;

        let status = response.status();
        if status.is_success() {
            debug!("{} {} -> {}", method, url, status);
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED && !is_credentials_endpoint(path) {
            self.handle_unauthorized(path);
        }

        let body = response.text().await.unwrap_or_default();
        debug!("{} {} -> {} {}", method, url, status, body);
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }

    /// Persisted token, else the in-memory one when persisting it failed.
    fn bearer_token(&self) -> Option<String> {
        self.credentials
            .token()
            .or_else(|| self.session.read().token.clone())
    }

    /// Drops the persisted and in-memory credentials, then leaves the
    /// current screen for the login screen.
    fn handle_unauthorized(&self, path: &str) {
        warn!("{} answered 401, clearing session", path);
        self.credentials.clear();
        self.session.write().clear_credentials();
        self.navigator.redirect_to_login();
    }

    /// Sends a request and decodes the JSON response body.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<T, ApiError> {
        let response = self.send(method, path, body).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(ApiError::Decode)
    }

    /// Sends a request and ignores whatever body comes back.
    pub async fn execute(&self, method: Method, path: &str, body: RequestBody) -> Result<(), ApiError> {
        self.send(method, path, body).await.map(|_| ())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, RequestBody::Empty).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::POST, path, json_body(body)?).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::PUT, path, json_body(body)?).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(Method::DELETE, path, RequestBody::Empty).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ApiError> {
        self.request(Method::POST, path, RequestBody::Multipart(form)).await
    }
}

fn json_body<B: Serialize + ?Sized>(body: &B) -> Result<RequestBody, ApiError> {
    serde_json::to_value(body)
        .map(RequestBody::Json)
        .map_err(ApiError::Encode)
}
