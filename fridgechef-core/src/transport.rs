//! HTTP transport trait and implementations.
//!
//! Every backend call goes through [`Transport`]. The production transport
//! attaches the bearer token and performs the retry-once refresh-and-replay
//! on 401 responses; the mock transport records calls for tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::auth::Session;
use crate::config::Config;
use crate::error::ApiError;

/// A request against the backend API.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path under the base URL, starting with '/'.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::PUT,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::DELETE,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }
}

/// A successful (2xx) response body.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    /// Deserialize the body into a concrete model.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_value(self.body.clone()).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Trait for backend transports, enabling mockability in tests.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// Production transport over reqwest.
pub struct HttpTransport {
    inner: reqwest::Client,
    base_url: String,
    session: Arc<Session>,
}

impl HttpTransport {
    pub fn new(config: &Config, session: Arc<Session>) -> Result<Self, reqwest::Error> {
        let inner = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            inner,
            base_url: config.base_url.clone(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send_once(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let mut builder = self
            .inner
            .request(request.method.clone(), self.url(&request.path));
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        builder.send().await
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// On any failure the stored tokens are cleared and the caller gets
    /// `AuthRequired` (the "redirect to login" signal).
    async fn refresh_access_token(&self) -> Result<String, ApiError> {
        let Some(refresh_token) = self.session.refresh_token().await else {
            tracing::warn!("401 without a stored refresh token");
            return Err(ApiError::AuthRequired);
        };

        let response = self
            .inner
            .post(self.url("/auth/refresh"))
            .json(&serde_json::json!({ "refreshToken": refresh_token }))
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "refresh token rejected, clearing session");
            self.session.clear().await?;
            return Err(ApiError::AuthRequired);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        let Some(access_token) = body.get("accessToken").and_then(Value::as_str) else {
            self.session.clear().await?;
            return Err(ApiError::AuthRequired);
        };

        self.session
            .replace_access_token(access_token.to_string())
            .await?;
        Ok(access_token.to_string())
    }

    async fn into_api_response(response: reqwest::Response) -> Result<ApiResponse, ApiError> {
        let status = response.status().as_u16();
        let text = response.text().await?;
        let body: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text.clone()))
        };

        if !(200..300).contains(&status) {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| text.trim().to_string());
            return Err(ApiError::Status { status, message });
        }

        Ok(ApiResponse { status, body })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let token = self.session.access_token().await;
        tracing::debug!(method = %request.method, path = %request.path, "request");
        let response = self.send_once(&request, token.as_deref()).await?;

        let response = if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            // Retry exactly once with a refreshed access token.
            tracing::debug!(path = %request.path, "401, refreshing access token");
            let new_token = self.refresh_access_token().await?;
            self.send_once(&request, Some(&new_token)).await?
        } else {
            response
        };

        Self::into_api_response(response).await
    }
}

/// Canned response for the mock transport.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Json(Value),
    Error { status: u16, message: String },
}

/// A call observed by the mock transport.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// Mock transport for tests: serves canned responses keyed by path and
/// records every call in order.
#[derive(Default)]
pub struct MockTransport {
    responses: HashMap<String, MockResponse>,
    calls: StdMutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(mut self, path: &str, body: Value) -> Self {
        self.responses
            .insert(path.to_string(), MockResponse::Json(body));
        self
    }

    pub fn with_error(mut self, path: &str, status: u16, message: &str) -> Self {
        self.responses.insert(
            path.to_string(),
            MockResponse::Error {
                status,
                message: message.to_string(),
            },
        );
        self
    }

    /// Calls observed so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method: request.method.clone(),
            path: request.path.clone(),
            body: request.body.clone(),
        });

        match self.responses.get(&request.path) {
            Some(MockResponse::Json(body)) => Ok(ApiResponse {
                status: 200,
                body: body.clone(),
            }),
            Some(MockResponse::Error { status, message }) => Err(ApiError::Status {
                status: *status,
                message: message.clone(),
            }),
            None => Err(ApiError::Decode(format!(
                "no mock response for path: {}",
                request.path
            ))),
        }
    }
}
