//! GraphQL transport over reqwest
//!
//! A request is an operation document plus named variables; the response
//! envelope is decoded and its `data` field deserialized into the caller's
//! typed shape. HTTP-level failures and GraphQL `errors` entries both surface
//! as [`ApiError`].

use std::time::Duration;

use reqwest::{Client as HttpClient, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{ApiError, Result};

/// One GraphQL operation: document text plus named variables.
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest {
    query: String,
    variables: Map<String, Value>,
}

impl GraphQlRequest {
    pub fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
            variables: Map::new(),
        }
    }

    /// Attach a named variable.
    pub fn var<T: Serialize>(mut self, name: &str, value: T) -> Result<Self> {
        let value = serde_json::to_value(value)?;
        self.variables.insert(name.to_string(), value);
        Ok(self)
    }
}

#[derive(Debug, serde::Deserialize)]
struct GraphQlEnvelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlErrorEntry>,
}

#[derive(Debug, serde::Deserialize)]
struct GraphQlErrorEntry {
    message: String,
}

/// GraphQL client bound to one endpoint and bearer token.
pub struct GraphQlClient {
    http: HttpClient,
    endpoint: String,
    token: String,
}

impl GraphQlClient {
    /// Create a client against the given endpoint URL.
    pub fn new(endpoint: String, token: String) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            endpoint,
            token,
        })
    }

    /// Execute one operation and deserialize the `data` payload.
    ///
    /// Attempted exactly once; no retry on any failure.
    pub async fn run<T: DeserializeOwned>(&self, request: &GraphQlRequest) -> Result<T> {
        log::debug!("POST {}", self.endpoint);

        let response = self
            .http
            .post(&self.endpoint)
            .header("Authorization", &self.token)
            .json(request)
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        match status {
            StatusCode::OK => {
                let envelope = response.json::<GraphQlEnvelope<T>>().await.map_err(|e| {
                    ApiError::InvalidResponse(format!("Failed to parse response: {}", e))
                })?;

                if !envelope.errors.is_empty() {
                    let messages: Vec<String> =
                        envelope.errors.into_iter().map(|e| e.message).collect();
                    return Err(ApiError::BadRequest(messages.join("; ")).into());
                }

                envelope.data.ok_or_else(|| {
                    ApiError::InvalidResponse("Response contained no data".to_string()).into()
                })
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::Unauthorized.into()),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Bad request".to_string());
                Err(ApiError::BadRequest(error_msg).into())
            }
            status if status.is_server_error() => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| format!("Server error: {}", status));
                Err(ApiError::ServerError(error_msg).into())
            }
            _ => {
                let error_msg = format!("Unexpected status code: {}", status);
                Err(ApiError::InvalidResponse(error_msg).into())
            }
        }
    }
}
