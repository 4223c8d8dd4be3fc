//! Search transport
//!
//! A [`SearchTransport`] performs one search request and honours a
//! cancellation token. [`HttpTransport`] talks to the QuestSearch HTTP API.

use std::time::Duration;

use async_trait::async_trait;
use questsearch_core::{ApiResponse, ClientConfig, SearchData};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use crate::params::SearchParams;

/// Message shown when a failure carries no usable message of its own
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred while fetching questions";

/// Errors raised while fetching search results
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request was superseded; never shown to users
    #[error("Request cancelled")]
    Cancelled,

    /// The API answered with an error envelope
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Transport-level failure (connect, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not a valid envelope
    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl FetchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Human-readable message for display
    pub fn user_message(&self) -> String {
        let message = match self {
            Self::Api { message, .. } => message.clone(),
            other => other.to_string(),
        };
        if message.trim().is_empty() {
            DEFAULT_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}

/// Performs search requests
#[async_trait]
pub trait SearchTransport: Send + Sync + 'static {
    /// Fetch one page of results
    ///
    /// Implementations return `FetchError::Cancelled` once `cancel` fires.
    async fn fetch(
        &self,
        params: &SearchParams,
        cancel: CancellationToken,
    ) -> Result<SearchData, FetchError>;
}

/// HTTP transport for `GET {base_url}/api/search`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Create a transport for the API at `base_url`
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` for a malformed base URL and
    /// `FetchError::Http` if the client cannot be built
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base.join("api/search")?;

        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, FetchError> {
        Self::new(&config.base_url, config.timeout())
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn send(&self, params: &SearchParams) -> Result<SearchData, FetchError> {
        debug!("GET {} query={:?} page={}", self.endpoint, params.query, params.page);

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&params.to_query_pairs())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let envelope: Option<ApiResponse<SearchData>> = serde_json::from_str(&body).ok();

        match envelope {
            Some(ApiResponse {
                success: true,
                data: Some(data),
                ..
            }) if status.is_success() => Ok(data),
            Some(envelope) => Err(FetchError::Api {
                status: status.as_u16(),
                message: envelope.message,
            }),
            None if status.is_success() => Err(FetchError::Decode(format!(
                "unexpected body from {}",
                self.endpoint
            ))),
            None => Err(FetchError::Api {
                status: status.as_u16(),
                message: format!(
                    "Request failed with status code {}",
                    status.as_u16()
                ),
            }),
        }
    }
}

#[async_trait]
impl SearchTransport for HttpTransport {
    async fn fetch(
        &self,
        params: &SearchParams,
        cancel: CancellationToken,
    ) -> Result<SearchData, FetchError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            result = self.send(params) => result,
        }
    }
}
