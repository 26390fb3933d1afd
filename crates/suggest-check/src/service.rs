//! The remote grammar checker.
//!
//! Wire contract: `POST <endpoint>` with `{"sentence": "<text>"}`; the answer is a JSON object
//! with an `actions` array (see [`CheckResponse`]). Token offsets inside each action must be
//! char offsets into the exact sentence text that was sent.

use crate::config::SuggestConfig;
use crate::error::CheckError;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use suggest_core::CheckResponse;

/// Maximum number of error-body bytes kept in [`CheckError::Status`].
const MAX_ERROR_BODY_BYTES: usize = 2 * 1024;

/// A service that checks one sentence.
pub trait GrammarService: Send + Sync {
    /// Check `sentence` and return the raw response.
    fn check(
        &self,
        sentence: &str,
    ) -> impl Future<Output = Result<CheckResponse, CheckError>> + Send;
}

impl<S: GrammarService> GrammarService for Arc<S> {
    fn check(
        &self,
        sentence: &str,
    ) -> impl Future<Output = Result<CheckResponse, CheckError>> + Send {
        (**self).check(sentence)
    }
}

#[derive(Serialize)]
struct CheckRequest<'a> {
    sentence: &'a str,
}

/// [`GrammarService`] backed by an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpGrammarService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpGrammarService {
    /// Create a service posting to `endpoint` with an existing client.
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Create a service from configuration (endpoint and request timeout).
    pub fn from_config(config: &SuggestConfig) -> Result<Self, CheckError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self::new(client, config.endpoint.clone()))
    }

    /// The endpoint sentences are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl GrammarService for HttpGrammarService {
    async fn check(&self, sentence: &str) -> Result<CheckResponse, CheckError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&CheckRequest { sentence })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CheckError::Status {
                status: status.as_u16(),
                body: read_capped_error_body(response).await,
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

async fn read_capped_error_body(response: reqwest::Response) -> String {
    use futures_util::StreamExt;
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let Ok(chunk) = chunk else { break };
        body.extend_from_slice(&chunk);
        if body.len() > MAX_ERROR_BODY_BYTES {
            body.truncate(MAX_ERROR_BODY_BYTES);
            let text = String::from_utf8_lossy(&body);
            return format!("{text}...(truncated)");
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}
