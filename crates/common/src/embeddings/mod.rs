//! Embedding service abstraction
//!
//! Provides a unified interface over embedding providers. The engine never
//! inspects returned vectors beyond forwarding them; the vector store and the
//! collection's declared dimensionality are the source of truth.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Embedding output for a single input text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedResult {
    /// Fixed-dimension embedding vector
    pub vector: Vec<f32>,
    /// Number of tokens consumed (estimated when the provider does not report it)
    pub token_count: usize,
}

/// Generates vector embeddings from text.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate one embedding per input, in input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<EmbedResult>>;

    /// Dimensionality of the embeddings produced by this embedder.
    fn dimensions(&self) -> usize;
}

/// A failed provider call, classified for the retry policy.
#[derive(Debug)]
pub struct TransportError {
    pub message: String,
    /// Whether retrying the same call can plausibly succeed (network
    /// failures, rate limits, provider-side 5xx). Terminal errors such as
    /// bad requests or malformed responses fail immediately.
    pub retryable: bool,
}

impl TransportError {
    pub fn retryable(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: true,
        }
    }

    pub fn terminal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: false,
        }
    }
}

/// One provider round-trip: a batch of inputs to a batch of vectors.
///
/// Implementations carry the wire protocol and credentials; [`HttpEmbedder`]
/// layers batching and retries on top.
#[async_trait]
pub trait EmbeddingTransport: Send + Sync {
    async fn fetch(
        &self,
        model: &str,
        inputs: &[String],
    ) -> std::result::Result<Vec<Vec<f32>>, TransportError>;
}

/// Backoff starts here and doubles per retry.
const BASE_BACKOFF: Duration = Duration::from_millis(250);

/// Backoff ceiling, so a long retry chain cannot stall an ingest for
/// arbitrarily long.
const MAX_BACKOFF: Duration = Duration::from_secs(2);

/// Provider-backed embedder.
///
/// Splits oversized inputs into provider batches while preserving input
/// order. Failed calls are retried only when the transport classifies them
/// as retryable, with capped exponential backoff; terminal errors surface
/// immediately.
pub struct HttpEmbedder {
    transport: Arc<dyn EmbeddingTransport>,
    model: String,
    dimensions: usize,
    batch_size: usize,
    max_attempts: u32,
    base_backoff: Duration,
}

impl HttpEmbedder {
    /// Create an embedder backed by the OpenAI-compatible `/embeddings`
    /// endpoint. Dimensionality is inferred for the known OpenAI models and
    /// overridable via [`with_dimensions`].
    ///
    /// [`with_dimensions`]: HttpEmbedder::with_dimensions
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let model = model.into();
        Self::with_transport(Arc::new(OpenAiTransport::new(api_key)), model)
    }

    /// Create an embedder over a custom transport (self-hosted endpoints,
    /// test doubles).
    pub fn with_transport(transport: Arc<dyn EmbeddingTransport>, model: impl Into<String>) -> Self {
        let model = model.into();
        let dimensions = match model.as_str() {
            "text-embedding-ada-002" | "text-embedding-3-small" => 1536,
            "text-embedding-3-large" => 3072,
            _ => 768,
        };

        Self {
            transport,
            model,
            dimensions,
            batch_size: 100,
            max_attempts: 3,
            base_backoff: BASE_BACKOFF,
        }
    }

    /// Override the reported dimensionality.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Override the provider batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Override the retry budget and initial backoff.
    pub fn with_retry(mut self, max_attempts: u32, base_backoff: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.base_backoff = base_backoff;
        self
    }

    /// Run one batch through the transport under the retry policy.
    async fn fetch_batch(&self, batch: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut backoff = self.base_backoff;

        for attempt in 1..=self.max_attempts {
            match self.transport.fetch(&self.model, batch).await {
                Ok(vectors) => return Ok(vectors),
                Err(err) if err.retryable && attempt < self.max_attempts => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %err.message,
                        "embedding call failed, backing off"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                }
                Err(err) => {
                    return Err(Error::Embedding {
                        message: err.message,
                    });
                }
            }
        }

        Err(Error::Embedding {
            message: "retry budget exhausted".to_string(),
        })
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<EmbedResult>> {
        let mut results = Vec::with_capacity(texts.len());

        for batch in texts.chunks(self.batch_size) {
            let vectors = self.fetch_batch(batch).await?;
            if vectors.len() != batch.len() {
                return Err(Error::Embedding {
                    message: format!(
                        "provider returned {} embeddings for {} inputs",
                        vectors.len(),
                        batch.len()
                    ),
                });
            }
            for (text, vector) in batch.iter().zip(vectors) {
                results.push(EmbedResult {
                    vector,
                    token_count: text.len() / 4,
                });
            }
        }

        Ok(results)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// OpenAI-compatible `/embeddings` transport.
pub struct OpenAiTransport {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a [String],
    model: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl OpenAiTransport {
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    /// Point at a compatible self-hosted endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl EmbeddingTransport for OpenAiTransport {
    async fn fetch(
        &self,
        model: &str,
        inputs: &[String],
    ) -> std::result::Result<Vec<Vec<f32>>, TransportError> {
        let url = format!("{}/embeddings", self.base_url);
        let request = EmbeddingRequest { input: inputs, model };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| TransportError::retryable(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = format!("api error {status}: {body}");
            // Rate limits and provider-side failures are worth retrying;
            // anything else (auth, validation) will fail the same way again.
            return if status.as_u16() == 429 || status.is_server_error() {
                Err(TransportError::retryable(message))
            } else {
                Err(TransportError::terminal(message))
            };
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| TransportError::terminal(format!("failed to parse response: {e}")))?;

        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}

/// Mock embedder producing random unit-scale vectors, for development and
/// tests that don't assert on vector values.
pub struct MockEmbedder {
    dimensions: usize,
}

impl MockEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<EmbedResult>> {
        use rand::Rng;
        let mut rng = rand::thread_rng();

        Ok(texts
            .iter()
            .map(|text| EmbedResult {
                vector: (0..self.dimensions).map(|_| rng.gen::<f32>()).collect(),
                token_count: text.len() / 4,
            })
            .collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
