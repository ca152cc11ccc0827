// client.rs - HTTP embedder speaking to the sentence-transformers sidecar
use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Batcher, EmbedError, Embedder, EmbeddingModelInfo};

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    texts: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embeddings: Vec<Vec<f32>>,
}

pub struct EmbeddingClient {
    http: Client,
    endpoint: String,
    model: EmbeddingModelInfo,
}

impl EmbeddingClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
            model: EmbeddingModelInfo::default(),
        }
    }

    pub fn with_timeout(
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, EmbedError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            model: EmbeddingModelInfo::default(),
        })
    }

    /// Use a different model description for validation and batching
    pub fn with_model(mut self, model: EmbeddingModelInfo) -> Self {
        self.model = model;
        self
    }

    pub fn model(&self) -> &EmbeddingModelInfo {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn post_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        debug!(count = texts.len(), endpoint = %self.endpoint, "requesting embeddings");

        let response = self
            .http
            .post(format!("{}/embed", self.endpoint))
            .json(&EmbeddingRequest { texts })
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(EmbedError::ServerError {
                status: status.as_u16(),
                body,
            });
        }

        let res: EmbeddingResponse = response.json()?;
        Ok(res.embeddings)
    }
}

impl Embedder for EmbeddingClient {
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        let mut out = Vec::with_capacity(texts.len());

        for (_, batch) in Batcher::new(self.model.max_batch).batches(texts) {
            let vectors = self.post_batch(batch)?;
            if vectors.len() != batch.len() {
                return Err(EmbedError::CountMismatch {
                    expected: batch.len(),
                    actual: vectors.len(),
                });
            }
            for vector in &vectors {
                self.model.check_vector(vector)?;
            }
            out.extend(vectors);
        }

        Ok(out)
    }

    fn dimensions(&self) -> usize {
        self.model.dim
    }
}
