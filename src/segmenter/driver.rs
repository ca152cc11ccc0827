use std::collections::{BTreeMap, HashSet};

use tracing::{debug, info};

use super::accumulator::ChunkAccumulator;
use super::config::SegmenterConfig;
use super::error::SegmentError;
use super::policy::BoundaryPolicy;
use super::types::{Chunk, Message, SplitReason, Verdict};
use crate::embedder::{Batcher, EmbedError, Embedder};

/// Single-pass segmentation of one message stream.
///
/// Embeddings are fetched up front in batches; boundary decisions then run
/// strictly in input order.
pub struct Segmenter<E> {
    embedder: E,
    policy: BoundaryPolicy,
}

impl<E: Embedder> Segmenter<E> {
    pub fn new(embedder: E, config: SegmenterConfig) -> Self {
        Self {
            embedder,
            policy: BoundaryPolicy::new(config),
        }
    }

    pub fn with_defaults(embedder: E) -> Self {
        Self::new(embedder, SegmenterConfig::default())
    }

    pub fn config(&self) -> &SegmenterConfig {
        self.policy.config()
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    /// Partition `messages` into chunks
    pub fn segment(&self, messages: &[Message]) -> Result<Vec<Chunk>, SegmentError> {
        validate_stream(messages)?;
        let embeddings = self.prefetch(messages)?;
        self.run(messages, &embeddings)
    }

    /// Partition `messages` using embeddings computed elsewhere, one per message
    pub fn segment_with_embeddings(
        &self,
        messages: &[Message],
        embeddings: &[Vec<f32>],
    ) -> Result<Vec<Chunk>, SegmentError> {
        validate_stream(messages)?;

        if embeddings.len() != messages.len() {
            let index = embeddings.len().min(messages.len().saturating_sub(1));
            return Err(SegmentError::EmbeddingUnavailable {
                message_id: messages
                    .get(index)
                    .map(|m| m.message_id.clone())
                    .unwrap_or_default(),
                source: EmbedError::CountMismatch {
                    expected: messages.len(),
                    actual: embeddings.len(),
                },
            });
        }

        let expected = embeddings.first().map(Vec::len).unwrap_or(0);
        check_vectors(messages, embeddings, 0, expected)?;

        self.run(messages, embeddings)
    }

    fn prefetch(&self, messages: &[Message]) -> Result<Vec<Vec<f32>>, SegmentError> {
        let texts: Vec<String> = messages
            .iter()
            .map(|m| m.trimmed_text().to_string())
            .collect();

        let batcher = Batcher::new(self.config().embed_batch_size);
        let mut embeddings = Vec::with_capacity(texts.len());
        let mut expected_dim = self.embedder.dimensions();

        for (offset, batch) in batcher.batches(&texts) {
            let vectors = self.embedder.embed_batch(batch).map_err(|source| {
                SegmentError::EmbeddingUnavailable {
                    message_id: messages[offset].message_id.clone(),
                    source,
                }
            })?;

            if vectors.len() != batch.len() {
                let missing = offset + vectors.len().min(batch.len() - 1);
                return Err(SegmentError::EmbeddingUnavailable {
                    message_id: messages[missing].message_id.clone(),
                    source: EmbedError::CountMismatch {
                        expected: batch.len(),
                        actual: vectors.len(),
                    },
                });
            }

            // An embedder reporting 0 dimensions is trusted to be consistent
            // with its first vector.
            if expected_dim == 0 {
                expected_dim = vectors.first().map(Vec::len).unwrap_or(0);
            }
            check_vectors(messages, &vectors, offset, expected_dim)?;

            debug!(offset, count = vectors.len(), "prefetched embeddings");
            embeddings.extend(vectors);
        }

        Ok(embeddings)
    }

    fn run(
        &self,
        messages: &[Message],
        embeddings: &[Vec<f32>],
    ) -> Result<Vec<Chunk>, SegmentError> {
        let mut accumulator = ChunkAccumulator::new();
        let mut chunks = Vec::new();
        let mut reasons: BTreeMap<&'static str, usize> = BTreeMap::new();

        for (message, embedding) in messages.iter().zip(embeddings) {
            let verdict = self.policy.evaluate(&accumulator, message, embedding)?;

            if let Verdict::Split { reason, similarity } = verdict {
                *reasons.entry(reason.as_str()).or_default() += 1;
                if reason != SplitReason::Start {
                    debug!(
                        message_id = %message.message_id,
                        reason = %reason,
                        similarity = ?similarity,
                        "chunk boundary"
                    );
                }
            }

            if let Some(chunk) = accumulator.apply(verdict, message, embedding)? {
                chunks.push(chunk);
            }
        }

        if let Some(chunk) = accumulator.finalize() {
            chunks.push(chunk);
        }

        info!(
            messages = messages.len(),
            chunks = chunks.len(),
            reasons = ?reasons,
            "segmented stream"
        );

        Ok(chunks)
    }
}

/// Reject streams that would make boundary decisions meaningless
pub fn validate_stream(messages: &[Message]) -> Result<(), SegmentError> {
    let mut seen = HashSet::with_capacity(messages.len());

    for (index, message) in messages.iter().enumerate() {
        if !seen.insert(message.message_id.as_str()) {
            return Err(SegmentError::MalformedInput {
                index,
                reason: format!("duplicate message id {}", message.message_id),
            });
        }

        if message.trimmed_text().is_empty() {
            return Err(SegmentError::MalformedInput {
                index,
                reason: format!("message {} has no text", message.message_id),
            });
        }

        if index > 0 && message.timestamp < messages[index - 1].timestamp {
            return Err(SegmentError::MalformedInput {
                index,
                reason: format!(
                    "timestamp {} precedes previous message at {}",
                    message.timestamp,
                    messages[index - 1].timestamp
                ),
            });
        }
    }

    Ok(())
}

fn check_vectors(
    messages: &[Message],
    vectors: &[Vec<f32>],
    offset: usize,
    expected: usize,
) -> Result<(), SegmentError> {
    for (i, vector) in vectors.iter().enumerate() {
        let source = if vector.len() != expected {
            EmbedError::DimensionMismatch {
                expected,
                actual: vector.len(),
            }
        } else if let Some(component) = vector.iter().position(|x| !x.is_finite()) {
            // NaN compares false against the threshold and would never split
            EmbedError::NonFinite { component }
        } else {
            continue;
        };

        return Err(SegmentError::EmbeddingUnavailable {
            message_id: messages[offset + i].message_id.clone(),
            source,
        });
    }

    Ok(())
}
