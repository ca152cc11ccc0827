use super::accumulator::ChunkAccumulator;
use super::config::SegmenterConfig;
use super::error::SegmentError;
use super::similarity::cosine_similarity;
use super::types::{Message, SplitReason, Verdict};

/// Decides whether a message extends the open chunk or starts a new one.
///
/// Rules are checked in a fixed order and the first match wins:
/// 1. `start` - nothing is open
/// 2. `sender_change` - a different sender
/// 3. `time_gap` - elapsed time since the previous message exceeds the threshold
/// 4. `max_size` - appending would push the chunk past the character cap
/// 5. `semantic_drift` - similarity to the centroid falls below the threshold
///
/// The similarity is only computed once the categorical rules have passed.
#[derive(Debug, Clone)]
pub struct BoundaryPolicy {
    config: SegmenterConfig,
}

impl BoundaryPolicy {
    pub fn new(config: SegmenterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    pub fn evaluate(
        &self,
        state: &ChunkAccumulator,
        message: &Message,
        embedding: &[f32],
    ) -> Result<Verdict, SegmentError> {
        let Some(open) = state.open_chunk() else {
            return Ok(Verdict::split(SplitReason::Start));
        };

        if message.sender_id != open.sender_id {
            return Ok(Verdict::split(SplitReason::SenderChange));
        }

        let elapsed = message.timestamp - open.end_time;
        if elapsed < chrono::Duration::zero() {
            return Err(SegmentError::Internal(format!(
                "message {} is earlier than its predecessor",
                message.message_id
            )));
        }
        if elapsed > self.config.time_gap_threshold {
            return Ok(Verdict::split(SplitReason::TimeGap));
        }

        let incoming = message.trimmed_text().chars().count();
        if open.char_count + incoming > self.config.max_chunk_chars {
            return Ok(Verdict::split(SplitReason::MaxSize));
        }

        let centroid = state.centroid().mean().ok_or_else(|| {
            SegmentError::Internal(format!("chunk {} is open with no embeddings", open.chunk_id))
        })?;

        if centroid.len() != embedding.len() {
            return Err(SegmentError::Internal(format!(
                "centroid has {} dimensions, message {} has {}",
                centroid.len(),
                message.message_id,
                embedding.len()
            )));
        }

        let similarity = cosine_similarity(embedding, &centroid);
        if similarity < self.config.semantic_similarity_threshold {
            return Ok(Verdict::Split {
                reason: SplitReason::SemanticDrift,
                similarity: Some(similarity),
            });
        }

        Ok(Verdict::Continue)
    }
}
