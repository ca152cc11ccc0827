use chrono::NaiveDateTime;

use super::centroid::CentroidTracker;
use super::error::SegmentError;
use super::types::{Chunk, ChunkId, Message, SplitReason, Verdict, chunk_id_for};

/// The chunk under construction
#[derive(Debug, Clone)]
pub struct OpenChunk {
    pub chunk_id: ChunkId,
    pub sender_id: String,
    pub start_time: NaiveDateTime,
    /// Timestamp of the most recently admitted message
    pub end_time: NaiveDateTime,
    pub message_ids: Vec<String>,
    /// Trimmed member texts
    pub texts: Vec<String>,
    pub message_count: usize,
    pub split_reason: SplitReason,
    pub split_similarity: Option<f32>,
    /// Sum of member text lengths in chars, separators excluded
    pub char_count: usize,
}

impl OpenChunk {
    fn seed(message: &Message, reason: SplitReason, similarity: Option<f32>) -> Self {
        let text = message.trimmed_text().to_string();
        let char_count = text.chars().count();

        Self {
            chunk_id: chunk_id_for(&message.message_id),
            sender_id: message.sender_id.clone(),
            start_time: message.timestamp,
            end_time: message.timestamp,
            message_ids: vec![message.message_id.clone()],
            texts: vec![text],
            message_count: 1,
            split_reason: reason,
            split_similarity: similarity,
            char_count,
        }
    }

    fn push(&mut self, message: &Message) {
        let text = message.trimmed_text().to_string();
        self.char_count += text.chars().count();
        self.message_ids.push(message.message_id.clone());
        self.texts.push(text);
        self.message_count += 1;
        self.end_time = message.timestamp;
    }

    fn finalize(self) -> Chunk {
        Chunk {
            chunk_id: self.chunk_id,
            sender_id: self.sender_id,
            start_time: self.start_time,
            end_time: self.end_time,
            message_ids: self.message_ids,
            text: self.texts.join("\n"),
            message_count: self.message_count,
            split_reason: self.split_reason,
            split_similarity: self.split_similarity,
        }
    }
}

/// Owns the open chunk and its centroid.
///
/// At most one chunk is open at a time; a split closes it and seeds the
/// next one from the triggering message in the same step.
#[derive(Debug, Default)]
pub struct ChunkAccumulator {
    open: Option<OpenChunk>,
    centroid: CentroidTracker,
}

impl ChunkAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_chunk(&self) -> Option<&OpenChunk> {
        self.open.as_ref()
    }

    pub fn centroid(&self) -> &CentroidTracker {
        &self.centroid
    }

    /// Timestamp of the last message seen. Every message lands in the open
    /// chunk, so this is always the open chunk's end time.
    pub fn previous_timestamp(&self) -> Option<NaiveDateTime> {
        self.open.as_ref().map(|c| c.end_time)
    }

    /// Drive one transition. Returns the chunk closed by a split, if any.
    pub fn apply(
        &mut self,
        verdict: Verdict,
        message: &Message,
        embedding: &[f32],
    ) -> Result<Option<Chunk>, SegmentError> {
        match verdict {
            Verdict::Continue => {
                self.extend(message, embedding)?;
                Ok(None)
            }
            Verdict::Split { reason, similarity } => {
                Ok(self.start(message, embedding, reason, similarity))
            }
        }
    }

    /// Close the open chunk (if any) and seed a new one from `message`
    pub fn start(
        &mut self,
        message: &Message,
        embedding: &[f32],
        reason: SplitReason,
        similarity: Option<f32>,
    ) -> Option<Chunk> {
        let closed = self.finalize();
        self.open = Some(OpenChunk::seed(message, reason, similarity));
        self.centroid.seed(embedding);
        closed
    }

    /// Append `message` to the open chunk
    pub fn extend(&mut self, message: &Message, embedding: &[f32]) -> Result<(), SegmentError> {
        let chunk = self.open.as_mut().ok_or_else(|| {
            SegmentError::Internal(format!(
                "continue verdict for message {} with no open chunk",
                message.message_id
            ))
        })?;

        chunk.push(message);
        self.centroid.fold(embedding);
        Ok(())
    }

    /// Close the open chunk without starting another
    pub fn finalize(&mut self) -> Option<Chunk> {
        self.centroid.reset();
        self.open.take().map(OpenChunk::finalize)
    }
}
