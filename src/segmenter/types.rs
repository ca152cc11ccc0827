use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Identifier of a chunk, stable across runs for the same input
pub type ChunkId = String;

/// A single attributed chat message, the input unit of segmentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier within the stream
    pub message_id: String,
    /// Per-stream sender identifier (e.g., "user_001")
    pub sender_id: String,
    /// When the message was sent
    pub timestamp: NaiveDateTime,
    /// Raw message body, possibly multi-line
    pub text: String,
}

impl Message {
    pub fn new(
        message_id: impl Into<String>,
        sender_id: impl Into<String>,
        timestamp: NaiveDateTime,
        text: impl Into<String>,
    ) -> Self {
        Self {
            message_id: message_id.into(),
            sender_id: sender_id.into(),
            timestamp,
            text: text.into(),
        }
    }

    /// Body with surrounding whitespace removed. Length and embedding
    /// both work off this form.
    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }
}

/// Why a chunk was started
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitReason {
    /// First chunk of the stream
    Start,
    /// Different sender than the open chunk
    SenderChange,
    /// Silence longer than the configured gap
    TimeGap,
    /// Appending would exceed the character cap
    MaxSize,
    /// Embedding too far from the open chunk's centroid
    SemanticDrift,
}

impl SplitReason {
    pub const ALL: [SplitReason; 5] = [
        SplitReason::Start,
        SplitReason::SenderChange,
        SplitReason::TimeGap,
        SplitReason::MaxSize,
        SplitReason::SemanticDrift,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SplitReason::Start => "start",
            SplitReason::SenderChange => "sender_change",
            SplitReason::TimeGap => "time_gap",
            SplitReason::MaxSize => "max_size",
            SplitReason::SemanticDrift => "semantic_drift",
        }
    }
}

impl fmt::Display for SplitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of evaluating one message against the open chunk
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    /// Append the message to the open chunk
    Continue,
    /// Close the open chunk (if any) and seed a new one from the message
    Split {
        reason: SplitReason,
        /// Only set for `SemanticDrift`
        similarity: Option<f32>,
    },
}

impl Verdict {
    pub fn split(reason: SplitReason) -> Self {
        Verdict::Split {
            reason,
            similarity: None,
        }
    }
}

/// A finalized, immutable group of consecutive messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub chunk_id: ChunkId,
    pub sender_id: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    /// Member ids in arrival order
    pub message_ids: Vec<String>,
    /// Member texts joined with newlines
    pub text: String,
    pub message_count: usize,
    pub split_reason: SplitReason,
    pub split_similarity: Option<f32>,
}

/// Derive a chunk id from the message that seeds the chunk
pub fn chunk_id_for(seed_message_id: &str) -> ChunkId {
    let mut hasher = Sha256::new();
    hasher.update(b"chunk:");
    hasher.update(seed_message_id.as_bytes());
    hex::encode(&hasher.finalize()[..8])
}

#[cfg(test)]
mod types_tests {
    use super::*;

    #[test]
    fn test_split_reason_names() {
        for reason in SplitReason::ALL {
            let json = serde_json::to_string(&reason).unwrap();
            assert_eq!(json, format!("\"{}\"", reason));
        }
        assert_eq!(SplitReason::SenderChange.to_string(), "sender_change");
    }

    #[test]
    fn test_trimmed_text() {
        let ts = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let message = Message::new("m1", "user_001", ts, "\n  see you soon \t");
        assert_eq!(message.trimmed_text(), "see you soon");
    }

    #[test]
    fn test_chunk_id_is_stable() {
        assert_eq!(chunk_id_for("abc"), chunk_id_for("abc"));
        assert_ne!(chunk_id_for("abc"), chunk_id_for("abd"));
        assert_eq!(chunk_id_for("abc").len(), 16);
    }
}
