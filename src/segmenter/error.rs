use crate::embedder::EmbedError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SegmentError {
    #[error("Malformed input at message {index}: {reason}")]
    MalformedInput { index: usize, reason: String },

    #[error("Embedding unavailable for message {message_id}: {source}")]
    EmbeddingUnavailable {
        message_id: String,
        #[source]
        source: EmbedError,
    },

    #[error("Internal invariant violated: {0}")]
    Internal(String),
}
