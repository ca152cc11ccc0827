// Public API exports
pub mod embedder;
pub mod output;
pub mod segmenter;
pub mod transcript;

// Re-export main types for convenience
pub use segmenter::{
    BoundaryPolicy, CentroidTracker, Chunk, ChunkAccumulator, ChunkId, Message, SegmentError,
    Segmenter, SegmenterConfig, SplitReason, Verdict,
};

pub use embedder::{Batcher, EmbedError, Embedder, EmbeddingClient, EmbeddingModelInfo};

pub use transcript::{
    MessageKind, TranscriptEntry, TranscriptError, TranscriptParser, parse_transcript, split_noise,
};

pub use output::{Manifest, write_chunks_json, write_entries_json};
