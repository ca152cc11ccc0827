mod accumulator;
mod centroid;
mod config;
mod driver;
mod error;
mod policy;
mod similarity;
mod types;


pub use accumulator::{ChunkAccumulator, OpenChunk};
pub use centroid::CentroidTracker;
pub use config::{
    DEFAULT_EMBED_BATCH_SIZE, DEFAULT_MAX_CHUNK_CHARS, DEFAULT_SIMILARITY_THRESHOLD,
    DEFAULT_TIME_GAP_MINUTES, SegmenterConfig,
};
pub use driver::{Segmenter, validate_stream};
pub use error::SegmentError;
pub use policy::BoundaryPolicy;
pub use similarity::cosine_similarity;
pub use types::{Chunk, ChunkId, Message, SplitReason, Verdict, chunk_id_for};
