use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Default silence that forces a new chunk
pub const DEFAULT_TIME_GAP_MINUTES: i64 = 30;

/// Default cap on a chunk's accumulated text, in characters
pub const DEFAULT_MAX_CHUNK_CHARS: usize = 1500;

/// Default cosine similarity below which a message drifts off-topic
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.65;

/// Default number of texts sent to the embedder per request
pub const DEFAULT_EMBED_BATCH_SIZE: usize = 32;

/// Tunable thresholds for boundary detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmenterConfig {
    /// Gaps strictly longer than this start a new chunk
    #[serde(with = "duration_secs")]
    pub time_gap_threshold: Duration,
    /// Appends that would push the chunk strictly past this are refused
    pub max_chunk_chars: usize,
    /// Similarities strictly below this start a new chunk
    pub semantic_similarity_threshold: f32,
    /// Prefetch batch size for the embedding oracle
    pub embed_batch_size: usize,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            time_gap_threshold: Duration::minutes(DEFAULT_TIME_GAP_MINUTES),
            max_chunk_chars: DEFAULT_MAX_CHUNK_CHARS,
            semantic_similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            embed_batch_size: DEFAULT_EMBED_BATCH_SIZE,
        }
    }
}

impl SegmenterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time gap threshold
    pub fn time_gap(mut self, gap: Duration) -> Self {
        self.time_gap_threshold = gap;
        self
    }

    /// Set the time gap threshold in whole minutes
    pub fn time_gap_minutes(self, minutes: i64) -> Self {
        self.time_gap(Duration::minutes(minutes))
    }

    /// Set the character cap
    pub fn max_chunk_chars(mut self, chars: usize) -> Self {
        self.max_chunk_chars = chars;
        self
    }

    /// Set the semantic similarity threshold
    pub fn similarity_threshold(mut self, threshold: f32) -> Self {
        self.semantic_similarity_threshold = threshold;
        self
    }

    /// Set the embedding prefetch batch size (clamped to at least 1)
    pub fn embed_batch_size(mut self, size: usize) -> Self {
        self.embed_batch_size = size.max(1);
        self
    }
}

mod duration_secs {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(d.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = i64::deserialize(d)?;
        Ok(Duration::seconds(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SegmenterConfig::default();
        assert_eq!(config.time_gap_threshold, Duration::minutes(30));
        assert_eq!(config.max_chunk_chars, 1500);
        assert_eq!(config.semantic_similarity_threshold, 0.65);
        assert_eq!(config.embed_batch_size, 32);
    }

    #[test]
    fn test_builder_setters() {
        let config = SegmenterConfig::new()
            .time_gap_minutes(5)
            .max_chunk_chars(200)
            .similarity_threshold(0.8)
            .embed_batch_size(0);

        assert_eq!(config.time_gap_threshold, Duration::minutes(5));
        assert_eq!(config.max_chunk_chars, 200);
        assert_eq!(config.semantic_similarity_threshold, 0.8);
        assert_eq!(config.embed_batch_size, 1);
    }

    #[test]
    fn test_serde_uses_seconds_for_gap() {
        let config = SegmenterConfig::default();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["time_gap_threshold"], 1800);

        let back: SegmenterConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }
}
