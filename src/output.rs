use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::segmenter::{Chunk, SegmenterConfig, SplitReason};
use crate::transcript::TranscriptEntry;

pub const CHUNKS_FILE: &str = "chunks.json";
pub const MESSAGES_FILE: &str = "messages.json";
pub const NOISE_FILE: &str = "noise_messages.json";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Summary of one segmentation run, written next to its outputs
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub created_at: String,
    pub source_path: Option<String>,
    pub generator: String,
    pub embedding_model: String,
    pub config: SegmenterConfig,
    pub stats: ManifestStats,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ManifestStats {
    pub message_count: usize,
    pub noise_count: usize,
    pub chunk_count: usize,
    pub split_reasons: BTreeMap<SplitReason, usize>,
}

impl Manifest {
    pub fn new(
        source_path: Option<String>,
        embedding_model: String,
        config: SegmenterConfig,
    ) -> Self {
        Self {
            version: "1.0.0".to_string(),
            created_at: Utc::now().to_rfc3339(),
            source_path,
            generator: format!("chatseg v{}", env!("CARGO_PKG_VERSION")),
            embedding_model,
            config,
            stats: ManifestStats::default(),
        }
    }

    /// Fill in stats from a finished run
    pub fn record(&mut self, messages: usize, noise: usize, chunks: &[Chunk]) {
        self.stats.message_count = messages;
        self.stats.noise_count = noise;
        self.stats.chunk_count = chunks.len();
        self.stats.split_reasons.clear();
        for chunk in chunks {
            *self.stats.split_reasons.entry(chunk.split_reason).or_default() += 1;
        }
    }
}

/// Serialize `value` as pretty JSON into `writer`
pub fn to_writer<W: Write, T: Serialize + ?Sized>(writer: W, value: &T) -> Result<()> {
    let mut writer = writer;
    serde_json::to_writer_pretty(&mut writer, value).context("Failed to serialize JSON")?;
    writer.write_all(b"\n").context("Failed to write JSON")?;
    writer.flush().context("Failed to flush JSON")?;
    Ok(())
}

/// Write `value` as pretty JSON to `path`, creating parent directories
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .context(format!("Failed to create directory: {}", parent.display()))?;
    }

    let file = File::create(path).context(format!("Failed to create file: {}", path.display()))?;
    to_writer(BufWriter::new(file), value)
        .context(format!("Failed to write {}", path.display()))
}

pub fn write_chunks_json(path: &Path, chunks: &[Chunk]) -> Result<()> {
    write_json(path, chunks)?;
    info!(path = %path.display(), chunks = chunks.len(), "wrote chunks");
    Ok(())
}

pub fn write_entries_json(path: &Path, entries: &[TranscriptEntry]) -> Result<()> {
    write_json(path, entries)?;
    info!(path = %path.display(), messages = entries.len(), "wrote messages");
    Ok(())
}

pub fn write_manifest(path: &Path, manifest: &Manifest) -> Result<()> {
    write_json(path, manifest)
}
