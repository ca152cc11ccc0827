use anyhow::{Context, Result, bail};
use chatseg::output::{self, CHUNKS_FILE, MANIFEST_FILE, MESSAGES_FILE, NOISE_FILE};
use chatseg::{
    Chunk, EmbeddingClient, EmbeddingModelInfo, Manifest, Message, Segmenter, SegmenterConfig,
    TranscriptParser, split_noise,
};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{error, info};
use walkdir::WalkDir;

/// Split chat exports into semantically coherent chunks
#[derive(Parser, Debug)]
#[command(name = "chatseg", version, about)]
struct Cli {
    /// Transcript file, or a directory searched for *.txt exports
    input: PathBuf,

    /// Where per-transcript output directories are created
    #[arg(long, default_value = "data/chunks")]
    out_dir: PathBuf,

    /// Base URL of the embedding server
    #[arg(long, env = "CHATSEG_EMBED_ENDPOINT", default_value = "http://localhost:18115")]
    endpoint: String,

    /// Embedding model name recorded in the manifest
    #[arg(
        long,
        env = "CHATSEG_EMBED_MODEL",
        default_value = "sentence-transformers/all-MiniLM-L6-v2"
    )]
    model: String,

    /// Embedding dimensionality the server must return
    #[arg(long, env = "CHATSEG_EMBED_DIM", default_value_t = 384)]
    dim: usize,

    /// HTTP timeout for embedding requests, in seconds
    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,

    /// Silence (minutes) that always starts a new chunk
    #[arg(long, default_value_t = chatseg::segmenter::DEFAULT_TIME_GAP_MINUTES)]
    time_gap_minutes: i64,

    /// Character cap per chunk
    #[arg(long, default_value_t = chatseg::segmenter::DEFAULT_MAX_CHUNK_CHARS)]
    max_chunk_chars: usize,

    /// Cosine similarity below which a message starts a new chunk
    #[arg(long, default_value_t = chatseg::segmenter::DEFAULT_SIMILARITY_THRESHOLD)]
    similarity_threshold: f32,

    /// Texts per embedding request
    #[arg(long, default_value_t = chatseg::segmenter::DEFAULT_EMBED_BATCH_SIZE)]
    batch_size: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let start_time = Instant::now();

    let config = SegmenterConfig::new()
        .time_gap_minutes(cli.time_gap_minutes)
        .max_chunk_chars(cli.max_chunk_chars)
        .similarity_threshold(cli.similarity_threshold)
        .embed_batch_size(cli.batch_size);

    let model = EmbeddingModelInfo::new(cli.model.clone(), cli.dim, cli.batch_size.max(1));
    let timeout = Duration::from_secs(cli.timeout_secs);
    let client = EmbeddingClient::with_timeout(cli.endpoint.clone(), timeout)
        .context("Failed to build embedding client")?
        .with_model(model);
    let segmenter = Segmenter::new(client, config);

    let inputs = collect_inputs(&cli.input)?;
    if inputs.is_empty() {
        bail!("No transcripts found under {}", cli.input.display());
    }
    info!(count = inputs.len(), endpoint = %cli.endpoint, "segmenting transcripts");

    let mut failures = 0usize;
    for path in &inputs {
        if let Err(e) = process_transcript(path, &cli.out_dir, &segmenter) {
            error!(path = %path.display(), "{:#}", e);
            failures += 1;
        }
    }

    println!(
        "\n✓ Processed {}/{} transcripts [{:.2}s]",
        inputs.len() - failures,
        inputs.len(),
        start_time.elapsed().as_secs_f64()
    );

    if failures > 0 {
        bail!("{} transcript(s) failed", failures);
    }
    Ok(())
}

/// A single file, or every `*.txt` below a directory in path order
fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(input).follow_links(false).sort_by_file_name() {
        let entry = entry.context("Failed to read directory entry")?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

fn process_transcript(
    path: &Path,
    out_root: &Path,
    segmenter: &Segmenter<EmbeddingClient>,
) -> Result<()> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "transcript".to_string());
    let out_dir = out_root.join(&stem);

    // Each transcript is its own stream with its own sender ids
    let entries = TranscriptParser::new()
        .parse_file(path)
        .context(format!("Failed to parse {}", path.display()))?;
    let (normal, noise) = split_noise(entries);

    output::write_entries_json(&out_dir.join(MESSAGES_FILE), &normal)?;
    output::write_entries_json(&out_dir.join(NOISE_FILE), &noise)?;

    let messages: Vec<Message> = normal.iter().map(|e| e.message.clone()).collect();
    let chunks: Vec<Chunk> = segmenter
        .segment(&messages)
        .context(format!("Failed to segment {}", path.display()))?;

    output::write_chunks_json(&out_dir.join(CHUNKS_FILE), &chunks)?;

    let mut manifest = Manifest::new(
        Some(path.display().to_string()),
        segmenter.embedder().model().label(),
        segmenter.config().clone(),
    );
    manifest.record(messages.len(), noise.len(), &chunks);
    output::write_manifest(&out_dir.join(MANIFEST_FILE), &manifest)?;

    println!("  {}", path.display());
    println!("    Messages:      {}", messages.len());
    println!("    Noise:         {}", noise.len());
    println!("    Chunks:        {}", chunks.len());
    for (reason, count) in &manifest.stats.split_reasons {
        println!("      {:<14} {}", reason.to_string(), count);
    }

    Ok(())
}
