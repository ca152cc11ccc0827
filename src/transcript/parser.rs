use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use super::classify::{MessageKind, is_system_message};
use super::line::{LineStart, parse_line_start};
use super::timestamp::parse_timestamp;
use super::TranscriptError;
use crate::segmenter::Message;

/// Sender id used for lines with no author
pub const SYSTEM_SENDER_ID: &str = "system";

/// A parsed message plus what the parser learned about it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    #[serde(flatten)]
    pub message: Message,
    /// Display name as it appears in the export
    pub sender: String,
    pub kind: MessageKind,
    pub is_multiline: bool,
    pub raw_line_count: usize,
    pub is_system: bool,
}

impl TranscriptEntry {
    /// Entries that should not take part in segmentation
    pub fn is_noise(&self) -> bool {
        self.is_system || self.kind == MessageKind::Reaction
    }
}

/// Stable display-name to sender-id assignment for one stream
#[derive(Debug, Clone, Default)]
pub struct SenderMap {
    ids: HashMap<String, String>,
}

impl SenderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for `sender`, assigning the next `user_NNN` on first sight
    pub fn id_for(&mut self, sender: &str) -> String {
        let next = self.ids.len() + 1;
        self.ids
            .entry(sender.to_string())
            .or_insert_with(|| format!("user_{next:03}"))
            .clone()
    }

    pub fn get(&self, sender: &str) -> Option<&str> {
        self.ids.get(sender).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Message being assembled from a header line and its continuations
struct Pending {
    message_id: String,
    sender: String,
    sender_id: String,
    timestamp: chrono::NaiveDateTime,
    lines: Vec<String>,
    is_system: bool,
}

impl Pending {
    fn finish(self) -> TranscriptEntry {
        let text = self.lines.join("\n");
        let kind = if self.is_system {
            MessageKind::System
        } else {
            MessageKind::detect(&text)
        };
        let raw_line_count = self.lines.len();

        TranscriptEntry {
            message: Message {
                message_id: self.message_id,
                sender_id: self.sender_id,
                timestamp: self.timestamp,
                text,
            },
            sender: self.sender,
            kind,
            is_multiline: raw_line_count > 1,
            raw_line_count,
            is_system: self.is_system,
        }
    }
}

/// Parses one chat export. Sender ids are scoped to the parser, so use a
/// fresh parser per stream.
#[derive(Debug, Default)]
pub struct TranscriptParser {
    senders: SenderMap,
}

impl TranscriptParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn senders(&self) -> &SenderMap {
        &self.senders
    }

    /// Parse an export file
    pub fn parse_file(&mut self, path: &Path) -> Result<Vec<TranscriptEntry>, TranscriptError> {
        let content = fs::read_to_string(path).map_err(|source| TranscriptError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.parse_str(&content)
    }

    /// Parse export text into entries in file order
    pub fn parse_str(&mut self, input: &str) -> Result<Vec<TranscriptEntry>, TranscriptError> {
        let mut entries = Vec::new();
        let mut pending: Option<Pending> = None;
        let mut orphaned = 0usize;

        for (index, line) in input.lines().enumerate() {
            match parse_line_start(line) {
                Some(start) => {
                    if let Some(done) = pending.take() {
                        entries.push(done.finish());
                    }
                    pending = Some(self.open(index + 1, line, start)?);
                }
                None => match pending.as_mut() {
                    Some(current) => current.lines.push(line.to_string()),
                    None => orphaned += 1,
                },
            }
        }

        if let Some(done) = pending.take() {
            entries.push(done.finish());
        }

        if orphaned > 0 {
            warn!(lines = orphaned, "dropped lines before the first message header");
        }
        debug!(
            messages = entries.len(),
            senders = self.senders.len(),
            "parsed transcript"
        );

        Ok(entries)
    }

    fn open(
        &mut self,
        line_no: usize,
        raw: &str,
        start: LineStart<'_>,
    ) -> Result<Pending, TranscriptError> {
        let timestamp =
            parse_timestamp(start.date, start.time).ok_or_else(|| TranscriptError::Timestamp {
                line: line_no,
                value: format!("{} {}", start.date, start.time),
            })?;

        let (sender, sender_id, is_system) = match start.sender {
            Some(name) => (name.to_string(), self.senders.id_for(name), is_system_message(raw)),
            None => (String::new(), SYSTEM_SENDER_ID.to_string(), true),
        };

        Ok(Pending {
            message_id: Uuid::new_v4().to_string(),
            sender,
            sender_id,
            timestamp,
            lines: vec![start.text.to_string()],
            is_system,
        })
    }
}

/// Parse `input` with a fresh sender map
pub fn parse_transcript(input: &str) -> Result<Vec<TranscriptEntry>, TranscriptError> {
    TranscriptParser::new().parse_str(input)
}

/// Partition entries into (conversation, noise), preserving order in both
pub fn split_noise(entries: Vec<TranscriptEntry>) -> (Vec<TranscriptEntry>, Vec<TranscriptEntry>) {
    entries.into_iter().partition(|e| !e.is_noise())
}
