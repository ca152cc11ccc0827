mod classify;
mod line;
mod parser;
mod timestamp;

#[cfg(test)]
mod tests;

pub use classify::{MessageKind, is_system_message};
pub use line::{LineFormat, LineStart, parse_line_start};
pub use parser::{
    SYSTEM_SENDER_ID, SenderMap, TranscriptEntry, TranscriptParser, parse_transcript, split_noise,
};
pub use timestamp::parse_timestamp;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error("Failed to read transcript {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unparseable timestamp on line {line}: {value}")]
    Timestamp { line: usize, value: String },
}
