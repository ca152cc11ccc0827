use regex::Regex;
use std::sync::LazyLock;

/// `[1/5/24, 10:00:00 AM] Alice: text`
static BRACKETED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(\d{1,2}/\d{1,2}/\d{2}),\s([\d:]+\s[AP]M)\]\s(.+?):\s(.*)$")
        .expect("bracketed line pattern is valid")
});

/// `5/1/24, 10:00 am - Alice: text` or `5/1/24, 10:00 am - Alice joined`
static DASHED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d{1,2}/\d{1,2}/\d{2,4}),\s([\d:]+\s?(?:AM|PM))\s-\s(.*)$")
        .expect("dashed line pattern is valid")
});

/// Export layout a message header was recognised in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFormat {
    /// iOS-style `[date, time] Sender: text`
    Bracketed,
    /// Android-style `date, time - Sender: text`
    Dashed,
}

/// Fields of a line that opens a new message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineStart<'a> {
    pub date: &'a str,
    pub time: &'a str,
    /// `None` for system lines such as "Alice joined"
    pub sender: Option<&'a str>,
    pub text: &'a str,
    pub format: LineFormat,
}

/// Match `line` against the known header layouts.
///
/// Returns `None` for continuation lines.
pub fn parse_line_start(line: &str) -> Option<LineStart<'_>> {
    let line = line.trim_start_matches(['\u{200e}', '\u{200f}', '\u{feff}']);

    if let Some(caps) = BRACKETED_RE.captures(line) {
        return Some(LineStart {
            date: caps.get(1)?.as_str(),
            time: caps.get(2)?.as_str(),
            sender: Some(caps.get(3)?.as_str()),
            text: caps.get(4)?.as_str(),
            format: LineFormat::Bracketed,
        });
    }

    let caps = DASHED_RE.captures(line)?;
    let date = caps.get(1)?.as_str();
    let time = caps.get(2)?.as_str();
    let rest = caps.get(3)?.as_str();

    let (sender, text) = match rest.split_once(':') {
        Some((sender, text)) => (Some(sender.trim()), text.trim()),
        None => (None, rest.trim()),
    };

    Some(LineStart {
        date,
        time,
        sender,
        text,
        format: LineFormat::Dashed,
    })
}
