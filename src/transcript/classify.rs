use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static SYSTEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)messages and calls are end-to-end encrypted",
        r"|this message was deleted",
        r"|you deleted this message",
        r"|security code changed",
        r"|missed (?:voice|video) call",
        r"|changed (?:the subject|the group description|this group's icon)",
        r"|\b(?:added|removed|left|joined)\b",
        r"|(?:document|image) omitted",
    ))
    .expect("system message pattern is valid")
});

/// Coarse classification of a message body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Text,
    MediaOmitted,
    ContactOmitted,
    CallEvent,
    Reaction,
    System,
}

impl MessageKind {
    /// Classify a joined message body
    pub fn detect(text: &str) -> Self {
        let lowered = text.to_lowercase();

        if lowered.contains("image omitted") || lowered.contains("video omitted") {
            return MessageKind::MediaOmitted;
        }
        if lowered.contains("contact card omitted") {
            return MessageKind::ContactOmitted;
        }
        if lowered.contains("call") && (lowered.contains("missed") || lowered.contains("voice")) {
            return MessageKind::CallEvent;
        }
        if text.trim().chars().count() <= 2 {
            return MessageKind::Reaction;
        }

        MessageKind::Text
    }
}

/// Whether a raw line is an export notice rather than something a person wrote
pub fn is_system_message(line: &str) -> bool {
    let cleaned = line.replace(['\u{200e}', '\u{200f}'], "");
    SYSTEM_RE.is_match(&cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_kinds() {
        let cases = [
            ("image omitted", MessageKind::MediaOmitted),
            ("\u{200e}video omitted", MessageKind::MediaOmitted),
            ("Contact card omitted", MessageKind::ContactOmitted),
            ("Missed voice call", MessageKind::CallEvent),
            ("Voice call, 3 min", MessageKind::CallEvent),
            ("👍", MessageKind::Reaction),
            ("ok", MessageKind::Reaction),
            (" k ", MessageKind::Reaction),
            ("see you at eight", MessageKind::Text),
        ];

        for (text, expected) in cases {
            assert_eq!(MessageKind::detect(text), expected, "Failed for {:?}", text);
        }
    }

    #[test]
    fn test_system_messages() {
        assert!(is_system_message(
            "Messages and calls are end-to-end encrypted. No one outside of this chat can read them."
        ));
        assert!(is_system_message("\u{200e}This message was deleted"));
        assert!(is_system_message("Bob changed the subject to \"Trip\""));
        assert!(is_system_message("Alice joined using this group's invite link"));
        assert!(is_system_message("document omitted"));
    }

    #[test]
    fn test_ordinary_messages_are_not_system() {
        assert!(!is_system_message("are we still meeting tomorrow?"));
        assert!(!is_system_message("the joinery looks great"));
    }
}
