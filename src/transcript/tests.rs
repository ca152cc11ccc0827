#[cfg(test)]
mod tests {
    use crate::transcript::{
        LineFormat, MessageKind, SYSTEM_SENDER_ID, SenderMap, TranscriptError, TranscriptParser,
        parse_line_start, parse_transcript, split_noise,
    };
    use chrono::{NaiveDate, NaiveDateTime};
    use std::collections::HashSet;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    const BRACKETED: &str = "\
[1/5/24, 10:00:00 AM] Alice: Messages and calls are end-to-end encrypted.
[1/5/24, 10:00:12 AM] Alice: anyone up for hiking saturday?
thinking the ridge trail
[1/5/24, 10:03:40 AM] Bob: yes!
[1/5/24, 10:04:02 AM] Bob: 👍
[1/5/24, 10:05:00 AM] Carol: \u{200e}image omitted
[1/5/24, 10:07:30 AM] Alice: great, I'll book parking
";

    // ========================================================================
    // Line Header Tests
    // ========================================================================

    #[test]
    fn test_bracketed_header() {
        let start = parse_line_start("[1/5/24, 10:00:12 AM] Alice Smith: hi: there").unwrap();
        assert_eq!(start.date, "1/5/24");
        assert_eq!(start.time, "10:00:12 AM");
        assert_eq!(start.sender, Some("Alice Smith"));
        assert_eq!(start.text, "hi: there");
        assert_eq!(start.format, LineFormat::Bracketed);
    }

    #[test]
    fn test_bracketed_header_with_bidi_mark() {
        let start =
            parse_line_start("\u{200e}[1/5/24, 10:00:12\u{202f}AM] Bob: \u{200e}sticker omitted");
        assert_eq!(start.unwrap().sender, Some("Bob"));
    }

    #[test]
    fn test_dashed_header() {
        let start = parse_line_start("13/05/2024, 9:41 pm - Dana: on my way").unwrap();
        assert_eq!(start.date, "13/05/2024");
        assert_eq!(start.time, "9:41 pm");
        assert_eq!(start.sender, Some("Dana"));
        assert_eq!(start.text, "on my way");
        assert_eq!(start.format, LineFormat::Dashed);
    }

    #[test]
    fn test_dashed_system_header() {
        let start =
            parse_line_start("13/05/24, 9:40 PM - Dana joined using this group's invite link")
                .unwrap();
        assert_eq!(start.sender, None);
        assert_eq!(start.text, "Dana joined using this group's invite link");
    }

    #[test]
    fn test_continuation_line() {
        assert!(parse_line_start("thinking the ridge trail").is_none());
        assert!(parse_line_start("").is_none());
        assert!(parse_line_start("1/5/24 was a good day").is_none());
    }

    // ========================================================================
    // Parser Tests
    // ========================================================================

    #[test]
    fn test_parse_bracketed_transcript() {
        let entries = parse_transcript(BRACKETED).unwrap();
        assert_eq!(entries.len(), 6);

        let hiking = &entries[1];
        assert_eq!(hiking.sender, "Alice");
        assert_eq!(hiking.message.sender_id, "user_001");
        assert_eq!(hiking.message.timestamp, dt(2024, 1, 5, 10, 0, 12));
        assert_eq!(
            hiking.message.text,
            "anyone up for hiking saturday?\nthinking the ridge trail"
        );
        assert!(hiking.is_multiline);
        assert_eq!(hiking.raw_line_count, 2);
        assert_eq!(hiking.kind, MessageKind::Text);

        assert_eq!(entries[2].message.sender_id, "user_002");
        assert_eq!(entries[3].kind, MessageKind::Reaction);
        assert_eq!(entries[4].message.sender_id, "user_003");
        assert_eq!(entries[4].kind, MessageKind::System);
        assert!(entries[4].is_system);
        assert_eq!(entries[5].message.sender_id, "user_001");
    }

    #[test]
    fn test_system_line_flagged() {
        let entries = parse_transcript(BRACKETED).unwrap();
        assert!(entries[0].is_system);
        assert_eq!(entries[0].kind, MessageKind::System);
        assert!(!entries[1].is_system);
    }

    #[test]
    fn test_message_ids_unique() {
        let entries = parse_transcript(BRACKETED).unwrap();
        let ids: HashSet<&str> = entries.iter().map(|e| e.message.message_id.as_str()).collect();
        assert_eq!(ids.len(), entries.len());
    }

    #[test]
    fn test_parse_dashed_transcript() {
        let input = "\
13/05/24, 9:40 PM - Dana joined using this group's invite link
13/05/24, 9:41 PM - Dana: on my way
13/05/24, 9:43 PM - Eli: cool
see you there
";
        let entries = parse_transcript(input).unwrap();
        assert_eq!(entries.len(), 3);

        assert_eq!(entries[0].message.sender_id, SYSTEM_SENDER_ID);
        assert!(entries[0].is_system);

        assert_eq!(entries[1].message.sender_id, "user_001");
        assert_eq!(entries[1].message.timestamp, dt(2024, 5, 13, 21, 41, 0));
        assert_eq!(entries[2].message.text, "cool\nsee you there");
    }

    #[test]
    fn test_leading_orphan_lines_dropped() {
        let input = "exported chat\n[1/5/24, 10:00:00 AM] Alice: hello there\n";
        let entries = parse_transcript(input).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message.text, "hello there");
    }

    #[test]
    fn test_bad_timestamp_reports_line() {
        let input = "[1/5/24, 10:00:00 AM] Alice: ok then\n[13/45/24, 10:00:00 AM] Bob: hm\n";
        let err = parse_transcript(input).unwrap_err();
        assert!(matches!(err, TranscriptError::Timestamp { line: 2, .. }));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_transcript("").unwrap().is_empty());
    }

    #[test]
    fn test_sender_ids_scoped_per_parser() {
        let mut first = TranscriptParser::new();
        first
            .parse_str("[1/5/24, 10:00:00 AM] Zed: first stream\n")
            .unwrap();
        let later = first
            .parse_str("[1/5/24, 11:00:00 AM] Amy: same parser\n")
            .unwrap();
        assert_eq!(later[0].message.sender_id, "user_002");
        assert_eq!(first.senders().len(), 2);

        let fresh = parse_transcript("[1/5/24, 11:00:00 AM] Amy: new stream\n").unwrap();
        assert_eq!(fresh[0].message.sender_id, "user_001");
    }

    #[test]
    fn test_sender_map_assignment() {
        let mut map = SenderMap::new();
        assert!(map.is_empty());
        assert_eq!(map.id_for("Alice"), "user_001");
        assert_eq!(map.id_for("Bob"), "user_002");
        assert_eq!(map.id_for("Alice"), "user_001");
        assert_eq!(map.get("Bob"), Some("user_002"));
        assert_eq!(map.get("Carol"), None);
        assert_eq!(map.len(), 2);
    }

    // ========================================================================
    // Noise Split Tests
    // ========================================================================

    #[test]
    fn test_split_noise() {
        let entries = parse_transcript(BRACKETED).unwrap();
        let (normal, noise) = split_noise(entries);

        let normal_texts: Vec<&str> = normal.iter().map(|e| e.message.text.as_str()).collect();
        assert_eq!(
            normal_texts,
            vec![
                "anyone up for hiking saturday?\nthinking the ridge trail",
                "yes!",
                "great, I'll book parking",
            ]
        );
        assert_eq!(noise.len(), 3);
        assert!(noise.iter().all(|e| e.is_noise()));
    }

    #[test]
    fn test_entry_serializes_flat() {
        let entries = parse_transcript("[1/5/24, 10:00:00 AM] Alice: hello there\n").unwrap();
        let json = serde_json::to_value(&entries[0]).unwrap();
        assert_eq!(json["sender_id"], "user_001");
        assert_eq!(json["timestamp"], "2024-01-05T10:00:00");
        assert_eq!(json["text"], "hello there");
        assert_eq!(json["kind"], "text");
        assert!(json.get("message").is_none());
    }
}
