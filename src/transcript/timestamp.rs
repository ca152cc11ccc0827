use chrono::NaiveDateTime;

/// Parse an export's date and time fields.
///
/// Exports disagree on layout: times with seconds come month-first, times
/// without seconds come day-first. The year width is read off the date.
pub fn parse_timestamp(date: &str, time: &str) -> Option<NaiveDateTime> {
    let time = normalize_time(time);

    let four_digit_year = date
        .split('/')
        .nth(2)
        .is_some_and(|year| year.len() == 4);

    let (with_seconds, without_seconds) = if four_digit_year {
        ("%m/%d/%Y %I:%M:%S %p", "%d/%m/%Y %I:%M %p")
    } else {
        ("%m/%d/%y %I:%M:%S %p", "%d/%m/%y %I:%M %p")
    };

    let stamp = format!("{} {}", date.trim(), time);
    NaiveDateTime::parse_from_str(&stamp, with_seconds)
        .or_else(|_| NaiveDateTime::parse_from_str(&stamp, without_seconds))
        .ok()
}

fn normalize_time(time: &str) -> String {
    let mut time = time
        .replace(['\u{202f}', '\u{a0}'], " ")
        .trim()
        .to_uppercase();

    // "10:30PM" -> "10:30 PM"
    if time.ends_with("AM") || time.ends_with("PM") {
        let split = time.len() - 2;
        if !time[..split].ends_with(' ') {
            time.insert(split, ' ');
        }
    }

    time
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_with_seconds_is_month_first() {
        assert_eq!(
            parse_timestamp("1/5/24", "10:02:33 PM"),
            Some(dt(2024, 1, 5, 22, 2, 33))
        );
    }

    #[test]
    fn test_without_seconds_is_day_first() {
        assert_eq!(
            parse_timestamp("1/5/24", "9:15 am"),
            Some(dt(2024, 5, 1, 9, 15, 0))
        );
    }

    #[test]
    fn test_four_digit_year() {
        assert_eq!(
            parse_timestamp("13/05/2024", "11:00 pm"),
            Some(dt(2024, 5, 13, 23, 0, 0))
        );
    }

    #[test]
    fn test_narrow_no_break_space() {
        assert_eq!(
            parse_timestamp("3/9/24", "8:00:00\u{202f}AM"),
            Some(dt(2024, 3, 9, 8, 0, 0))
        );
    }

    #[test]
    fn test_missing_space_before_meridiem() {
        assert_eq!(
            parse_timestamp("1/5/24", "9:15pm"),
            Some(dt(2024, 5, 1, 21, 15, 0))
        );
    }

    #[test]
    fn test_garbage() {
        assert_eq!(parse_timestamp("99/99/99", "25:00 PM"), None);
    }
}
