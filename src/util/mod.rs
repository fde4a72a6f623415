/// `2024-03-01T09:30:00.000Z` → `2024-03-01 09:30`. Anything that does not look like an
/// ISO-8601 date-time is shown as-is.
pub(crate) fn format_timestamp(raw: &str) -> String {
    let raw = raw.trim();
    let b = raw.as_bytes();
    let iso = b.len() >= 16
        && b[4] == b'-'
        && b[7] == b'-'
        && (b[10] == b'T' || b[10] == b' ')
        && b[13] == b':';
    match (iso, raw.get(..10), raw.get(11..16)) {
        (true, Some(date), Some(time)) => format!("{date} {time}"),
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp("2024-03-01T09:30:12.000Z"), "2024-03-01 09:30");
        assert_eq!(format_timestamp(" 2024-03-01 09:30:12 "), "2024-03-01 09:30");
        assert_eq!(format_timestamp("2024-03-01"), "2024-03-01");
        assert_eq!(format_timestamp("yesterday"), "yesterday");
        assert_eq!(format_timestamp(""), "");
    }
}
