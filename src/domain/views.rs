use chrono::{Local, TimeZone};

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Format an elapsed duration as "Xd Yh Zm", omitting zero parts.
/// Anything under a minute reads "Just now".
pub fn format_duration(ms: i64) -> String {
    let ms = ms.max(0);
    let days = ms / DAY_MS;
    let hours = (ms % DAY_MS) / HOUR_MS;
    let minutes = (ms % HOUR_MS) / MINUTE_MS;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{}d", days));
    }
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 {
        parts.push(format!("{}m", minutes));
    }

    if parts.is_empty() {
        return "Just now".to_string();
    }
    parts.join(" ")
}

/// Format an epoch-millisecond start time in local time
pub fn format_start_time(ms: i64) -> String {
    match Local.timestamp_millis_opt(ms).single() {
        Some(time) => time.format("%Y-%m-%d %H:%M").to_string(),
        None => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_under_a_minute() {
        assert_eq!(format_duration(0), "Just now");
        assert_eq!(format_duration(59_999), "Just now");
        assert_eq!(format_duration(-5_000), "Just now");
    }

    #[test]
    fn test_format_duration_omits_zero_parts() {
        assert_eq!(format_duration(MINUTE_MS), "1m");
        assert_eq!(format_duration(2 * HOUR_MS), "2h");
        assert_eq!(format_duration(DAY_MS + 5 * MINUTE_MS), "1d 5m");
        assert_eq!(format_duration(3 * DAY_MS + 4 * HOUR_MS + 30 * MINUTE_MS + 999), "3d 4h 30m");
    }

    #[test]
    fn test_format_start_time_shape() {
        let formatted = format_start_time(0);
        // "YYYY-MM-DD HH:MM" in whatever the local zone is
        assert_eq!(formatted.len(), 16);
        assert_eq!(formatted.chars().nth(4), Some('-'));
    }
}
