// src/utils/format.rs

/// Formats seconds as `m:ss` (minutes are not wrapped into hours).
pub fn format_time(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Formats a percentage with one decimal place.
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(59), "0:59");
        assert_eq!(format_time(60), "1:00");
        assert_eq!(format_time(1805), "30:05");
        assert_eq!(format_time(3725), "62:05");
    }

    #[test]
    fn formats_percentages() {
        assert_eq!(format_percent(66.666), "66.7%");
        assert_eq!(format_percent(100.0), "100.0%");
    }
}
