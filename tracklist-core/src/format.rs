//! Display helpers

const SECS_PER_HOUR: i64 = 60 * 60;
const SECS_PER_DAY: i64 = 24 * SECS_PER_HOUR;

/// Render a duration in seconds for display.
///
/// Under an hour reads `m:ss min`, under a day `h:mm:ss h`, anything longer
/// `24+ hours`. Zero and negative values read `0:00 min`.
pub fn format_duration(seconds: i64) -> String {
    if seconds <= 0 {
        return "0:00 min".to_string();
    }
    if seconds >= SECS_PER_DAY {
        return "24+ hours".to_string();
    }
    let hours = seconds / SECS_PER_HOUR;
    let minutes = (seconds % SECS_PER_HOUR) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02} h", hours, minutes, secs)
    } else {
        format!("{}:{:02} min", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_ranges() {
        assert_eq!(format_duration(0), "0:00 min");
        assert_eq!(format_duration(-12), "0:00 min");
        assert_eq!(format_duration(7), "0:07 min");
        assert_eq!(format_duration(185), "3:05 min");
        assert_eq!(format_duration(3599), "59:59 min");
        assert_eq!(format_duration(3600), "1:00:00 h");
        assert_eq!(format_duration(3 * 3600 + 4 * 60 + 5), "3:04:05 h");
        assert_eq!(format_duration(86_399), "23:59:59 h");
        assert_eq!(format_duration(86_400), "24+ hours");
    }
}
