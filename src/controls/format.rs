/// Renders whole seconds as `HH:MM:SS`. Hours are not wrapped at 24.
pub fn format_time(total_seconds: u64) -> String {
    let seconds = total_seconds % 60;
    let minutes = (total_seconds / 60) % 60;
    let hours = total_seconds / 3600;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Same as [`format_time`] for a player-reported time in seconds.
/// Fractions are truncated; negative or non-finite input renders as zero.
pub fn format_secs(secs: f64) -> String {
    if secs.is_finite() && secs > 0.0 {
        format_time(secs as u64)
    } else {
        format_time(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_every_field_to_two_digits() {
        assert_eq!(format_time(0), "00:00:00");
        assert_eq!(format_time(59), "00:00:59");
        assert_eq!(format_time(60), "00:01:00");
        assert_eq!(format_time(3600), "01:00:00");
        assert_eq!(format_time(3661), "01:01:01");
    }

    #[test]
    fn hours_are_not_clamped() {
        assert_eq!(format_time(24 * 3600), "24:00:00");
        assert_eq!(format_time(100 * 3600 + 59), "100:00:59");
    }

    #[test]
    fn player_seconds_truncate_and_floor_at_zero() {
        assert_eq!(format_secs(61.9), "00:01:01");
        assert_eq!(format_secs(-3.0), "00:00:00");
        assert_eq!(format_secs(f64::NAN), "00:00:00");
    }
}
