/// Formats a microsecond duration as `HH:MM:SS`, truncating sub-second
/// precision — used for the status line the CLI prints between control
/// key presses.
///
/// ```
/// assert_eq!(tftvid_core::helpers::time::format_hms(0), "00:00:00");
/// assert_eq!(tftvid_core::helpers::time::format_hms(3_661_000_000), "01:01:01");
/// ```
pub fn format_hms(us: i64) -> String {
    let total_secs = (us.max(0) / 1_000_000) as u64;
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

/// Formats a `pos / duration` pair as `HH:MM:SS / HH:MM:SS`.
pub fn format_progress(pos_us: i64, duration_us: i64) -> String {
    format!("{} / {}", format_hms(pos_us), format_hms(duration_us))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_positions_clamp_to_zero() {
        assert_eq!(format_hms(-5_000_000), "00:00:00");
    }

    #[test]
    fn progress_joins_both_sides() {
        assert_eq!(format_progress(61_000_000, 3_600_000_000), "00:01:01 / 01:00:00");
    }
}
