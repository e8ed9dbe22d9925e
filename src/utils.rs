/// Utility functions for output formatting
use time::{format_description, OffsetDateTime};

/// Format a timestamp for human-readable logging
///
/// Converts an OffsetDateTime to DD.MM.YYYY - HH:MM:SS format
/// Falls back to default string representation if formatting fails.
pub fn format_datetime(dt: &OffsetDateTime) -> String {
    let format = format_description::parse("[day].[month].[year] - [hour]:[minute]:[second]")
        .expect("Failed to create format description");
    dt.format(&format).unwrap_or_else(|_| dt.to_string())
}

/// Render a wire timestamp, given in 100 ns ticks, as a duration.
pub fn ticks_to_duration(ticks: i64) -> time::Duration {
    time::Duration::nanoseconds(ticks.saturating_mul(100))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_ticks_at_100ns_each() {
        assert_eq!(ticks_to_duration(10_000_000), time::Duration::seconds(1));
        assert_eq!(ticks_to_duration(100), time::Duration::nanoseconds(10_000));
    }
}
