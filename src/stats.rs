/// Rolling per-sensor averaging over accumulated samples
use std::collections::HashMap;

use crate::models::SensorKind;

/// Number of most-recent values the averaging slice covers.
pub const WINDOW: usize = 10;

/// Per-session sample history, one append-only sequence per sensor kind.
///
/// Histories grow for the lifetime of one session and are never pruned.
/// Memory grows without bound on a long-running session; acceptable for the
/// interactive use this client targets.
pub type SensorHistory = HashMap<SensorKind, Vec<f64>>;

/// Append one observed value to a kind's history.
pub fn record(history: &mut SensorHistory, kind: SensorKind, value: f64) {
    history.entry(kind).or_insert_with(Vec::new).push(value);
}

/// Average the slice `history[kind][skip .. skip + WINDOW]`.
///
/// The divisor is always the fixed WINDOW constant: when fewer than WINDOW
/// values fall in the slice the result undercounts rather than erroring.
/// A kind with no recorded values averages to zero.
pub fn average(history: &SensorHistory, kind: SensorKind, skip: usize) -> f64 {
    let Some(values) = history.get(&kind) else {
        return 0.0;
    };
    let sum: f64 = values.iter().skip(skip).take(WINDOW).sum();
    sum / WINDOW as f64
}

/// Advance the shared window offset once the message count exceeds WINDOW.
///
/// Called once per received message, not per sample, so the offset tracks
/// messages while histories grow per sample.
pub fn advance_skip(message_count: u64, skip: usize) -> usize {
    if message_count > WINDOW as u64 {
        skip + 1
    } else {
        skip
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn history_with(kind: SensorKind, values: &[f64]) -> SensorHistory {
        let mut history = SensorHistory::new();
        for &value in values {
            record(&mut history, kind, value);
        }
        history
    }

    #[test]
    fn record_appends_per_kind() {
        let mut history = SensorHistory::new();
        record(&mut history, SensorKind::Temperature, 20.0);
        record(&mut history, SensorKind::Humidity, 50.0);
        record(&mut history, SensorKind::Temperature, 22.0);
        assert_eq!(history[&SensorKind::Temperature], vec![20.0, 22.0]);
        assert_eq!(history[&SensorKind::Humidity], vec![50.0]);
    }

    #[test]
    fn full_window_average_is_arithmetic_mean() {
        let values: Vec<f64> = (1..=10).map(f64::from).collect();
        let history = history_with(SensorKind::Pressure, &values);
        assert_relative_eq!(average(&history, SensorKind::Pressure, 0), 5.5);
    }

    #[test]
    fn short_slice_undercounts_against_fixed_window() {
        let history = history_with(SensorKind::Temperature, &[10.0, 20.0, 30.0]);
        // Three values still divide by the fixed window of 10.
        assert_relative_eq!(average(&history, SensorKind::Temperature, 0), 6.0);
    }

    #[test]
    fn skip_offsets_the_averaging_slice() {
        let values: Vec<f64> = (1..=12).map(f64::from).collect();
        let history = history_with(SensorKind::Humidity, &values);
        // Slice [2..12] = 3..=12, mean 7.5
        assert_relative_eq!(average(&history, SensorKind::Humidity, 2), 7.5);
    }

    #[test]
    fn unseen_kind_averages_to_zero() {
        let history = SensorHistory::new();
        assert_relative_eq!(average(&history, SensorKind::Pressure, 0), 0.0);
    }

    #[test]
    fn skip_advances_only_past_window() {
        assert_eq!(advance_skip(1, 0), 0);
        assert_eq!(advance_skip(10, 0), 0);
        assert_eq!(advance_skip(11, 0), 1);
        assert_eq!(advance_skip(25, 14), 15);
    }
}
