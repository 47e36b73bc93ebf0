use std::collections::HashMap;

use tracing::warn;

use crate::fuel::Fuel;
use crate::store::PriceSnapshot;

/// An adjacent-day increase above this percentage flags the window.
pub const SPIKE_THRESHOLD_PCT: f64 = 5.0;

/// Number of most-recent snapshots examined for spikes.
pub const SPIKE_WINDOW: usize = 7;

/// Percentage change from `old` to `new`: `((new/old) - 1) * 100`.
pub fn percentage_change(new: f64, old: f64) -> f64 {
    ((new / old) - 1.0) * 100.0
}

/// Per-fuel percentage changes between two snapshots.
///
/// A fuel whose column is missing from either snapshot is omitted from the
/// result with a logged warning rather than failing the comparison.
pub fn change_set(newer: &PriceSnapshot, older: &PriceSnapshot) -> HashMap<Fuel, f64> {
    let mut changes = HashMap::new();

    for fuel in Fuel::TRACKED {
        match (newer.price(fuel), older.price(fuel)) {
            (Some(new), Some(old)) => {
                changes.insert(fuel, percentage_change(new, old));
            }
            _ => warn!(
                fuel = fuel.column(),
                newer_id = newer.id,
                older_id = older.id,
                "fuel column missing from stored snapshot, omitting from change set"
            ),
        }
    }

    changes
}

/// Whether any adjacent pair in the window shows a change above
/// [`SPIKE_THRESHOLD_PCT`] for the given fuel.
///
/// `records` must be ordered most-recent-first. Every adjacent pair is
/// tested, so a single large day-over-day jump flags the window even when
/// the overall trend is flat or declining.
pub fn spike_detected(records: &[PriceSnapshot], fuel: Fuel) -> bool {
    records.windows(2).any(|pair| {
        change_set(&pair[0], &pair[1])
            .get(&fuel)
            .is_some_and(|&pct| pct > SPIKE_THRESHOLD_PCT)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn snapshot(id: u64, u98: Option<f64>) -> PriceSnapshot {
        let mut snap = PriceSnapshot::new(id, NaiveDate::from_ymd_opt(2023, 6, 1).unwrap());
        if let Some(price) = u98 {
            for fuel in Fuel::TRACKED {
                snap.set_price(fuel, price);
            }
        }
        snap
    }

    fn u98_series(prices: &[f64]) -> Vec<PriceSnapshot> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| snapshot((prices.len() - i) as u64, Some(p)))
            .collect()
    }

    #[test]
    fn test_percentage_change_doubles() {
        assert_eq!(percentage_change(200.0, 100.0), 100.0);
    }

    #[test]
    fn test_percentage_change_falls_by_ten_percent() {
        let pct = percentage_change(90.0, 100.0);
        assert!((pct - -10.0).abs() < 1e-9);
    }

    #[test]
    fn test_change_set_covers_all_tracked_fuels() {
        let newer = snapshot(1, Some(1650.0));
        let older = snapshot(0, Some(1500.0));

        let changes = change_set(&newer, &older);
        assert_eq!(changes.len(), 4);
        assert!((changes[&Fuel::U98] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_change_set_omits_missing_columns() {
        let newer = snapshot(1, Some(1650.0));
        let older = snapshot(0, None);

        assert!(change_set(&newer, &older).is_empty());
    }

    #[test]
    fn test_spike_flagged_on_any_adjacent_jump() {
        // 10% jump between the two most recent snapshots.
        assert!(spike_detected(&u98_series(&[110.0, 100.0, 100.0]), Fuel::U98));
        // Jump buried in the middle of a flat week still counts.
        assert!(spike_detected(&u98_series(&[100.0, 100.0, 110.0, 100.0]), Fuel::U98));
    }

    #[test]
    fn test_no_spike_when_every_step_is_small() {
        assert!(!spike_detected(&u98_series(&[104.0, 100.0, 96.0]), Fuel::U98));
    }

    #[test]
    fn test_five_percent_exactly_is_not_a_spike() {
        assert!(!spike_detected(&u98_series(&[105.0, 100.0]), Fuel::U98));
    }

    #[test]
    fn test_decline_never_spikes() {
        assert!(!spike_detected(&u98_series(&[90.0, 100.0, 120.0]), Fuel::U98));
    }

    #[test]
    fn test_short_window_has_no_spike() {
        assert!(!spike_detected(&u98_series(&[100.0]), Fuel::U98));
        assert!(!spike_detected(&[], Fuel::U98));
    }
}
