use anyhow::{Result, bail};

use crate::fuel::Fuel;

/// Percentile used for the representative price of non-diesel fuels.
pub const REPRESENTATIVE_PERCENTILE: f64 = 5.0;

/// Statistical reduction of a cleaned price sample set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceStats {
    pub min: u32,
    /// Arithmetic mean, rounded to 2 decimal places.
    pub mean: f64,
    /// Linear-interpolation percentile of the sample set.
    pub percentile: f64,
}

/// Reduces a non-empty cleaned sample set to `{min, mean, percentile}`.
///
/// An empty sample set is a violated precondition and surfaces as an error.
pub fn calculate_statistics(prices: &[u32], pct: f64) -> Result<PriceStats> {
    if prices.is_empty() {
        bail!("cannot compute statistics over an empty price sample set");
    }

    let min = *prices.iter().min().unwrap();
    let mean = round2(prices.iter().map(|&p| p as f64).sum::<f64>() / prices.len() as f64);

    Ok(PriceStats {
        min,
        mean,
        percentile: percentile(prices, pct),
    })
}

/// Linear-interpolation percentile: the value below which `pct`% of samples
/// fall, interpolating between the two nearest ranks.
pub fn percentile(prices: &[u32], pct: f64) -> f64 {
    let mut sorted: Vec<f64> = prices.iter().map(|&p| p as f64).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (pct / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;

    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (rank - lo as f64) * (sorted[hi] - sorted[lo])
    }
}

/// The single statistic describing a fuel's price for the day: the cleaned
/// mean for diesel, the 5th percentile for everything else. Diesel pricing is
/// flatter and less cyclical than petrol, hence the different reduction.
pub fn representative_price(fuel_id: u32, stats: &PriceStats) -> f64 {
    if fuel_id == Fuel::Diesel.id() {
        stats.mean
    } else {
        stats.percentile
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(calculate_statistics(&[], 5.0).is_err());
    }

    #[test]
    fn test_mean_is_rounded_to_two_decimals() {
        let stats = calculate_statistics(&[1650, 1651, 1652], 5.0).unwrap();
        assert_eq!(stats.mean, 1651.0);

        let stats = calculate_statistics(&[100, 101, 101], 5.0).unwrap();
        assert_eq!(stats.mean, 100.67);
    }

    #[test]
    fn test_min_is_global_minimum() {
        let stats = calculate_statistics(&[1700, 1650, 1800], 5.0).unwrap();
        assert_eq!(stats.min, 1650);
    }

    #[test]
    fn test_percentile_endpoints_are_min_and_max() {
        let prices = [1650, 1700, 1800, 1900];
        assert_eq!(percentile(&prices, 0.0), 1650.0);
        assert_eq!(percentile(&prices, 100.0), 1900.0);
    }

    #[test]
    fn test_percentile_interpolates_between_ranks() {
        // Rank for the 50th percentile of 4 samples is 1.5.
        assert_eq!(percentile(&[100, 200, 300, 400], 50.0), 250.0);
        // Rank for the 5th percentile of 3 samples is 0.1.
        assert_eq!(percentile(&[100, 200, 300], 5.0), 110.0);
    }

    #[test]
    fn test_percentile_stays_within_sample_range() {
        let prices = [1650, 1700, 1800, 4999];
        for pct in [1.0, 5.0, 25.0, 75.0, 99.0] {
            let value = percentile(&prices, pct);
            assert!(value >= 1650.0 && value <= 4999.0, "percentile {pct} escaped range");
        }
    }

    #[test]
    fn test_single_sample_percentile() {
        assert_eq!(percentile(&[1650], 5.0), 1650.0);
    }

    #[test]
    fn test_representative_price_uses_mean_for_diesel_only() {
        let stats = PriceStats {
            min: 1600,
            mean: 1700.0,
            percentile: 1650.0,
        };
        assert_eq!(representative_price(Fuel::Diesel.id(), &stats), 1700.0);
        assert_eq!(representative_price(Fuel::U98.id(), &stats), 1650.0);
        // Untracked fuels follow the percentile rule too.
        assert_eq!(representative_price(4, &stats), 1650.0);
    }
}
