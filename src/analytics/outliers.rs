/// Prices at or above this value (in the provider's sub-unit scale) are
/// treated as data-entry errors rather than genuine high prices.
pub const OUTLIER_CEILING: u32 = 5000;

/// Removes implausibly-high prices from a raw sample set.
///
/// Sorts ascending and keeps every element strictly below
/// [`OUTLIER_CEILING`]. The minimum element is kept unconditionally, even
/// when it sits at or above the ceiling. Low prices are never removed.
pub fn remove_outliers(prices: &[u32]) -> Vec<u32> {
    let mut sorted = prices.to_vec();
    sorted.sort_unstable();

    let Some((&min, rest)) = sorted.split_first() else {
        return Vec::new();
    };

    let mut cleaned = Vec::with_capacity(sorted.len());
    cleaned.push(min);
    cleaned.extend(rest.iter().copied().filter(|&p| p < OUTLIER_CEILING));

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(remove_outliers(&[]).is_empty());
    }

    #[test]
    fn test_high_outliers_are_dropped() {
        let cleaned = remove_outliers(&[1700, 9999, 1650, 5000]);
        assert_eq!(cleaned, vec![1650, 1700]);
    }

    #[test]
    fn test_minimum_is_kept_even_above_ceiling() {
        // Every sample is garbage, but the single minimum survives.
        let cleaned = remove_outliers(&[9999, 5000, 7500]);
        assert_eq!(cleaned, vec![5000]);
    }

    #[test]
    fn test_low_prices_are_never_removed() {
        let cleaned = remove_outliers(&[1, 1650, 1700]);
        assert_eq!(cleaned, vec![1, 1650, 1700]);
    }

    #[test]
    fn test_output_is_sorted_and_never_longer_than_input() {
        let input = [1800, 1650, 4999, 5001, 1700];
        let cleaned = remove_outliers(&input);

        assert!(cleaned.windows(2).all(|w| w[0] <= w[1]));
        assert!(cleaned.len() <= input.len());
        assert!(cleaned.contains(input.iter().min().unwrap()));
    }

    #[test]
    fn test_value_just_below_ceiling_is_kept() {
        let cleaned = remove_outliers(&[1650, 4999]);
        assert_eq!(cleaned, vec![1650, 4999]);
    }
}
