//! Penny-accurate equal split of a monetary total across units.
//!
//! Pure function; no storage involved. Used by the allocation UI to prefill
//! an even split before the user fine-tunes percentages or amounts.
use log::debug;
use serde::{Deserialize, Serialize};

/// One unit's share of an equally split total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitShare {
    pub unit_id: String,
    pub amount: f64,
    /// Display-only even percentage (100 / n, rounded to 2 decimals). The
    /// sum invariant is carried by `amount`, never by this field.
    pub percentage: f64,
}

/// Split `total_amount` equally across `unit_ids`.
///
/// Every share except the first gets the total divided by n and rounded
/// *down* to the cent; the first share absorbs the full rounding remainder.
/// The returned amounts therefore sum to `total_amount` for every n ≥ 1
/// (within floating-point noise well under a cent). An empty input yields an
/// empty split.
pub fn equal_split(unit_ids: &[String], total_amount: f64) -> Vec<SplitShare> {
    if unit_ids.is_empty() {
        return Vec::new();
    }

    let n = unit_ids.len() as f64;
    // Round down to the cent so the remainder is always non-negative
    let base = (total_amount / n * 100.0).floor() / 100.0;
    let remainder = total_amount - base * n;
    let percentage = (100.0 / n * 100.0).round() / 100.0;

    debug!(
        "Equal split of {:.2} across {} units: base {:.2}, remainder {:.2} on first unit",
        total_amount,
        unit_ids.len(),
        base,
        remainder
    );

    unit_ids
        .iter()
        .enumerate()
        .map(|(index, unit_id)| {
            let amount = if index == 0 {
                ((base + remainder) * 100.0).round() / 100.0
            } else {
                base
            };
            SplitShare {
                unit_id: unit_id.clone(),
                amount,
                percentage,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("unit::{}", i)).collect()
    }

    #[test]
    fn test_empty_input_yields_empty_split() {
        let shares = equal_split(&[], 100.0);
        assert!(shares.is_empty());
    }

    #[test]
    fn test_single_unit_takes_whole_total() {
        let shares = equal_split(&ids(1), 123.45);
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].amount, 123.45);
        assert_eq!(shares[0].percentage, 100.0);
    }

    #[test]
    fn test_three_way_split_of_100() {
        let shares = equal_split(&ids(3), 100.0);
        assert_eq!(shares.len(), 3);

        // Remainder cent lands on the first unit
        assert_eq!(shares[0].amount, 33.34);
        assert_eq!(shares[1].amount, 33.33);
        assert_eq!(shares[2].amount, 33.33);
        assert_eq!(shares[0].percentage, 33.33);

        let sum: f64 = shares.iter().map(|s| s.amount).sum();
        assert!((sum - 100.0).abs() < 0.005);
    }

    #[test]
    fn test_even_split_has_no_remainder() {
        let shares = equal_split(&ids(4), 100.0);
        for share in &shares {
            assert_eq!(share.amount, 25.0);
            assert_eq!(share.percentage, 25.0);
        }
    }

    #[test]
    fn test_zero_total() {
        let shares = equal_split(&ids(5), 0.0);
        let sum: f64 = shares.iter().map(|s| s.amount).sum();
        assert!(sum.abs() < 0.005);
        for share in &shares {
            assert_eq!(share.amount, 0.0);
        }
    }

    #[test]
    fn test_sum_invariant_holds_for_every_n_up_to_1000() {
        for total in [100.0, 1000.37, 0.01, 7.77, 999999.99] {
            for n in 1..=1000 {
                let shares = equal_split(&ids(n), total);
                let sum: f64 = shares.iter().map(|s| s.amount).sum();
                assert!(
                    (sum - total).abs() < 0.01,
                    "split of {} across {} units summed to {}",
                    total,
                    n,
                    sum
                );
                // Everyone but the first gets the rounded-down base
                for pair in shares.windows(2).skip(1) {
                    assert_eq!(pair[0].amount, pair[1].amount);
                }
                // The first share absorbs the remainder, never loses money
                if shares.len() > 1 {
                    assert!(shares[0].amount >= shares[1].amount - 0.005);
                }
            }
        }
    }
}
