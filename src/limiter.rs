//! Combinatorial budget limiter
//!
//! Given the sizes of several independent factor sets (prefix options,
//! suffix options, ...) and a global budget on the size of their Cartesian
//! product, compute how many options of each factor may be used.
//!
//! The allocation is max-min fair: small factors are used in full
//! ("saturated") and the rest of the budget is shared evenly between the
//! larger ones, with any leftover handed out one unit at a time starting
//! from the largest factor.

use crate::error::{NameForgeError, Result};

/// Compute per-factor caps for the given factor `sizes` under `budget`.
///
/// Caps are returned in the same order as `sizes`. For every cap
/// `1 <= cap <= size` and the product of all caps never exceeds `budget`.
/// A cap never drops to zero: a budget too small for any growth leaves
/// every factor at a single option.
pub fn compute_limits(sizes: &[u64], budget: u64) -> Result<Vec<u64>> {
    if budget < 1 {
        return Err(NameForgeError::invalid_input("budget must be at least 1"));
    }
    if let Some(pos) = sizes.iter().position(|&s| s < 1) {
        return Err(NameForgeError::invalid_input(format!(
            "factor {} has size 0; sizes must be at least 1",
            pos
        )));
    }

    let mut caps: Vec<Option<u64>> = vec![None; sizes.len()];
    // Budget left for the active factors is `budget / saturated`, kept as a
    // fraction so the share comparisons stay exact.
    let mut saturated: u128 = 1;

    // Saturation passes: any factor that fits inside the fair share is used
    // in full. Removing it can only grow the share of the others.
    loop {
        let active: Vec<usize> = (0..sizes.len()).filter(|&i| caps[i].is_none()).collect();
        if active.is_empty() {
            break;
        }
        let k = active.len() as u32;

        let fits: Vec<usize> = active
            .iter()
            .copied()
            .filter(|&i| fits_share(sizes[i], k, saturated, budget))
            .collect();
        if fits.is_empty() {
            break;
        }
        for i in fits {
            caps[i] = Some(sizes[i]);
            saturated = saturated.saturating_mul(sizes[i] as u128);
        }
    }

    let active: Vec<usize> = (0..sizes.len()).filter(|&i| caps[i].is_none()).collect();
    if active.is_empty() {
        return Ok(caps.into_iter().map(|c| c.unwrap_or(1)).collect());
    }

    let k = active.len() as u32;
    let baseline = fair_share(k, saturated, budget);
    let mut limits: Vec<u64> = caps
        .iter()
        .zip(sizes)
        .map(|(cap, &size)| cap.unwrap_or_else(|| baseline.min(size)))
        .collect();

    // Hand out the leftover, largest factors first. Stable sort keeps
    // equal sizes in input order.
    let mut by_size = active;
    by_size.sort_by(|&a, &b| sizes[b].cmp(&sizes[a]));

    loop {
        let mut incremented = false;
        for &i in &by_size {
            if limits[i] >= sizes[i] {
                continue;
            }
            limits[i] += 1;
            if product(&limits) <= budget as u128 {
                incremented = true;
            } else {
                limits[i] -= 1;
            }
        }
        if !incremented {
            break;
        }
    }

    Ok(limits)
}

/// `size^k <= budget / saturated`, i.e. `size` is within the ideal share.
fn fits_share(size: u64, k: u32, saturated: u128, budget: u64) -> bool {
    pow_sat(size, k).saturating_mul(saturated) <= budget as u128
}

/// Largest integer share `b >= 1` with `b^k <= budget / saturated`.
fn fair_share(k: u32, saturated: u128, budget: u64) -> u64 {
    let remaining = budget as f64 / saturated as f64;
    let mut share = (remaining.powf(1.0 / k as f64).floor() as u64).max(1);
    // Correct the float estimate in both directions.
    while share > 1 && !fits_share(share, k, saturated, budget) {
        share -= 1;
    }
    while fits_share(share + 1, k, saturated, budget) {
        share += 1;
    }
    share
}

fn pow_sat(base: u64, exp: u32) -> u128 {
    (0..exp).fold(1u128, |acc, _| acc.saturating_mul(base as u128))
}

fn product(limits: &[u64]) -> u128 {
    limits
        .iter()
        .fold(1u128, |acc, &l| acc.saturating_mul(l as u128))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_equal_large_factors() {
        assert_eq!(
            compute_limits(&[1000, 1000, 1000, 1000], 10000).unwrap(),
            vec![10, 10, 10, 10]
        );
    }

    #[test]
    fn test_single_large_factor_takes_everything() {
        assert_eq!(
            compute_limits(&[1, 1, 1_000_000, 1], 10000).unwrap(),
            vec![1, 1, 10000, 1]
        );
    }

    #[test]
    fn test_cascading_saturation() {
        assert_eq!(
            compute_limits(&[1, 1, 100, 10, 10, 10], 10000).unwrap(),
            vec![1, 1, 10, 10, 10, 10]
        );
    }

    #[test]
    fn test_leftover_goes_to_largest() {
        let sizes = [1, 2, 4, 8, 16, 32, 64];
        let limits = compute_limits(&sizes, 10000).unwrap();
        assert_eq!(limits, vec![1, 2, 4, 5, 6, 6, 6]);
        assert!(product(&limits) <= 10000);
    }

    #[test]
    fn test_everything_fits() {
        assert_eq!(compute_limits(&[3, 4, 5], 1000).unwrap(), vec![3, 4, 5]);
    }

    #[test]
    fn test_empty_sizes() {
        assert!(compute_limits(&[], 10).unwrap().is_empty());
    }

    #[test]
    fn test_floor_of_one() {
        // Budget too small for any growth: every factor still gets one option.
        assert_eq!(compute_limits(&[5, 5, 5], 1).unwrap(), vec![1, 1, 1]);
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(
            compute_limits(&[3, 0], 10),
            Err(NameForgeError::InvalidInput { .. })
        ));
        assert!(matches!(
            compute_limits(&[3, 4], 0),
            Err(NameForgeError::InvalidInput { .. })
        ));
    }

    proptest! {
        #[test]
        fn caps_respect_sizes_and_budget(
            sizes in prop::collection::vec(1u64..5000, 1..7),
            budget in 1u64..1_000_000,
        ) {
            let limits = compute_limits(&sizes, budget).unwrap();
            prop_assert_eq!(limits.len(), sizes.len());
            for (cap, size) in limits.iter().zip(&sizes) {
                prop_assert!(*cap >= 1);
                prop_assert!(cap <= size);
            }
            prop_assert!(product(&limits) <= budget as u128);
        }
    }
}
