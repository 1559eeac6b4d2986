//! Sample cleaning and fixed-size subgrouping.
//!
//! Missing observations are represented as non-finite values (`NaN`) and are
//! removed before any chart is computed. Paired series (defects vs. totals)
//! are cleaned pair-wise so the two sides stay aligned.

use tracing::debug;

use super::chart::ChartKind;
use super::constants::ControlConstants;
use crate::error::{Result, SpcError};

/// Drop non-finite entries, keeping the original order.
pub fn clean_series(values: &[f64]) -> Vec<f64> {
    let cleaned: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    if cleaned.len() != values.len() {
        debug!(
            dropped = values.len() - cleaned.len(),
            kept = cleaned.len(),
            "removed missing observations"
        );
    }
    cleaned
}

/// Clean a paired (count, base) series.
///
/// A pair is dropped when either side is non-finite or the base (inspected
/// total / opportunity count) is not positive.
///
/// # Errors
///
/// [`SpcError::MismatchedLength`] if the two slices differ in length.
pub fn clean_pairs(counts: &[f64], bases: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
    if counts.len() != bases.len() {
        return Err(SpcError::MismatchedLength {
            left: counts.len(),
            right: bases.len(),
        });
    }

    let (kept_counts, kept_bases): (Vec<f64>, Vec<f64>) = counts
        .iter()
        .zip(bases)
        .filter(|&(&d, &n)| d.is_finite() && n.is_finite() && n > 0.0)
        .map(|(&d, &n)| (d, n))
        .unzip();

    if kept_counts.len() != counts.len() {
        debug!(
            dropped = counts.len() - kept_counts.len(),
            kept = kept_counts.len(),
            "removed invalid sample pairs"
        );
    }
    Ok((kept_counts, kept_bases))
}

/// Partition `series` into contiguous windows of exactly `n` values.
///
/// The trailing `len % n` values that cannot fill a window are discarded;
/// this is not an error. Ordering is preserved.
///
/// # Errors
///
/// - [`SpcError::UnsupportedSubgroupSize`] if `n` is outside 2..=6.
/// - [`SpcError::InsufficientData`] if no complete window can be formed.
///
/// ```
/// use u_spc::spc::subgroup;
///
/// let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
/// let groups = subgroup(&data, 3).unwrap();
/// assert_eq!(groups, vec![&data[0..3], &data[3..6]]);
/// ```
pub fn subgroup(series: &[f64], n: usize) -> Result<Vec<&[f64]>> {
    ControlConstants::for_size(n)?;

    let groups: Vec<&[f64]> = series.chunks_exact(n).collect();
    if groups.is_empty() {
        return Err(SpcError::InsufficientData {
            chart: ChartKind::XBarR,
            required: n,
            actual: series.len(),
        });
    }

    let remainder = series.len() % n;
    if remainder > 0 {
        debug!(remainder, subgroup_size = n, "discarded incomplete trailing subgroup");
    }
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_series_drops_nan() {
        let cleaned = clean_series(&[1.0, f64::NAN, 2.0, f64::INFINITY, 3.0]);
        assert_eq!(cleaned, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_clean_pairs_filters_non_positive_base() {
        let (d, n) = clean_pairs(&[1.0, 2.0, f64::NAN, 4.0], &[10.0, 0.0, 10.0, 20.0])
            .expect("equal lengths");
        assert_eq!(d, vec![1.0, 4.0]);
        assert_eq!(n, vec![10.0, 20.0]);
    }

    #[test]
    fn test_clean_pairs_mismatched() {
        let err = clean_pairs(&[1.0, 2.0], &[10.0]).unwrap_err();
        assert!(matches!(
            err,
            SpcError::MismatchedLength { left: 2, right: 1 }
        ));
    }

    #[test]
    fn test_subgroup_exact_fit() {
        let data: Vec<f64> = (0..10).map(f64::from).collect();
        let groups = subgroup(&data, 5).expect("two windows");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1], &[5.0, 6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_subgroup_drops_remainder() {
        let data: Vec<f64> = (0..11).map(f64::from).collect();
        let groups = subgroup(&data, 4).expect("two windows");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups.iter().map(|g| g.len()).sum::<usize>(), 8);
    }

    #[test]
    fn test_subgroup_too_short() {
        let err = subgroup(&[1.0, 2.0], 3).unwrap_err();
        assert!(matches!(
            err,
            SpcError::InsufficientData {
                required: 3,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_subgroup_rejects_size() {
        assert!(matches!(
            subgroup(&[1.0; 20], 7),
            Err(SpcError::UnsupportedSubgroupSize(7))
        ));
        assert!(matches!(
            subgroup(&[1.0; 20], 1),
            Err(SpcError::UnsupportedSubgroupSize(1))
        ));
    }
}
