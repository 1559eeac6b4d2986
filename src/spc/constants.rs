//! Control chart factor tables.
//!
//! Values follow ASTM E2587 for subgroup sizes n = 2..=6. No factors are
//! tabulated outside that range.
//!
//! # References
//!
//! - ASTM E2587 — Standard Practice for Use of Control Charts in Statistical
//!   Process Control.
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.,
//!   Appendix Table VI.

use serde::Serialize;

use crate::error::{Result, SpcError};

/// Smallest subgroup size with tabulated factors.
pub const MIN_SUBGROUP_SIZE: usize = 2;

/// Largest subgroup size with tabulated factors.
pub const MAX_SUBGROUP_SIZE: usize = 6;

// Index 0 corresponds to n=2.

/// A2 factors: UCL/LCL = X-double-bar +/- A2 * R-bar.
const A2: [f64; 5] = [1.880, 1.023, 0.729, 0.577, 0.483];

/// D3 factors: LCL_R = D3 * R-bar. Zero for every n <= 6.
const D3: [f64; 5] = [0.0, 0.0, 0.0, 0.0, 0.0];

/// D4 factors: UCL_R = D4 * R-bar.
const D4: [f64; 5] = [3.267, 2.574, 2.282, 2.114, 2.004];

/// d2 for a two-point moving range: sigma-hat = MR-bar / d2.
pub const D2_MOVING_RANGE: f64 = 1.128;

/// D4 for a two-point moving range: UCL_MR = D4 * MR-bar.
pub const D4_MOVING_RANGE: f64 = 3.267;

/// Range-chart factors for one subgroup size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControlConstants {
    /// Subgroup size these factors belong to.
    pub n: usize,
    pub a2: f64,
    pub d3: f64,
    pub d4: f64,
}

impl ControlConstants {
    /// Look up the factors for subgroup size `n`.
    ///
    /// # Errors
    ///
    /// [`SpcError::UnsupportedSubgroupSize`] when `n` is outside 2..=6.
    ///
    /// ```
    /// use u_spc::spc::ControlConstants;
    ///
    /// let c = ControlConstants::for_size(5).unwrap();
    /// assert!((c.a2 - 0.577).abs() < 1e-12);
    /// assert!(ControlConstants::for_size(7).is_err());
    /// ```
    pub fn for_size(n: usize) -> Result<Self> {
        if !(MIN_SUBGROUP_SIZE..=MAX_SUBGROUP_SIZE).contains(&n) {
            return Err(SpcError::UnsupportedSubgroupSize(n));
        }
        let idx = n - MIN_SUBGROUP_SIZE;
        Ok(Self {
            n,
            a2: A2[idx],
            d3: D3[idx],
            d4: D4[idx],
        })
    }
}
