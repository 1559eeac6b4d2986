//! Variables control charts: Individual-MR and X-bar-R.
//!
//! These charts monitor continuous (variables) data from a process.
//! The X-bar-R chart tracks the mean and range of fixed-size subgroups; the
//! Individual-MR chart handles single observations.
//!
//! # Control Chart Factors
//!
//! Factors (A2, D3, D4, d2) come from [`ControlConstants`], sourced from
//! ASTM E2587.
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.
//! - ASTM E2587 — Standard Practice for Use of Control Charts
//! - Shewhart, W.A. (1931). *Economic Control of Quality of Manufactured Product*.

use serde::{Deserialize, Serialize};
use tracing::debug;
use u_numflow::stats;

use super::chart::{
    ChartKind, ChartResult, ControlChart, ControlLimits, Limits, SeriesKind, TrackedSeries,
};
use super::constants::{ControlConstants, D2_MOVING_RANGE, D4_MOVING_RANGE};
use super::rules::RuleEngine;
use super::subgroup::{clean_series, subgroup};
use crate::config::{IndividualsSigma, SpcConfig};
use crate::error::{Result, SpcError};

/// Input for the Individual-MR chart: one time-ordered series.
///
/// Non-finite values are treated as missing and removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualsInput {
    pub values: Vec<f64>,
}

/// Input for the X-bar-R chart: a flat series and the subgroup size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubgroupInput {
    pub values: Vec<f64>,
    pub subgroup_size: usize,
}

// ---------------------------------------------------------------------------
// Individual-MR Chart
// ---------------------------------------------------------------------------

/// Individual and Moving Range (I-MR) control chart.
///
/// # Algorithm
///
/// 1. CL = mean of the observations, sigma = sample standard deviation (n-1).
/// 2. Moving ranges MR_i = |x_i - x_(i-1)|, MR-bar = mean(MR).
/// 3. Process sigma estimate = MR-bar / d2 (d2 = 1.128), reported alongside
///    the empirical sigma.
/// 4. I chart limits: CL +/- 3 * sigma, or CL +/- 3 * MR-bar / d2 when
///    configured with [`IndividualsSigma::MovingRange`].
/// 5. MR chart limits: UCL = 3.267 * MR-bar, CL = MR-bar, LCL = 0.
///
/// Run rules are applied to the individual values only.
///
/// # Examples
///
/// ```
/// use u_spc::spc::{ControlChart, IndividualMRChart, IndividualsInput, SeriesKind};
///
/// let input = IndividualsInput { values: vec![10.0, 12.0, 11.0, 13.0, 12.0, 14.0, 11.5] };
/// let result = IndividualMRChart::new().compute(&input).unwrap();
/// assert!(result.is_in_control());
/// assert!(result.sigma.unwrap() > 0.0);
/// assert!(result.series(SeriesKind::MovingRange).is_some());
/// ```
///
/// # Reference
///
/// Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.,
/// Chapter 6: Control Charts for Variables.
#[derive(Debug, Clone, Default)]
pub struct IndividualMRChart {
    config: SpcConfig,
}

impl IndividualMRChart {
    /// Create an I-MR chart with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SpcConfig) -> Self {
        Self { config }
    }
}

impl ControlChart for IndividualMRChart {
    type Input = IndividualsInput;

    fn kind(&self) -> ChartKind {
        ChartKind::IndividualMR
    }

    fn compute(&self, input: &IndividualsInput) -> Result<ChartResult> {
        self.config.validate()?;
        let chart = self.kind();
        let observations = clean_series(&input.values);
        let required = self.config.min_points;
        if observations.len() < required {
            return Err(SpcError::InsufficientData {
                chart,
                required,
                actual: observations.len(),
            });
        }

        let insufficient = || SpcError::InsufficientData {
            chart,
            required,
            actual: observations.len(),
        };
        let x_bar = stats::mean(&observations).ok_or_else(insufficient)?;
        let sigma = stats::std_dev(&observations).ok_or_else(insufficient)?;
        if sigma <= 0.0 {
            return Err(SpcError::DegenerateDistribution {
                chart,
                reason: format!("all observations equal {x_bar}; standard deviation is zero"),
            });
        }

        let mr_values: Vec<f64> = observations
            .windows(2)
            .map(|w| (w[1] - w[0]).abs())
            .collect();
        let mr_bar = stats::mean(&mr_values).unwrap_or(0.0);
        let sigma_estimate = mr_bar / D2_MOVING_RANGE;

        let limit_sigma = match self.config.individuals_sigma {
            IndividualsSigma::Sample => sigma,
            IndividualsSigma::MovingRange => sigma_estimate,
        };
        let i_limits = ControlLimits {
            ucl: x_bar + 3.0 * limit_sigma,
            cl: x_bar,
            lcl: x_bar - 3.0 * limit_sigma,
        };
        // LCL is always 0 for a two-point moving range.
        let mr_limits = ControlLimits {
            ucl: D4_MOVING_RANGE * mr_bar,
            cl: mr_bar,
            lcl: 0.0,
        };

        let i_limits = Limits::Constant(i_limits);
        let violations = RuleEngine::new(self.config.rules.clone()).evaluate(
            SeriesKind::Individual,
            &observations,
            x_bar,
            &i_limits,
        );

        debug!(
            %chart,
            points = observations.len(),
            center = x_bar,
            sigma,
            sigma_estimate,
            violations = violations.len(),
            "computed control chart"
        );

        let series = vec![
            TrackedSeries {
                kind: SeriesKind::Individual,
                values: observations,
                limits: i_limits,
                center: x_bar,
            },
            TrackedSeries {
                kind: SeriesKind::MovingRange,
                values: mr_values,
                limits: Limits::Constant(mr_limits),
                center: mr_bar,
            },
        ];

        let mut result = ChartResult::new(chart, series, violations);
        result.sigma = Some(sigma);
        result.sigma_estimate = Some(sigma_estimate);
        Ok(result)
    }
}

// ---------------------------------------------------------------------------
// X-bar-R Chart
// ---------------------------------------------------------------------------

/// X-bar and Range (X-bar-R) control chart.
///
/// Monitors the process mean (X-bar chart) and process variability (R chart)
/// using subgroup ranges. Suitable for subgroup sizes n = 2..=6.
///
/// # Algorithm
///
/// 1. Split the series into contiguous subgroups of size n, discarding any
///    incomplete trailing subgroup.
/// 2. For each subgroup, compute the mean (X-bar) and range (R).
/// 3. Compute the grand mean (X-double-bar) and average range (R-bar).
/// 4. X-bar chart limits: CL = X-double-bar, UCL/LCL = CL +/- A2 * R-bar.
/// 5. R chart limits: CL = R-bar, UCL = D4 * R-bar, LCL = D3 * R-bar.
///
/// Run rules are applied to each chart independently.
///
/// # Examples
///
/// ```
/// use u_spc::spc::{ControlChart, SeriesKind, SubgroupInput, XBarRChart};
///
/// let input = SubgroupInput {
///     values: vec![25.0, 26.0, 24.5, 25.5, 25.0, 25.2, 24.8, 25.1, 24.9, 25.3],
///     subgroup_size: 5,
/// };
/// let result = XBarRChart::new().compute(&input).unwrap();
/// let means = result.series(SeriesKind::SubgroupMean).unwrap();
/// assert_eq!(means.values.len(), 2);
/// ```
///
/// # Reference
///
/// Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.,
/// Chapter 6: Control Charts for Variables.
#[derive(Debug, Clone, Default)]
pub struct XBarRChart {
    config: SpcConfig,
}

impl XBarRChart {
    /// Create an X-bar-R chart with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SpcConfig) -> Self {
        Self { config }
    }
}

impl ControlChart for XBarRChart {
    type Input = SubgroupInput;

    fn kind(&self) -> ChartKind {
        ChartKind::XBarR
    }

    fn compute(&self, input: &SubgroupInput) -> Result<ChartResult> {
        self.config.validate()?;
        let chart = self.kind();
        let n = input.subgroup_size;
        let factors = ControlConstants::for_size(n)?;
        let observations = clean_series(&input.values);
        let subgroups = subgroup(&observations, n)?;

        let insufficient = || SpcError::InsufficientData {
            chart,
            required: n,
            actual: observations.len(),
        };

        let mut xbar_values = Vec::with_capacity(subgroups.len());
        let mut r_values = Vec::with_capacity(subgroups.len());
        for group in &subgroups {
            xbar_values.push(level_mean(group).ok_or_else(insufficient)?);
            r_values.push(subgroup_range(group).ok_or_else(insufficient)?);
        }

        let grand_mean = level_mean(&xbar_values).ok_or_else(insufficient)?;
        let r_bar = level_mean(&r_values).ok_or_else(insufficient)?;

        let xbar_limits = Limits::Constant(ControlLimits {
            ucl: grand_mean + factors.a2 * r_bar,
            cl: grand_mean,
            lcl: grand_mean - factors.a2 * r_bar,
        });
        let r_limits = Limits::Constant(ControlLimits {
            ucl: factors.d4 * r_bar,
            cl: r_bar,
            lcl: (factors.d3 * r_bar).max(0.0),
        });

        let engine = RuleEngine::new(self.config.rules.clone());
        let mut violations =
            engine.evaluate(SeriesKind::SubgroupMean, &xbar_values, grand_mean, &xbar_limits);
        violations.extend(engine.evaluate(SeriesKind::SubgroupRange, &r_values, r_bar, &r_limits));

        debug!(
            %chart,
            subgroups = subgroups.len(),
            subgroup_size = n,
            center = grand_mean,
            r_bar,
            violations = violations.len(),
            "computed control chart"
        );

        let series = vec![
            TrackedSeries {
                kind: SeriesKind::SubgroupMean,
                values: xbar_values,
                limits: xbar_limits,
                center: grand_mean,
            },
            TrackedSeries {
                kind: SeriesKind::SubgroupRange,
                values: r_values,
                limits: r_limits,
                center: r_bar,
            },
        ];

        let mut result = ChartResult::new(chart, series, violations);
        result.subgroup_size = Some(n);
        Ok(result)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Range (max - min) of a subgroup, or `None` for empty/non-finite input.
fn subgroup_range(group: &[f64]) -> Option<f64> {
    Some(stats::max(group)? - stats::min(group)?)
}

/// Mean that returns the common value exactly when all values are equal.
///
/// A summed mean of identical decimals can land one ulp away from them, which
/// would put a flat series outside limits that collapse onto the center.
fn level_mean(values: &[f64]) -> Option<f64> {
    if subgroup_range(values)? == 0.0 {
        return values.first().copied();
    }
    stats::mean(values)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
