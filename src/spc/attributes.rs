//! Attributes control charts: P and U charts.
//!
//! These charts monitor discrete (count/proportion) data from a process.
//! Unlike variables charts, attributes charts use the binomial or Poisson
//! distribution to compute control limits, and the limits vary per sample
//! when sample sizes differ.
//!
//! # Chart Selection Guide
//!
//! | Chart | Data Type | Sample Size |
//! |-------|-----------|-------------|
//! | P     | Proportion defective | Variable |
//! | U     | Defects per unit | Variable area |
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.,
//!   Chapter 7: Control Charts for Attributes.
//! - ASTM E2587 — Standard Practice for Use of Control Charts

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::chart::{
    ChartKind, ChartResult, ControlChart, ControlLimits, Limits, SeriesKind, TrackedSeries,
};
use super::rules::RuleEngine;
use super::subgroup::clean_pairs;
use crate::config::SpcConfig;
use crate::error::{Result, SpcError};

/// Input for P and U charts: paired counts and bases of equal length.
///
/// For a P chart `bases` are the inspected totals; for a U chart they are the
/// units of opportunity. Pairs with a missing value or a non-positive base
/// are removed before computing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeInput {
    pub counts: Vec<f64>,
    pub bases: Vec<f64>,
}

/// Per-sample standard error for a given center and base size.
type StandardError = fn(center: f64, base: f64) -> f64;

/// Shared computation for charts whose limits are `center +/- 3 * se(n_i)`.
struct AttributeModel {
    chart: ChartKind,
    series: SeriesKind,
    standard_error: StandardError,
}

impl AttributeModel {
    fn compute(&self, input: &AttributeInput, config: &SpcConfig) -> Result<ChartResult> {
        config.validate()?;
        let chart = self.chart;
        let (counts, bases) = clean_pairs(&input.counts, &input.bases)?;
        let required = config.min_points;
        if counts.len() < required {
            return Err(SpcError::InsufficientData {
                chart,
                required,
                actual: counts.len(),
            });
        }

        let values: Vec<f64> = counts.iter().zip(&bases).map(|(&d, &n)| d / n).collect();
        // Equal ratios reproduce their common value exactly.
        let center = if values.iter().all(|&v| v == values[0]) {
            values[0]
        } else {
            counts.iter().sum::<f64>() / bases.iter().sum::<f64>()
        };
        self.validate_center(center)?;

        let limits: Vec<ControlLimits> = bases
            .iter()
            .map(|&n| {
                let se = (self.standard_error)(center, n);
                ControlLimits {
                    ucl: center + 3.0 * se,
                    cl: center,
                    lcl: (center - 3.0 * se).max(0.0),
                }
            })
            .collect();
        let limits = Limits::PerPoint(limits);

        let violations =
            RuleEngine::new(config.rules.clone()).evaluate(self.series, &values, center, &limits);

        debug!(
            %chart,
            points = values.len(),
            center,
            violations = violations.len(),
            "computed control chart"
        );

        let series = vec![TrackedSeries {
            kind: self.series,
            values,
            limits,
            center,
        }];
        Ok(ChartResult::new(chart, series, violations))
    }

    fn validate_center(&self, center: f64) -> Result<()> {
        let reason = match self.chart {
            ChartKind::P if center <= 0.0 || center >= 1.0 => Some(format!(
                "mean proportion {center} must lie strictly between 0 and 1"
            )),
            _ if !center.is_finite() || center < 0.0 => {
                Some(format!("mean rate {center} must be finite and non-negative"))
            }
            _ => None,
        };
        match reason {
            Some(reason) => Err(SpcError::DegenerateDistribution {
                chart: self.chart,
                reason,
            }),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// P Chart
// ---------------------------------------------------------------------------

/// Proportion nonconforming (P) chart.
///
/// Monitors the fraction of defective items in samples that may have
/// different sizes. Control limits vary per sample when sample sizes differ.
///
/// # Formulas
///
/// - CL = p-bar = total_defectives / total_inspected
/// - UCL_i = p-bar + 3 * sqrt(p-bar * (1 - p-bar) / n_i)
/// - LCL_i = max(0, p-bar - 3 * sqrt(p-bar * (1 - p-bar) / n_i))
///
/// A p-bar of exactly 0 or 1 makes the normal approximation meaningless and
/// is rejected as a degenerate distribution.
///
/// # Examples
///
/// ```
/// use u_spc::spc::{AttributeInput, ControlChart, PChart};
///
/// let input = AttributeInput {
///     counts: vec![5.0, 5.0, 5.0, 5.0, 5.0],
///     bases: vec![100.0, 100.0, 100.0, 100.0, 100.0],
/// };
/// let result = PChart::new().compute(&input).unwrap();
/// assert!((result.primary().unwrap().center - 0.05).abs() < 1e-12);
/// assert_eq!(result.total_violations(), 0);
/// ```
///
/// # Reference
///
/// Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.,
/// Chapter 7, Section 7.3.
#[derive(Debug, Clone, Default)]
pub struct PChart {
    config: SpcConfig,
}

impl PChart {
    /// Create a P chart with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SpcConfig) -> Self {
        Self { config }
    }
}

impl ControlChart for PChart {
    type Input = AttributeInput;

    fn kind(&self) -> ChartKind {
        ChartKind::P
    }

    fn compute(&self, input: &AttributeInput) -> Result<ChartResult> {
        AttributeModel {
            chart: ChartKind::P,
            series: SeriesKind::Proportion,
            standard_error: |p_bar, n| (p_bar * (1.0 - p_bar) / n).sqrt(),
        }
        .compute(input, &self.config)
    }
}

// ---------------------------------------------------------------------------
// U Chart
// ---------------------------------------------------------------------------

/// Defects per unit (U) chart.
///
/// Monitors the defect rate when the area of opportunity (number of
/// inspection units) varies between samples. Based on the Poisson distribution.
///
/// # Formulas
///
/// - CL = u-bar = total_defects / total_units
/// - UCL_i = u-bar + 3 * sqrt(u-bar / n_i)
/// - LCL_i = max(0, u-bar - 3 * sqrt(u-bar / n_i))
///
/// # Reference
///
/// Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.,
/// Chapter 7, Section 7.4.
#[derive(Debug, Clone, Default)]
pub struct UChart {
    config: SpcConfig,
}

impl UChart {
    /// Create a U chart with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SpcConfig) -> Self {
        Self { config }
    }
}

impl ControlChart for UChart {
    type Input = AttributeInput;

    fn kind(&self) -> ChartKind {
        ChartKind::U
    }

    fn compute(&self, input: &AttributeInput) -> Result<ChartResult> {
        AttributeModel {
            chart: ChartKind::U,
            series: SeriesKind::Rate,
            standard_error: |u_bar, n| (u_bar / n).sqrt(),
        }
        .compute(input, &self.config)
    }
}
