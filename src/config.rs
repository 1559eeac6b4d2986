//! Run-rule thresholds and calculator settings.
//!
//! Defaults reproduce the canonical behavior: a trend is 6 strictly monotonic
//! points, a shift is 8 points strictly on one side of the center line, every
//! overlapping window is reported, and attribute/individual charts need at
//! least 5 valid points.
//!
//! ```
//! use u_spc::config::{SpcConfig, TrendCounting};
//!
//! let cfg = SpcConfig::from_json(r#"{ "rules": { "trend_run": 7 } }"#).unwrap();
//! assert_eq!(cfg.rules.trend_run, 7);
//! assert_eq!(cfg.rules.shift_run, 8);
//! assert_eq!(cfg.rules.trend_counting, TrendCounting::Points);
//! assert_eq!(cfg.min_points, 5);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpcError};

/// How the trend threshold is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendCounting {
    /// `trend_run` counts points: 6 points means 5 rising (or falling) steps.
    #[default]
    Points,
    /// `trend_run` counts steps: 6 steps span 7 points. Matches older reports.
    Steps,
}

/// Which sigma sets the Individual chart limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndividualsSigma {
    /// Sample standard deviation of the observations (n - 1 denominator).
    #[default]
    Sample,
    /// MR-bar / d2, i.e. the textbook E2 * MR-bar limits. Less inflated by
    /// the very outliers the chart is meant to catch.
    MovingRange,
}

/// Thresholds for the run rules (trend and shift).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Length of a monotonic run that counts as a trend.
    pub trend_run: usize,
    /// Number of consecutive points on one side of center that counts as a shift.
    pub shift_run: usize,
    /// Unit in which `trend_run` is expressed.
    pub trend_counting: TrendCounting,
    /// Report every window as a run continues past its threshold, or only the first.
    pub report_overlapping: bool,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            trend_run: 6,
            shift_run: 8,
            trend_counting: TrendCounting::Points,
            report_overlapping: true,
        }
    }
}

impl RuleConfig {
    /// Number of consecutive same-direction steps that completes a trend.
    pub(crate) fn trend_steps(&self) -> usize {
        match self.trend_counting {
            TrendCounting::Points => self.trend_run.saturating_sub(1),
            TrendCounting::Steps => self.trend_run,
        }
        .max(1)
    }
}

/// Top-level calculator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpcConfig {
    /// Run-rule thresholds.
    pub rules: RuleConfig,
    /// Minimum valid points for I-MR, P and U charts.
    pub min_points: usize,
    /// Sigma used for the Individual chart limits.
    pub individuals_sigma: IndividualsSigma,
}

impl Default for SpcConfig {
    fn default() -> Self {
        Self {
            rules: RuleConfig::default(),
            min_points: 5,
            individuals_sigma: IndividualsSigma::Sample,
        }
    }
}

impl SpcConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject thresholds that would make the rules or limits meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.rules.trend_run < 2 {
            return Err(SpcError::InvalidConfig(format!(
                "trend_run must be >= 2, got {}",
                self.rules.trend_run
            )));
        }
        if self.rules.shift_run < 2 {
            return Err(SpcError::InvalidConfig(format!(
                "shift_run must be >= 2, got {}",
                self.rules.shift_run
            )));
        }
        if self.min_points < 2 {
            return Err(SpcError::InvalidConfig(format!(
                "min_points must be >= 2, got {}",
                self.min_points
            )));
        }
        Ok(())
    }
}
