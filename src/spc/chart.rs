//! Core control chart types.
//!
//! Defines the building blocks shared by every chart family: control limits
//! (constant or per point), the tracked series a chart produces, violation
//! records emitted by the run rules, and the [`ChartResult`] aggregate handed
//! to presentation code.
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.
//! - ASTM E2587 — Standard Practice for Use of Control Charts

use std::fmt;

use serde::Serialize;

use crate::error::Result;

/// Control limits for a chart.
///
/// Represents the upper control limit (UCL), center line (CL), and lower
/// control limit (LCL) computed from the process data.
///
/// # Invariants
///
/// - `lcl <= cl <= ucl`
/// - `lcl >= 0` for range, moving-range, proportion and rate series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControlLimits {
    /// Upper control limit.
    pub ucl: f64,
    /// Center line.
    pub cl: f64,
    /// Lower control limit.
    pub lcl: f64,
}

impl ControlLimits {
    /// Whether `value` falls strictly outside the limits.
    ///
    /// A point sitting exactly on a limit is in control.
    pub fn excludes(&self, value: f64) -> bool {
        value > self.ucl || value < self.lcl
    }
}

/// Limits attached to a tracked series.
///
/// Variables charts have one set of limits for the whole series; attributes
/// charts with varying sample sizes carry one set per point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "limits", rename_all = "snake_case")]
pub enum Limits {
    Constant(ControlLimits),
    PerPoint(Vec<ControlLimits>),
}

impl Limits {
    /// Limits that apply at point `index`.
    ///
    /// Returns `None` when per-point limits do not cover `index`.
    pub fn at(&self, index: usize) -> Option<ControlLimits> {
        match self {
            Limits::Constant(limits) => Some(*limits),
            Limits::PerPoint(limits) => limits.get(index).copied(),
        }
    }
}

/// The chart families supported by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Individuals and moving range.
    #[serde(rename = "individual_mr")]
    IndividualMR,
    /// Subgroup mean and range.
    #[serde(rename = "xbar_r")]
    XBarR,
    /// Proportion defective.
    P,
    /// Defects per unit of opportunity.
    U,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::IndividualMR => "I-MR",
            ChartKind::XBarR => "X-bar-R",
            ChartKind::P => "P",
            ChartKind::U => "U",
        };
        f.write_str(name)
    }
}

/// Which statistic a tracked series holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    Individual,
    MovingRange,
    SubgroupMean,
    SubgroupRange,
    Proportion,
    Rate,
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SeriesKind::Individual => "individual",
            SeriesKind::MovingRange => "moving range",
            SeriesKind::SubgroupMean => "subgroup mean",
            SeriesKind::SubgroupRange => "subgroup range",
            SeriesKind::Proportion => "proportion",
            SeriesKind::Rate => "rate",
        };
        f.write_str(name)
    }
}

/// A series plotted on a chart together with its limits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackedSeries {
    pub kind: SeriesKind,
    pub values: Vec<f64>,
    pub limits: Limits,
    /// Center line of the series.
    pub center: f64,
}

/// Run rules evaluated on every chart.
///
/// Numbering follows the order the rules are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    /// Rule 1: a single point beyond the control limits.
    BeyondLimits,
    /// Rule 2: a run of strictly increasing or strictly decreasing points.
    Trend,
    /// Rule 3: a run of points strictly on one side of the center line.
    Shift,
}

impl RuleId {
    /// Numeric rule identifier (1, 2 or 3).
    pub fn number(self) -> u8 {
        match self {
            RuleId::BeyondLimits => 1,
            RuleId::Trend => 2,
            RuleId::Shift => 3,
        }
    }
}

/// Where a violation occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Span {
    /// A single point (Rule 1).
    Point(usize),
    /// An inclusive window of points (Rules 2 and 3).
    Window { start: usize, end: usize },
}

impl Span {
    /// Number of points covered.
    pub fn len(&self) -> usize {
        match *self {
            Span::Point(_) => 1,
            Span::Window { start, end } => end - start + 1,
        }
    }

    /// Always `false`; a span covers at least one point.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `index` lies within the span.
    pub fn contains(&self, index: usize) -> bool {
        match *self {
            Span::Point(i) => i == index,
            Span::Window { start, end } => (start..=end).contains(&index),
        }
    }
}

/// A violation detected on a tracked series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub rule: RuleId,
    pub series: SeriesKind,
    pub span: Span,
    /// Human-readable summary, e.g. "6 points steadily increasing".
    pub description: String,
}

/// Violation counts per rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RuleCounts {
    pub beyond_limits: usize,
    pub trend: usize,
    pub shift: usize,
}

impl RuleCounts {
    /// Tally a list of violations.
    pub fn tally<'a>(violations: impl IntoIterator<Item = &'a Violation>) -> Self {
        let mut counts = Self::default();
        for v in violations {
            match v.rule {
                RuleId::BeyondLimits => counts.beyond_limits += 1,
                RuleId::Trend => counts.trend += 1,
                RuleId::Shift => counts.shift += 1,
            }
        }
        counts
    }

    /// Count for one rule.
    pub fn get(&self, rule: RuleId) -> usize {
        match rule {
            RuleId::BeyondLimits => self.beyond_limits,
            RuleId::Trend => self.trend,
            RuleId::Shift => self.shift,
        }
    }

    pub fn total(&self) -> usize {
        self.beyond_limits + self.trend + self.shift
    }
}

/// The outcome of one chart computation.
///
/// Built once per call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartResult {
    pub chart: ChartKind,
    /// Tracked series in display order (primary series first).
    pub series: Vec<TrackedSeries>,
    /// Sample standard deviation of the individual values (I-MR only).
    pub sigma: Option<f64>,
    /// Process sigma estimated as MR-bar / d2 (I-MR only).
    pub sigma_estimate: Option<f64>,
    /// Subgroup size (X-bar-R only).
    pub subgroup_size: Option<usize>,
    /// All violations, grouped by series and then by rule.
    pub violations: Vec<Violation>,
    /// Violation counts per rule across all series.
    pub counts: RuleCounts,
}

impl ChartResult {
    pub(crate) fn new(
        chart: ChartKind,
        series: Vec<TrackedSeries>,
        violations: Vec<Violation>,
    ) -> Self {
        let counts = RuleCounts::tally(&violations);
        Self {
            chart,
            series,
            sigma: None,
            sigma_estimate: None,
            subgroup_size: None,
            violations,
            counts,
        }
    }

    /// The tracked series of the given kind.
    pub fn series(&self, kind: SeriesKind) -> Option<&TrackedSeries> {
        self.series.iter().find(|s| s.kind == kind)
    }

    /// The primary series (individuals, subgroup means, proportions or rates).
    pub fn primary(&self) -> Option<&TrackedSeries> {
        self.series.first()
    }

    /// Center line of the given series.
    pub fn center(&self, kind: SeriesKind) -> Option<f64> {
        self.series(kind).map(|s| s.center)
    }

    /// Violations recorded against one series.
    pub fn violations_for(&self, kind: SeriesKind) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.series == kind)
    }

    /// Violation counts restricted to one series.
    pub fn counts_for(&self, kind: SeriesKind) -> RuleCounts {
        RuleCounts::tally(self.violations_for(kind))
    }

    pub fn total_violations(&self) -> usize {
        self.counts.total()
    }

    /// `true` when no rule fired on any series.
    pub fn is_in_control(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Trait implemented by every chart calculator.
///
/// A calculator validates its input, computes center line and limits for each
/// tracked series, runs the rule engine and packages everything into a
/// [`ChartResult`]. Calculators hold configuration only, never data, so the
/// same instance can be reused across calls and threads.
pub trait ControlChart {
    /// Shaped input the chart consumes.
    type Input;

    /// Chart family this calculator produces.
    fn kind(&self) -> ChartKind;

    /// Compute the chart, failing fast on invalid input.
    fn compute(&self, input: &Self::Input) -> Result<ChartResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> ControlLimits {
        ControlLimits {
            ucl: 30.0,
            cl: 25.0,
            lcl: 20.0,
        }
    }

    #[test]
    fn test_excludes_is_strict() {
        let l = limits();
        assert!(l.excludes(30.1));
        assert!(l.excludes(19.9));
        assert!(!l.excludes(30.0));
        assert!(!l.excludes(20.0));
    }

    #[test]
    fn test_limits_at() {
        let constant = Limits::Constant(limits());
        assert_eq!(constant.at(100), Some(limits()));

        let per_point = Limits::PerPoint(vec![limits()]);
        assert_eq!(per_point.at(0), Some(limits()));
        assert_eq!(per_point.at(1), None);
    }

    #[test]
    fn test_span_len_and_contains() {
        let w = Span::Window { start: 2, end: 7 };
        assert_eq!(w.len(), 6);
        assert!(w.contains(2));
        assert!(w.contains(7));
        assert!(!w.contains(8));
        assert_eq!(Span::Point(3).len(), 1);
    }

    #[test]
    fn test_rule_numbers() {
        assert_eq!(RuleId::BeyondLimits.number(), 1);
        assert_eq!(RuleId::Trend.number(), 2);
        assert_eq!(RuleId::Shift.number(), 3);
    }

    #[test]
    fn test_counts_tally() {
        let v = |rule, series| Violation {
            rule,
            series,
            span: Span::Point(0),
            description: String::new(),
        };
        let violations = vec![
            v(RuleId::BeyondLimits, SeriesKind::SubgroupMean),
            v(RuleId::BeyondLimits, SeriesKind::SubgroupRange),
            v(RuleId::Shift, SeriesKind::SubgroupMean),
        ];
        let result = ChartResult::new(ChartKind::XBarR, Vec::new(), violations);
        assert_eq!(result.counts.beyond_limits, 2);
        assert_eq!(result.counts.get(RuleId::Shift), 1);
        assert_eq!(result.total_violations(), 3);
        assert_eq!(result.counts_for(SeriesKind::SubgroupRange).total(), 1);
        assert!(!result.is_in_control());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(ChartKind::XBarR.to_string(), "X-bar-R");
        assert_eq!(SeriesKind::MovingRange.to_string(), "moving range");
    }
}
