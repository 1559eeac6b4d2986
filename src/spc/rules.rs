//! Run rules for detecting non-random patterns in control charts.
//!
//! Three Western Electric style rules are evaluated on a tracked series:
//!
//! 1. Any point beyond its control limits (point-indexed).
//! 2. A trend: a run of strictly increasing or strictly decreasing points.
//! 3. A shift: a run of points strictly on one side of the center line.
//!
//! Rules 2 and 3 report inclusive windows. While a run keeps going past its
//! threshold every new window is reported, so a 7-point rise with a 6-point
//! threshold produces two overlapping windows. A flat step ends a trend and a
//! point exactly on the center line ends a shift.
//!
//! # References
//!
//! - Western Electric (1956). *Statistical Quality Control Handbook*.
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.

use std::cmp::Ordering;

use super::chart::{Limits, RuleId, SeriesKind, Span, Violation};
use crate::config::RuleConfig;

/// Stateless evaluator for the three run rules.
///
/// # Examples
///
/// ```
/// use u_spc::config::RuleConfig;
/// use u_spc::spc::{ControlLimits, Limits, RuleEngine, RuleId, SeriesKind};
///
/// let engine = RuleEngine::new(RuleConfig::default());
/// let limits = Limits::Constant(ControlLimits { ucl: 30.0, cl: 25.0, lcl: 20.0 });
/// let values = [25.0, 31.0, 24.0];
/// let violations = engine.evaluate(SeriesKind::Individual, &values, 25.0, &limits);
/// assert_eq!(violations.len(), 1);
/// assert_eq!(violations[0].rule, RuleId::BeyondLimits);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    config: RuleConfig,
}

impl RuleEngine {
    pub fn new(config: RuleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// Evaluate all rules on `values`.
    ///
    /// The result lists every Rule 1 hit in series order, then Rule 2 windows,
    /// then Rule 3 windows.
    pub fn evaluate(
        &self,
        series: SeriesKind,
        values: &[f64],
        center: f64,
        limits: &Limits,
    ) -> Vec<Violation> {
        let mut violations = beyond_limits(series, values, limits);
        violations.extend(self.trends(series, values));
        violations.extend(self.shifts(series, values, center));
        violations
    }

    /// Rule 2: strictly monotonic runs.
    fn trends(&self, series: SeriesKind, values: &[f64]) -> Vec<Violation> {
        let needed = self.config.trend_steps();
        let mut violations = Vec::new();
        if values.len() < needed + 1 {
            return violations;
        }

        // Consecutive steps sharing the current direction. A flat step resets to 0.
        let mut steps = 0_usize;
        let mut direction = Ordering::Equal;
        let mut reported = false;

        for i in 1..values.len() {
            let step = values[i].partial_cmp(&values[i - 1]).unwrap_or(Ordering::Equal);
            if step == Ordering::Equal {
                steps = 0;
                direction = Ordering::Equal;
                reported = false;
                continue;
            }
            if step == direction {
                steps += 1;
            } else {
                steps = 1;
                direction = step;
                reported = false;
            }

            if steps >= needed && (self.config.report_overlapping || !reported) {
                reported = true;
                let label = if direction == Ordering::Greater {
                    "increasing"
                } else {
                    "decreasing"
                };
                violations.push(Violation {
                    rule: RuleId::Trend,
                    series,
                    span: Span::Window {
                        start: i - needed,
                        end: i,
                    },
                    description: format!("{} points steadily {label}", needed + 1),
                });
            }
        }
        violations
    }

    /// Rule 3: runs strictly on one side of `center`.
    fn shifts(&self, series: SeriesKind, values: &[f64], center: f64) -> Vec<Violation> {
        let needed = self.config.shift_run.max(1);
        let mut violations = Vec::new();
        if values.len() < needed {
            return violations;
        }

        // Points in the current one-sided run. A point on the center line resets to 0.
        let mut run = 0_usize;
        let mut side = Ordering::Equal;
        let mut reported = false;

        for (i, &value) in values.iter().enumerate() {
            let current = value.partial_cmp(&center).unwrap_or(Ordering::Equal);
            if current == Ordering::Equal {
                run = 0;
                side = Ordering::Equal;
                reported = false;
                continue;
            }
            if current == side {
                run += 1;
            } else {
                run = 1;
                side = current;
                reported = false;
            }

            if run >= needed && (self.config.report_overlapping || !reported) {
                reported = true;
                let label = if side == Ordering::Greater {
                    "above"
                } else {
                    "below"
                };
                violations.push(Violation {
                    rule: RuleId::Shift,
                    series,
                    span: Span::Window {
                        start: i + 1 - needed,
                        end: i,
                    },
                    description: format!("{needed} consecutive points {label} center line"),
                });
            }
        }
        violations
    }
}

/// Rule 1: every point outside its own limits.
///
/// Points without per-point limits (shorter limit vector) are skipped.
fn beyond_limits(series: SeriesKind, values: &[f64], limits: &Limits) -> Vec<Violation> {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, &value)| {
            let l = limits.at(i)?;
            if !l.excludes(value) {
                return None;
            }
            let (side, bound) = if value > l.ucl {
                ("above UCL", l.ucl)
            } else {
                ("below LCL", l.lcl)
            };
            Some(Violation {
                rule: RuleId::BeyondLimits,
                series,
                span: Span::Point(i),
                description: format!("point {value:.4} {side} {bound:.4}"),
            })
        })
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::spc::chart::ControlLimits;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn windows_have_threshold_length(
            values in proptest::collection::vec(-10.0_f64..10.0, 0..=80)
        ) {
            let engine = RuleEngine::default();
            let limits = Limits::Constant(ControlLimits { ucl: 5.0, cl: 0.0, lcl: -5.0 });
            for v in engine.evaluate(SeriesKind::Individual, &values, 0.0, &limits) {
                match (v.rule, v.span) {
                    (RuleId::BeyondLimits, Span::Point(i)) => {
                        prop_assert!(values[i].abs() > 5.0);
                    }
                    (RuleId::Trend, Span::Window { start, end }) => {
                        prop_assert_eq!(end - start + 1, 6);
                        for w in values[start..=end].windows(2) {
                            prop_assert!(w[1] != w[0]);
                        }
                    }
                    (RuleId::Shift, Span::Window { start, end }) => {
                        prop_assert_eq!(end - start + 1, 8);
                        let above = values[start] > 0.0;
                        let window = &values[start..=end];
                        prop_assert!(window.iter().all(|&x| (x > 0.0) == above && x != 0.0));
                    }
                    other => prop_assert!(false, "unexpected span {:?}", other),
                }
            }
        }

        #[test]
        fn evaluate_is_deterministic(
            values in proptest::collection::vec(-10.0_f64..10.0, 0..=50)
        ) {
            let engine = RuleEngine::default();
            let limits = Limits::Constant(ControlLimits { ucl: 5.0, cl: 0.0, lcl: -5.0 });
            let a = engine.evaluate(SeriesKind::Individual, &values, 0.0, &limits);
            let b = engine.evaluate(SeriesKind::Individual, &values, 0.0, &limits);
            prop_assert_eq!(a, b);
        }
    }
}
