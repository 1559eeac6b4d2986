//! Statistical Process Control (SPC) charts.
//!
//! Computes center lines and control limits for four chart families and
//! scans each chart's series for out-of-control signals.
//!
//! # Variables Charts
//!
//! - [`IndividualMRChart`] — Individual and Moving Range chart for single observations
//! - [`XBarRChart`] — X-bar and Range chart for subgroup data (n=2..6)
//!
//! # Attributes Charts
//!
//! - [`PChart`] — Proportion nonconforming (variable sample size)
//! - [`UChart`] — Defects per unit (variable area of opportunity)
//!
//! # Run Rules
//!
//! - [`RuleEngine`] — beyond limits, trend and shift rules
//!
//! # Dispatch
//!
//! - [`compute`] / [`compute_many`] — run any chart from a tagged [`ChartInput`]
//!
//! All calculators are pure: no shared state, no I/O. Independent charts can
//! be computed on separate threads without coordination.
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.
//! - ASTM E2587 — Standard Practice for Use of Control Charts
//! - Western Electric (1956). *Statistical Quality Control Handbook*.

mod attributes;
mod calculator;
mod chart;
mod constants;
mod rules;
mod subgroup;
mod variables;

pub use attributes::{AttributeInput, PChart, UChart};
pub use calculator::{compute, compute_many, ChartInput};
pub use chart::{
    ChartKind, ChartResult, ControlChart, ControlLimits, Limits, RuleCounts, RuleId, SeriesKind,
    Span, TrackedSeries, Violation,
};
pub use constants::{
    ControlConstants, D2_MOVING_RANGE, D4_MOVING_RANGE, MAX_SUBGROUP_SIZE, MIN_SUBGROUP_SIZE,
};
pub use rules::RuleEngine;
pub use subgroup::{clean_pairs, clean_series, subgroup};
pub use variables::{IndividualMRChart, IndividualsInput, SubgroupInput, XBarRChart};
