//! Error type shared by every chart calculator.
//!
//! All calculators validate their input before computing anything, so an
//! `Err` always means no partial result was produced.

use thiserror::Error;

use crate::spc::ChartKind;

/// Errors that can occur while computing a control chart.
#[derive(Debug, Error)]
pub enum SpcError {
    #[error("{chart} chart needs at least {required} valid points, got {actual}")]
    InsufficientData {
        chart: ChartKind,
        required: usize,
        actual: usize,
    },

    #[error("subgroup size must be 2..=6, got {0}")]
    UnsupportedSubgroupSize(usize),

    #[error("{chart} chart has a degenerate distribution: {reason}")]
    DegenerateDistribution { chart: ChartKind, reason: String },

    #[error("paired series differ in length: {left} vs {right}")]
    MismatchedLength { left: usize, right: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SpcError>;
