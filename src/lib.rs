//! # u-spc
//!
//! Statistical process control (SPC) charts and out-of-control signal
//! detection for time-ordered process data.
//!
//! This crate is domain-agnostic: it operates on raw `f64` series and
//! returns numeric results (center lines, limits, sigma estimates and
//! violation records) for presentation code to render or narrate.
//!
//! ## Modules
//!
//! - [`spc`] — Control charts (I-MR, X̄-R, P, U) with run rules
//! - [`config`] — Run-rule thresholds and calculator settings
//! - [`error`] — Error type returned by every calculator
//!
//! ## Design Philosophy
//!
//! - **Fail fast**: inputs are validated before computing; no partial results
//! - **Numerical stability**: Leverages `u-numflow` for stable statistics
//! - **Research-backed**: Formulas and factors follow Montgomery and ASTM E2587

pub mod config;
pub mod error;
pub mod spc;

pub use config::SpcConfig;
pub use error::{Result, SpcError};
