//! Single entry point over all chart families.
//!
//! [`ChartInput`] tags the shaped input of each chart so callers holding a
//! heterogeneous batch (one chart per indicator, say) can dispatch without
//! knowing the concrete calculator types.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::attributes::{AttributeInput, PChart, UChart};
use super::chart::{ChartKind, ChartResult, ControlChart};
use super::variables::{IndividualMRChart, IndividualsInput, SubgroupInput, XBarRChart};
use crate::config::SpcConfig;
use crate::error::Result;

/// Shaped input for one chart computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "chart", rename_all = "snake_case")]
pub enum ChartInput {
    /// Individual-MR chart.
    Individuals(IndividualsInput),
    /// X-bar-R chart.
    SubgroupMeanRange(SubgroupInput),
    /// P chart (defectives vs. inspected totals).
    Proportion(AttributeInput),
    /// U chart (defects vs. units of opportunity).
    Rate(AttributeInput),
}

impl ChartInput {
    /// Chart family this input is destined for.
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartInput::Individuals(_) => ChartKind::IndividualMR,
            ChartInput::SubgroupMeanRange(_) => ChartKind::XBarR,
            ChartInput::Proportion(_) => ChartKind::P,
            ChartInput::Rate(_) => ChartKind::U,
        }
    }
}

/// Compute the chart for `input`.
///
/// The configuration is validated first; an invalid configuration fails
/// before any data is looked at.
///
/// # Examples
///
/// ```
/// use u_spc::config::SpcConfig;
/// use u_spc::spc::{compute, ChartInput, ChartKind, SubgroupInput};
///
/// let input = ChartInput::SubgroupMeanRange(SubgroupInput {
///     values: vec![10.0; 30],
///     subgroup_size: 5,
/// });
/// let result = compute(&input, &SpcConfig::default()).unwrap();
/// assert_eq!(result.chart, ChartKind::XBarR);
/// assert!(result.is_in_control());
/// ```
pub fn compute(input: &ChartInput, config: &SpcConfig) -> Result<ChartResult> {
    config.validate()?;
    let config = config.clone();
    match input {
        ChartInput::Individuals(data) => IndividualMRChart::with_config(config).compute(data),
        ChartInput::SubgroupMeanRange(data) => XBarRChart::with_config(config).compute(data),
        ChartInput::Proportion(data) => PChart::with_config(config).compute(data),
        ChartInput::Rate(data) => UChart::with_config(config).compute(data),
    }
}

/// Compute every input independently.
///
/// One failing input does not affect the others; results keep input order.
pub fn compute_many(inputs: &[ChartInput], config: &SpcConfig) -> Vec<Result<ChartResult>> {
    let results: Vec<Result<ChartResult>> =
        inputs.iter().map(|input| compute(input, config)).collect();
    debug!(
        charts = results.len(),
        failed = results.iter().filter(|r| r.is_err()).count(),
        "computed chart batch"
    );
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpcError;
    use crate::spc::chart::SeriesKind;

    fn individuals(values: &[f64]) -> ChartInput {
        ChartInput::Individuals(IndividualsInput {
            values: values.to_vec(),
        })
    }

    #[test]
    fn test_dispatch_each_kind() {
        let inputs = vec![
            individuals(&[1.0, 2.0, 1.5, 2.5, 1.8]),
            ChartInput::SubgroupMeanRange(SubgroupInput {
                values: vec![1.0, 2.0, 3.0, 2.0, 1.0, 2.0],
                subgroup_size: 3,
            }),
            ChartInput::Proportion(AttributeInput {
                counts: vec![5.0; 5],
                bases: vec![100.0; 5],
            }),
            ChartInput::Rate(AttributeInput {
                counts: vec![1.0, 2.0, 3.0, 2.0, 1.0],
                bases: vec![1.0; 5],
            }),
        ];
        for input in &inputs {
            let result = compute(input, &SpcConfig::default()).expect("valid input");
            assert_eq!(result.chart, input.kind());
        }
    }

    #[test]
    fn test_compute_rejects_invalid_config() {
        let mut config = SpcConfig::default();
        config.rules.trend_run = 1;
        let err = compute(&individuals(&[1.0, 2.0, 3.0, 4.0, 6.0]), &config).unwrap_err();
        assert!(matches!(err, SpcError::InvalidConfig(_)));
    }

    #[test]
    fn test_config_reaches_calculator() {
        let config = SpcConfig {
            min_points: 3,
            ..SpcConfig::default()
        };
        let result = compute(&individuals(&[1.0, 3.0, 2.0]), &config).expect("three points");
        assert_eq!(result.series(SeriesKind::Individual).expect("I").values.len(), 3);
    }

    #[test]
    fn test_compute_many_isolates_failures() {
        let inputs = vec![
            individuals(&[1.0, 2.0, 1.5, 2.5, 1.8]),
            individuals(&[1.0, 2.0]),
            ChartInput::SubgroupMeanRange(SubgroupInput {
                values: vec![1.0; 12],
                subgroup_size: 9,
            }),
        ];
        let results = compute_many(&inputs, &SpcConfig::default());
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(SpcError::InsufficientData { .. })));
        assert!(matches!(
            results[2],
            Err(SpcError::UnsupportedSubgroupSize(9))
        ));
    }

    #[test]
    fn test_input_deserializes_from_tagged_json() {
        let input: ChartInput = serde_json::from_str(
            r#"{ "chart": "subgroup_mean_range", "values": [1.0, 2.0, 3.0], "subgroup_size": 3 }"#,
        )
        .expect("tagged input");
        assert_eq!(input.kind(), ChartKind::XBarR);
    }

    #[test]
    fn test_result_serializes() {
        let result = compute(
            &individuals(&[1.0, 2.0, 1.5, 2.5, 1.8]),
            &SpcConfig::default(),
        )
        .expect("valid input");
        let json = serde_json::to_value(&result).expect("serializable");
        assert_eq!(json["chart"], "individual_mr");
        assert_eq!(json["series"][0]["kind"], "individual");
        assert_eq!(json["series"][0]["limits"]["type"], "constant");
    }
}
