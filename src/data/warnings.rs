use super::records::Scenario;
use serde::Serialize;

/// Domain warnings emitted during calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Warning {
    /// Transaction year has no fiscal policy row, so no tax record was produced.
    MissingPolicy { year: i32, scenario: Scenario },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::MissingPolicy { year, scenario } => write!(
                f,
                "No fiscal policy for {} - {} transaction skipped",
                year, scenario
            ),
        }
    }
}
