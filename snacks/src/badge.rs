use serde::Serialize;

use crate::types::MetricMode;

pub const DEFAULT_EXPERT_THRESHOLD: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub is_expert: bool,
    pub reason: String,
}

/// Snack expert badge. Awarded only when the metric is strictly above the threshold.
pub fn expert_badge(metric: f64, mode: MetricMode, threshold: f64) -> Badge {
    let unit = mode.unit();

    if metric > threshold {
        Badge {
            is_expert: true,
            reason: format!("{metric:.1} {unit} clears the {threshold} {unit} expert mark."),
        }
    } else {
        Badge {
            is_expert: false,
            reason: format!("{metric:.1} {unit} is short of the {threshold} {unit} expert mark."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_strict() {
        assert!(!expert_badge(100.0, MetricMode::Area, DEFAULT_EXPERT_THRESHOLD).is_expert);
        assert!(expert_badge(100.01, MetricMode::Area, DEFAULT_EXPERT_THRESHOLD).is_expert);
    }

    #[test]
    fn test_reason_uses_unit() {
        let badge = expert_badge(31.4159, MetricMode::Perimeter, 30.0);
        assert!(badge.is_expert);
        assert_eq!(badge.reason, "31.4 cm clears the 30 cm expert mark.");
    }
}
