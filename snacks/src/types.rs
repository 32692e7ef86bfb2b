use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snacks the service knows how to measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnackType {
    Parippuvada,
    Vazhaikkapam,
    Samoosa,
}

impl SnackType {
    pub const ALL: [SnackType; 3] = [
        SnackType::Parippuvada,
        SnackType::Vazhaikkapam,
        SnackType::Samoosa,
    ];

    pub fn shape(self) -> Shape {
        match self {
            SnackType::Parippuvada => Shape::Circle,
            SnackType::Vazhaikkapam => Shape::Ellipse,
            SnackType::Samoosa => Shape::Triangle,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SnackType::Parippuvada => "Parippuvada",
            SnackType::Vazhaikkapam => "Vazhaikkapam",
            SnackType::Samoosa => "Samoosa",
        }
    }
}

impl fmt::Display for SnackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SnackType::Parippuvada => "parippuvada",
            SnackType::Vazhaikkapam => "vazhaikkapam",
            SnackType::Samoosa => "samoosa",
        })
    }
}

/// What the classifier says it saw. Anything outside the known set reads as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectedType {
    Parippuvada,
    Vazhaikkapam,
    Samoosa,
    #[default]
    #[serde(other)]
    Unknown,
}

impl DetectedType {
    pub fn snack_type(self) -> Option<SnackType> {
        match self {
            DetectedType::Parippuvada => Some(SnackType::Parippuvada),
            DetectedType::Vazhaikkapam => Some(SnackType::Vazhaikkapam),
            DetectedType::Samoosa => Some(SnackType::Samoosa),
            DetectedType::Unknown => None,
        }
    }
}

impl From<SnackType> for DetectedType {
    fn from(snack_type: SnackType) -> Self {
        match snack_type {
            SnackType::Parippuvada => DetectedType::Parippuvada,
            SnackType::Vazhaikkapam => DetectedType::Vazhaikkapam,
            SnackType::Samoosa => DetectedType::Samoosa,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Circle,
    Ellipse,
    Triangle,
}

/// Deployment-wide size convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricMode {
    #[default]
    Area,
    Perimeter,
}

impl MetricMode {
    pub fn unit(self) -> &'static str {
        match self {
            MetricMode::Area => "cm²",
            MetricMode::Perimeter => "cm",
        }
    }
}

impl fmt::Display for MetricMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MetricMode::Area => "area",
            MetricMode::Perimeter => "perimeter",
        })
    }
}

impl FromStr for MetricMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "area" => Ok(MetricMode::Area),
            "perimeter" => Ok(MetricMode::Perimeter),
            other => Err(format!("unknown metric mode `{other}`, expected `area` or `perimeter`")),
        }
    }
}

/// Raw measurements in centimetres, keyed by shape. Fields stay optional because the
/// estimator is allowed to leave any of them out; geometry decides what that means.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Dimensions {
    Circle {
        diameter: Option<f64>,
    },
    #[serde(rename_all = "camelCase")]
    Ellipse {
        length: Option<f64>,
        width: Option<f64>,
        /// Degrees from horizontal. Display only.
        inclination: Option<f64>,
    },
    #[serde(rename_all = "camelCase")]
    Triangle {
        side_a: Option<f64>,
        side_b: Option<f64>,
        side_c: Option<f64>,
    },
}

impl Dimensions {
    pub fn shape(&self) -> Shape {
        match self {
            Dimensions::Circle { .. } => Shape::Circle,
            Dimensions::Ellipse { .. } => Shape::Ellipse,
            Dimensions::Triangle { .. } => Shape::Triangle,
        }
    }
}

/// One measured snack. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnackObservation {
    pub id: String,
    #[serde(rename = "type")]
    pub snack_type: SnackType,
    pub metric: f64,
    pub mode: MetricMode,
    pub created_at: DateTime<Utc>,
    /// Data URI as submitted, kept only so clients can show the winner again.
    pub image: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detected_type_falls_back_to_unknown() {
        let detected: DetectedType = serde_json::from_str("\"samoosa\"").unwrap();
        assert_eq!(detected.snack_type(), Some(SnackType::Samoosa));

        let detected: DetectedType = serde_json::from_str("\"dosa\"").unwrap();
        assert_eq!(detected, DetectedType::Unknown);
        assert_eq!(detected.snack_type(), None);
    }

    #[test]
    fn test_dimensions_serialize_flat() {
        let circle = Dimensions::Circle {
            diameter: Some(10.0),
        };
        assert_eq!(
            serde_json::to_value(circle).unwrap(),
            serde_json::json!({ "diameter": 10.0 })
        );

        let triangle = Dimensions::Triangle {
            side_a: Some(3.0),
            side_b: None,
            side_c: Some(5.0),
        };
        assert_eq!(
            serde_json::to_value(triangle).unwrap(),
            serde_json::json!({ "sideA": 3.0, "sideB": null, "sideC": 5.0 })
        );
    }

    #[test]
    fn test_metric_mode_parse() {
        assert_eq!("area".parse::<MetricMode>(), Ok(MetricMode::Area));
        assert_eq!(" Perimeter ".parse::<MetricMode>(), Ok(MetricMode::Perimeter));
        assert!("volume".parse::<MetricMode>().is_err());
    }
}
