use serde::{Deserialize, Serialize};
use snacks::{DetectedType, Dimensions, MetricMode, SnackType};

/// Flat estimate as the model returns it. Fields for other shapes are expected to be null,
/// and are dropped by [`RawDimensionEstimate::dimensions`] if they are not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDimensionEstimate {
    #[serde(default, alias = "type")]
    pub snack_type: DetectedType,
    pub diameter: Option<f64>,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub inclination: Option<f64>,
    pub side_a: Option<f64>,
    pub side_b: Option<f64>,
    pub side_c: Option<f64>,
    pub error: Option<String>,
}

impl RawDimensionEstimate {
    pub fn unknown(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Error reported by the model, ignoring blank strings.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }

    /// The measurements that belong to the declared snack type.
    pub fn dimensions(&self) -> Option<Dimensions> {
        let snack_type = self.snack_type.snack_type()?;

        Some(match snack_type {
            SnackType::Parippuvada => Dimensions::Circle {
                diameter: self.diameter,
            },
            SnackType::Vazhaikkapam => Dimensions::Ellipse {
                length: self.length,
                width: self.width,
                inclination: self.inclination,
            },
            SnackType::Samoosa => Dimensions::Triangle {
                side_a: self.side_a,
                side_b: self.side_b,
                side_c: self.side_c,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemarkRequest {
    #[serde(rename = "type")]
    pub snack_type: SnackType,
    pub new_metric: f64,
    /// 0 when there was no earlier snack of this type.
    pub previous_metric: f64,
    pub mode: MetricMode,
}

#[derive(Deserialize)]
pub struct RemarkOutput {
    pub comment: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
}

#[derive(Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Deserialize)]
pub struct Part {
    pub text: Option<String>,
}

impl Response {
    /// Text of the first candidate, with all its parts joined.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;

        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();

        (!text.trim().is_empty()).then_some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_keeps_only_its_shape() {
        let raw: RawDimensionEstimate = serde_json::from_str(
            r#"{"snackType":"vazhaikkapam","diameter":9,"length":14,"width":6,"inclination":20,"sideA":null,"sideB":null,"sideC":null,"error":null}"#,
        )
        .unwrap();

        assert_eq!(
            raw.dimensions(),
            Some(Dimensions::Ellipse {
                length: Some(14.0),
                width: Some(6.0),
                inclination: Some(20.0),
            })
        );
        assert_eq!(raw.error_message(), None);
    }

    #[test]
    fn test_estimate_missing_fields_default() {
        let raw: RawDimensionEstimate = serde_json::from_str(r#"{"error":"  "}"#).unwrap();

        assert_eq!(raw.snack_type, DetectedType::Unknown);
        assert_eq!(raw.dimensions(), None);
        assert_eq!(raw.error_message(), None);
    }

    #[test]
    fn test_estimate_reads_type_key() {
        let raw: RawDimensionEstimate =
            serde_json::from_str(r#"{"type":"samoosa","sideA":3,"sideB":4,"sideC":5}"#).unwrap();

        assert_eq!(raw.snack_type, DetectedType::Samoosa);
        assert_eq!(raw.side_c, Some(5.0));
    }

    #[test]
    fn test_response_text() {
        let response: Response = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"{\"comment\":"},{"text":"\"Kollam!\"}"}],"role":"model"}}]}"#,
        )
        .unwrap();
        let output: RemarkOutput = serde_json::from_str(&response.text().unwrap()).unwrap();
        assert_eq!(output.comment, "Kollam!");

        let empty: Response = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(empty.text().is_none());
    }
}
