use serde::Deserialize;
use tracing::debug;
use vision::{ImagePayload, RawDimensionEstimate};

use crate::error::AppError::{self, MalformedPayload};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnackImage {
    pub image_data: String,
}

/// Parses `{ "imageData": "data:image/...;base64,..." }` and checks the image itself.
pub fn get_image_from_body(body: &[u8]) -> Result<(SnackImage, ImagePayload), AppError> {
    let request: SnackImage = serde_json::from_slice(body).map_err(|e| {
        debug!("Rejected analysis payload: {e}");
        MalformedPayload
    })?;

    let image = ImagePayload::from_data_uri(&request.image_data).map_err(|e| {
        debug!("Rejected analysis image: {e}");
        MalformedPayload
    })?;

    Ok((request, image))
}

/// Parses a manual calculator body: `{ "type": "...", ...dimensions }`.
pub fn get_dimensions_from_body(body: &[u8]) -> Result<RawDimensionEstimate, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        debug!("Rejected calculator payload: {e}");
        MalformedPayload
    })
}

#[cfg(test)]
mod tests {
    use snacks::DetectedType;

    use super::*;

    #[test]
    fn test_accepts_image_data_uri() {
        let body = br#"{"imageData":"data:image/png;base64,iVBORw0KGgo="}"#;
        let (request, image) = get_image_from_body(body).unwrap();

        assert_eq!(request.image_data, "data:image/png;base64,iVBORw0KGgo=");
        assert_eq!(image.mime_type, "image/png");
    }

    #[test]
    fn test_calculator_body_uses_type_key() {
        let estimate =
            get_dimensions_from_body(br#"{"type":"samoosa","sideA":3,"sideB":4,"sideC":5}"#)
                .unwrap();

        assert_eq!(estimate.snack_type, DetectedType::Samoosa);
        assert_eq!(estimate.side_a, Some(3.0));
        assert!(matches!(get_dimensions_from_body(b"[1, 2]"), Err(MalformedPayload)));
    }

    #[test]
    fn test_rejects_bad_shapes() {
        let bodies: [&[u8]; 5] = [
            b"not json",
            br#"{"image":"data:image/png;base64,iVBORw0KGgo="}"#,
            br#"{"imageData":42}"#,
            br#"{"imageData":"data:text/plain;base64,aGk="}"#,
            br#"{"imageData":""}"#,
        ];

        for body in bodies {
            assert!(matches!(get_image_from_body(body), Err(MalformedPayload)));
        }
    }
}
