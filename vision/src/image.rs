use base64::{Engine, engine::general_purpose::STANDARD};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Image is not a data URI")]
    NotDataUri,

    #[error("Image data is not base64 encoded")]
    NotBase64,

    #[error("Unsupported image type: {0}")]
    UnsupportedMime(String),

    #[error("Image data is empty")]
    Empty,
}

/// An image ready to hand to the model: MIME type plus base64 text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub data: String,
}

impl ImagePayload {
    /// Parses `data:<image/*>;base64,<data>`, checking the data actually decodes.
    pub fn from_data_uri(uri: &str) -> Result<Self, PayloadError> {
        let rest = uri.trim().strip_prefix("data:").ok_or(PayloadError::NotDataUri)?;
        let (mime_type, data) = rest.split_once(";base64,").ok_or(PayloadError::NotBase64)?;

        let subtype = mime_type
            .strip_prefix("image/")
            .ok_or_else(|| PayloadError::UnsupportedMime(mime_type.to_string()))?;
        if subtype.is_empty() {
            return Err(PayloadError::UnsupportedMime(mime_type.to_string()));
        }

        if data.is_empty() {
            return Err(PayloadError::Empty);
        }

        let decoded = STANDARD.decode(data).map_err(|_| PayloadError::NotBase64)?;
        if decoded.is_empty() {
            return Err(PayloadError::Empty);
        }

        Ok(Self {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })
    }

    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            data: STANDARD.encode(bytes),
        }
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_data_uri() {
        let payload = ImagePayload::from_data_uri("data:image/jpeg;base64,/9j/4AAQ").unwrap();
        assert_eq!(payload.mime_type, "image/jpeg");
        assert_eq!(payload.data, "/9j/4AAQ");
        assert_eq!(payload.to_data_uri(), "data:image/jpeg;base64,/9j/4AAQ");
    }

    #[test]
    fn test_rejects_malformed() {
        assert_eq!(ImagePayload::from_data_uri("hello"), Err(PayloadError::NotDataUri));
        assert_eq!(
            ImagePayload::from_data_uri("data:image/png,plain"),
            Err(PayloadError::NotBase64)
        );
        assert_eq!(
            ImagePayload::from_data_uri("data:text/plain;base64,aGk="),
            Err(PayloadError::UnsupportedMime("text/plain".to_string()))
        );
        assert_eq!(
            ImagePayload::from_data_uri("data:image/png;base64,"),
            Err(PayloadError::Empty)
        );
        assert_eq!(
            ImagePayload::from_data_uri("data:image/png;base64,@@@"),
            Err(PayloadError::NotBase64)
        );
    }

    #[test]
    fn test_from_bytes_round_trips_through_uri() {
        let payload = ImagePayload::from_bytes("image/png", &[1, 2, 3]);
        assert_eq!(ImagePayload::from_data_uri(&payload.to_data_uri()), Ok(payload));
    }
}
