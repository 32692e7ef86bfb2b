use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Model request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Model request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("The model returned no output.")]
    EmptyResponse,

    #[error("Model output could not be read: {0}")]
    Decode(#[from] serde_json::Error),
}

impl VisionError {
    /// Rate limit or exhausted quota upstream. Uses the HTTP status when there is one and
    /// falls back to looking for `429` in the message otherwise.
    pub fn is_quota(&self) -> bool {
        match self {
            VisionError::Status { status, .. } => *status == 429,
            VisionError::Transport(e) => match e.status() {
                Some(status) => status.as_u16() == 429,
                None => e.to_string().contains("429"),
            },
            other => other.to_string().contains("429"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_from_status() {
        let quota = VisionError::Status {
            status: 429,
            body: "RESOURCE_EXHAUSTED".to_string(),
        };
        assert!(quota.is_quota());

        let server = VisionError::Status {
            status: 500,
            body: "retry after 429 seconds".to_string(),
        };
        assert!(!server.is_quota());

        assert!(!VisionError::EmptyResponse.is_quota());
    }

    #[test]
    fn test_quota_from_text_without_status() {
        let decode = serde_json::from_str::<bool>("\"429\"").unwrap_err();
        let error = VisionError::Decode(decode);
        assert!(error.to_string().contains("429"));
        assert!(error.is_quota());

        let other = VisionError::Decode(serde_json::from_str::<bool>("\"nope\"").unwrap_err());
        assert!(!other.is_quota());
    }
}
