use thiserror::Error;

/// Failure of a single provider request. Never retried.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to send {endpoint} request: {source}")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse {endpoint} JSON: {source}")]
    Parse {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{endpoint} response is missing {field}")]
    MissingField {
        endpoint: &'static str,
        field: &'static str,
    },
}

impl FetchError {
    /// True when the provider answered with a non-success status.
    pub fn is_status(&self) -> bool {
        matches!(self, FetchError::Status { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Location service unavailable")]
    Unavailable,
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location request timed out")]
    Timeout,
}

/// Vendor AQI category outside 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid AQI category {0}; expected 1..=5")]
pub struct InvalidAqiCategory(pub i64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_message_names_endpoint() {
        let err = FetchError::Status {
            endpoint: "weather",
            status: reqwest::StatusCode::NOT_FOUND,
            body: "city not found".into(),
        };

        assert!(err.is_status());
        let msg = err.to_string();
        assert!(msg.contains("weather request failed"));
        assert!(msg.contains("404"));
    }

    #[test]
    fn invalid_category_message() {
        assert_eq!(
            InvalidAqiCategory(7).to_string(),
            "Invalid AQI category 7; expected 1..=5"
        );
    }
}
