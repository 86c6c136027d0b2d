//! Wire types for the folio HTTP API.
//!
//! Field names follow the paths the portfolio frontend already speaks, which
//! is why a few of them (`Rating`, `Query`) are capitalised.

use serde::{Deserialize, Serialize};

/// Body of `POST /reviews`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub review: Option<String>,
    #[serde(default, rename = "Rating")]
    pub rating: Option<RatingValue>,
}

/// A rating as sent by the frontend: either a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RatingValue {
    Number(f64),
    Text(String),
}

impl RatingValue {
    /// Interpret the value as a finite number.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            RatingValue::Number(value) => *value,
            RatingValue::Text(text) => text.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

/// Body of `POST /contact`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactSubmission {
    #[serde(default, rename = "Query")]
    pub query: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Failure body for the multipart upload endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadFailure {
    pub message: String,
    pub error: String,
}

/// Response of `POST /contact`, success and failure alike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ContactResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Response of `GET /getreviews`. `reviews` is always present, even on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewsResponse<T> {
    pub reviews: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ReviewsResponse<T> {
    pub fn ok(reviews: Vec<T>) -> Self {
        Self {
            reviews,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            reviews: Vec::new(),
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminEmailResponse {
    pub email: String,
}
