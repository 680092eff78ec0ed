//! AWS error classification
//!
//! Maps provider error codes into the small set of categories the inventory
//! cares about. Classification is by error code, not message text, since
//! messages vary across services and SDK versions.

use thiserror::Error;

/// Classified AWS API error
#[derive(Debug, Error)]
pub enum AwsError {
    /// Credentials are missing, expired, or lack permission
    #[error("AWS authentication failed: {message}")]
    AuthFailure { message: String },

    /// The API rejected the request due to rate limiting
    #[error("AWS request was throttled")]
    Throttled,

    /// The request itself was malformed
    #[error("Invalid AWS request parameter: {message}")]
    InvalidParameter { message: String },

    /// Anything else the SDK reported
    #[error("AWS API error{}: {message}", code.as_deref().map(|c| format!(" ({c})")).unwrap_or_default())]
    Sdk {
        code: Option<String>,
        message: String,
    },
}

/// Error codes indicating an authentication or authorization problem
const AUTH_FAILURE_CODES: &[&str] = &[
    "AuthFailure",
    "UnauthorizedOperation",
    "OptInRequired",
    "PendingVerification",
];

/// Error codes indicating rate limiting
const THROTTLING_CODES: &[&str] = &[
    "Throttling",
    "ThrottlingException",
    "RequestLimitExceeded",
];

/// Error codes indicating a malformed request
const INVALID_PARAMETER_CODES: &[&str] = &[
    "InvalidParameterValue",
    "InvalidParameterCombination",
    "MissingParameter",
    "ValidationError",
];

/// Classify an AWS error from its code and message.
pub fn classify_aws_error(code: Option<&str>, message: &str) -> AwsError {
    match code {
        Some(c) if AUTH_FAILURE_CODES.contains(&c) => AwsError::AuthFailure {
            message: message.to_string(),
        },
        Some(c) if THROTTLING_CODES.contains(&c) => AwsError::Throttled,
        Some(c) if INVALID_PARAMETER_CODES.contains(&c) => AwsError::InvalidParameter {
            message: message.to_string(),
        },
        _ => AwsError::Sdk {
            code: code.map(str::to_string),
            message: message.to_string(),
        },
    }
}

impl AwsError {
    /// Whether retrying the request later could succeed.
    pub fn is_throttling(&self) -> bool {
        matches!(self, AwsError::Throttled)
    }
}
