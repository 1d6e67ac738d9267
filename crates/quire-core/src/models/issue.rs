use std::fmt;

use serde::Serialize;

/// Machine-readable category of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    InvalidJson,
    InvalidType,
    TooSmall,
    InvalidEnumValue,
    InvalidDate,
}

/// One schema violation, shaped like a zod issue so existing clients can
/// keep parsing `messages` unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub code: IssueCode,
    pub path: Vec<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<String>,
}

impl Issue {
    pub fn new(code: IssueCode, path: &[&str], message: impl Into<String>) -> Self {
        Self {
            code,
            path: path.iter().map(|s| s.to_string()).collect(),
            message: message.into(),
            expected: None,
            received: None,
        }
    }

    /// Type mismatch. A missing field reports `received: "undefined"` with
    /// the message `Required`.
    pub fn invalid_type(path: &[&str], expected: &str, received: &str) -> Self {
        let message = if received == "undefined" {
            "Required".to_string()
        } else {
            format!("Expected {expected}, received {received}")
        };
        Self {
            expected: Some(expected.to_string()),
            received: Some(received.to_string()),
            ..Self::new(IssueCode::InvalidType, path, message)
        }
    }

    /// Whether this issue points at `field` (a top-level key or one of its children).
    pub fn concerns(&self, field: &str) -> bool {
        self.path.first().is_some_and(|p| p == field)
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path.join("."), self.message)
        }
    }
}
