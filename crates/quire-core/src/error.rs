use std::fmt;

use thiserror::Error;

use crate::models::issue::Issue;

/// A request body that failed schema validation.
///
/// Carries every field-level issue in the order the fields were checked, so
/// the caller can fix all of them in one round trip.
#[derive(Debug, Clone, Error)]
pub struct ValidationError {
    pub issues: Vec<Issue>,
}

impl ValidationError {
    pub fn single(issue: Issue) -> Self {
        Self {
            issues: vec![issue],
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid request")?;
        for (i, issue) in self.issues.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{issue}")?;
        }
        Ok(())
    }
}
