//! Check request and outcome models.
//!
//! A run takes one [`CheckRequest`] and ends in exactly one [`CheckOutcome`].

use std::borrow::Cow;

use serde::Serialize;
use validator::Validate;

use super::interval::{Seconds, ValidationError};

/// Input of a single freshness check.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct CheckRequest {
    /// Name (or wildcard pattern) of the index to check.
    #[validate(custom(function = "validate_not_blank"))]
    pub index_name: String,

    /// Window in which at least one document must exist to avoid CRITICAL.
    pub critical: Seconds,

    /// Optional, usually shorter, window in which a document must exist to avoid WARNING.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<Seconds>,
}

impl CheckRequest {
    /// Builds a request from unvalidated command line values.
    ///
    /// The critical interval is always validated; the warning interval only
    /// when it was supplied.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidParameter`] if either interval is
    /// invalid or the index name is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use shared::models::CheckRequest;
    ///
    /// let request = CheckRequest::from_raw("impression-*", Some("3600"), Some("600")).unwrap();
    /// assert_eq!(request.index_name, "impression-*");
    /// assert!(request.warning.is_some());
    /// ```
    pub fn from_raw(
        index_name: &str,
        critical: Option<&str>,
        warning: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let critical = Seconds::parse(critical)?;
        let warning = warning.map(|raw| Seconds::parse(Some(raw))).transpose()?;

        let request = Self {
            index_name: index_name.to_string(),
            critical,
            warning,
        };

        request
            .validate()
            .map_err(|e| ValidationError::InvalidParameter(e.to_string()))?;

        if let Some(warning) = request.warning {
            if warning > request.critical {
                tracing::warn!(
                    critical = %request.critical,
                    warning = %warning,
                    "Warning interval is wider than the critical interval"
                );
            }
        }

        Ok(request)
    }
}

/// Rejects names that are empty or whitespace only. The name itself is kept
/// as given, since it is echoed back in the status line.
fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank")
            .with_message(Cow::Borrowed("Index name cannot be empty")));
    }
    Ok(())
}

/// Tri-state result of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Documents exist in every checked window.
    Ok,
    /// Documents exist in the critical window but not in the warning window.
    Warning,
    /// No documents in the critical window.
    Critical,
}

impl Status {
    /// Exit code of the monitoring plugin contract.
    #[must_use]
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::Warning => 1,
            Self::Critical => 2,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Final result of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    /// The status reached.
    pub status: Status,
    /// The index that was checked.
    pub index_name: String,
}

impl CheckOutcome {
    /// Creates a new outcome.
    #[must_use]
    pub fn new(status: Status, index_name: impl Into<String>) -> Self {
        Self {
            status,
            index_name: index_name.into(),
        }
    }

    /// The status line written to stdout.
    #[must_use]
    pub fn message(&self) -> String {
        match self.status {
            Status::Ok => "All ok!".to_string(),
            Status::Warning => format!("Warning - Collection {}.", self.index_name),
            Status::Critical => format!("Critical - Collection {}.", self.index_name),
        }
    }

    /// Shorthand for `self.status.exit_code()`.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        self.status.exit_code()
    }
}
