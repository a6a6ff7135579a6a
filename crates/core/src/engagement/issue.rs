use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Progress of an issue report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    /// Newly reported.
    #[default]
    Open,
    /// Being worked on.
    InProgress,
    /// Fixed.
    Resolved,
}

/// Refused issue update.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IssueError {
    /// Description is blank.
    #[error("issue description is required")]
    EmptyDescription,

    /// Unknown status string.
    #[error("unknown issue status '{0}'")]
    UnknownStatus(String),

    /// Status did not change.
    #[error("issue is already {0}")]
    Unchanged(IssueStatus),
}

impl IssueStatus {
    /// Checks a manager's status update. Any different status is allowed,
    /// so resolved issues can be reopened.
    ///
    /// # Errors
    ///
    /// Returns `IssueError::Unchanged` if `next` equals the current status.
    pub fn transition(self, next: Self) -> Result<Self, IssueError> {
        if self == next {
            Err(IssueError::Unchanged(self))
        } else {
            Ok(next)
        }
    }
}

/// Checks a new report has a description.
///
/// # Errors
///
/// Returns `IssueError::EmptyDescription` for blank text.
pub fn validate_description(description: &str) -> Result<(), IssueError> {
    if description.trim().is_empty() {
        Err(IssueError::EmptyDescription)
    } else {
        Ok(())
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
        })
    }
}

impl FromStr for IssueStatus {
    type Err = IssueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            other => Err(IssueError::UnknownStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reopen_resolved_issue() {
        assert_eq!(
            IssueStatus::Resolved.transition(IssueStatus::Open),
            Ok(IssueStatus::Open)
        );
    }

    #[test]
    fn test_same_status_is_refused() {
        assert_eq!(
            IssueStatus::InProgress.transition(IssueStatus::InProgress),
            Err(IssueError::Unchanged(IssueStatus::InProgress))
        );
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("in_progress".parse::<IssueStatus>().unwrap(), IssueStatus::InProgress);
        assert_eq!(IssueStatus::InProgress.to_string(), "in_progress");
        assert!("closed".parse::<IssueStatus>().is_err());
    }

    #[test]
    fn test_description_required() {
        assert_eq!(validate_description("  "), Err(IssueError::EmptyDescription));
        assert!(validate_description("Elevator stuck on 3rd floor").is_ok());
    }
}
