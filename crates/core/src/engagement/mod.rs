//! Announcements, issue reports, notifications and contracts.

mod issue;

pub use issue::{IssueError, IssueStatus, validate_description};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::AccountRole;

/// An enum string outside its known values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    /// What was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Who an announcement is shown to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    /// Everyone in the building.
    #[default]
    All,
    /// Residents only.
    Residents,
    /// Managers only.
    Managers,
    /// Business owners only.
    Businesses,
}

impl Audience {
    /// Returns true if an account with `role` should see the announcement.
    #[must_use]
    pub const fn reaches(self, role: AccountRole) -> bool {
        matches!(
            (self, role),
            (Self::All, _)
                | (Self::Residents, AccountRole::Resident)
                | (Self::Managers, AccountRole::Manager)
                | (Self::Businesses, AccountRole::Business)
        )
    }

    /// Audiences that reach `role`, for filtering stored announcements.
    #[must_use]
    pub const fn reaching(role: AccountRole) -> [Self; 2] {
        match role {
            AccountRole::Resident => [Self::All, Self::Residents],
            AccountRole::Manager => [Self::All, Self::Managers],
            AccountRole::Business => [Self::All, Self::Businesses],
        }
    }
}

impl FromStr for Audience {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "residents" => Ok(Self::Residents),
            "managers" => Ok(Self::Managers),
            "businesses" => Ok(Self::Businesses),
            other => Err(UnknownVariant {
                kind: "audience",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "all",
            Self::Residents => "residents",
            Self::Managers => "managers",
            Self::Businesses => "businesses",
        })
    }
}

/// Delivery outcome of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    /// Stored for the user.
    Sent,
    /// Could not be delivered.
    Failed,
}

/// Approval state of a management contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    /// Submitted by the manager.
    Pending,
    /// Approved by an admin.
    Approved,
}

impl ContractStatus {
    /// Approval is one-way.
    #[must_use]
    pub const fn can_approve(self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Text shown to a requester when their service request changes status.
#[must_use]
pub fn request_status_notice(service_name: &str, status: crate::catalog::RequestStatus) -> String {
    format!("Your request for '{service_name}' is now {status}.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RequestStatus;
    use rstest::rstest;

    #[rstest]
    #[case(Audience::All, AccountRole::Business, true)]
    #[case(Audience::Residents, AccountRole::Resident, true)]
    #[case(Audience::Residents, AccountRole::Manager, false)]
    #[case(Audience::Managers, AccountRole::Manager, true)]
    #[case(Audience::Businesses, AccountRole::Resident, false)]
    fn test_audience_reach(#[case] audience: Audience, #[case] role: AccountRole, #[case] seen: bool) {
        assert_eq!(audience.reaches(role), seen);
    }

    #[test]
    fn test_reaching_agrees_with_reaches() {
        for role in [AccountRole::Resident, AccountRole::Manager, AccountRole::Business] {
            for audience in Audience::reaching(role) {
                assert!(audience.reaches(role));
            }
        }
    }

    #[test]
    fn test_audience_parse() {
        assert_eq!("Residents".parse::<Audience>().unwrap(), Audience::Residents);
        let err = "tenants".parse::<Audience>().unwrap_err();
        assert_eq!(err.to_string(), "unknown audience 'tenants'");
    }

    #[test]
    fn test_contract_approval_is_one_way() {
        assert!(ContractStatus::Pending.can_approve());
        assert!(!ContractStatus::Approved.can_approve());
    }

    #[test]
    fn test_request_status_notice() {
        assert_eq!(
            request_status_notice("Plumbing", RequestStatus::Approved),
            "Your request for 'Plumbing' is now approved."
        );
    }
}
