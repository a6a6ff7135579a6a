use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle of a service request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Waiting for the provider.
    Pending,
    /// Accepted by the provider.
    Approved,
    /// Work done.
    Completed,
    /// Withdrawn or refused.
    Cancelled,
}

/// Who is changing a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestActor {
    /// The user who filed the request.
    Requester,
    /// The business owner or building manager of the service.
    Provider,
}

/// Refused status change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The lifecycle does not allow this move.
    #[error("cannot move a service request from {from} to {to}")]
    NotAllowed {
        /// Current status.
        from: RequestStatus,
        /// Requested status.
        to: RequestStatus,
    },

    /// Requesters can only cancel.
    #[error("requesters may only cancel their requests")]
    RequesterMayOnlyCancel,

    /// Unknown status string.
    #[error("unknown request status '{0}'")]
    UnknownStatus(String),
}

impl RequestStatus {
    /// Returns true once no further change is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns true if the lifecycle allows moving to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved | Self::Cancelled)
                | (Self::Approved, Self::Completed | Self::Cancelled)
        )
    }

    /// Checks both the lifecycle and the actor's rights.
    ///
    /// # Errors
    ///
    /// Returns a `TransitionError` if the change is refused.
    pub fn transition(self, next: Self, actor: RequestActor) -> Result<Self, TransitionError> {
        if actor == RequestActor::Requester && next != Self::Cancelled {
            return Err(TransitionError::RequesterMayOnlyCancel);
        }
        if !self.can_transition_to(next) {
            return Err(TransitionError::NotAllowed {
                from: self,
                to: next,
            });
        }
        Ok(next)
    }

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = TransitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(TransitionError::UnknownStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use super::RequestStatus::{Approved, Cancelled, Completed, Pending};

    #[rstest]
    #[case(Pending, Approved, true)]
    #[case(Pending, Cancelled, true)]
    #[case(Pending, Completed, false)]
    #[case(Approved, Completed, true)]
    #[case(Approved, Cancelled, true)]
    #[case(Approved, Pending, false)]
    #[case(Completed, Cancelled, false)]
    #[case(Cancelled, Approved, false)]
    fn test_lifecycle(#[case] from: RequestStatus, #[case] to: RequestStatus, #[case] ok: bool) {
        assert_eq!(from.can_transition_to(to), ok);
        assert_eq!(from.transition(to, RequestActor::Provider).is_ok(), ok);
    }

    #[test]
    fn test_requester_can_cancel_pending() {
        assert_eq!(
            Pending.transition(Cancelled, RequestActor::Requester),
            Ok(Cancelled)
        );
    }

    #[test]
    fn test_requester_cannot_approve() {
        assert_eq!(
            Pending.transition(Approved, RequestActor::Requester),
            Err(TransitionError::RequesterMayOnlyCancel)
        );
    }

    #[test]
    fn test_terminal_states() {
        assert!(Completed.is_terminal());
        assert!(Cancelled.is_terminal());
        assert!(!Pending.is_terminal());
    }

    #[test]
    fn test_parse_status() {
        assert_eq!("Approved".parse::<RequestStatus>().unwrap(), Approved);
        assert!("done".parse::<RequestStatus>().is_err());
    }
}
