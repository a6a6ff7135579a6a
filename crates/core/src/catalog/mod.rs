//! Service catalog rules.
//!
//! Business owners define services for a building. A new service is inactive
//! until the building manager named on it activates it, so both sides have to
//! agree before residents can request it.

mod request;

pub use request::{RequestActor, RequestStatus, TransitionError};

use chrono::{DateTime, Utc};
use domus_shared::types::UserId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected service definition or activation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Service name is blank.
    #[error("service name is required")]
    EmptyName,

    /// Cost below zero.
    #[error("service cost cannot be negative")]
    NegativeCost,

    /// Availability window does not move forward in time.
    #[error("service must become unavailable after it becomes available")]
    InvalidWindow,

    /// Caller is not the building manager named on the service.
    #[error("only the building manager named on the service can activate it")]
    NotServiceManager,
}

/// Fields a business owner supplies when defining a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Price per request.
    pub cost: Decimal,
    /// Start of availability.
    pub available_from: DateTime<Utc>,
    /// End of availability.
    pub available_to: DateTime<Utc>,
}

impl ServiceDefinition {
    /// Validates the definition before it is stored.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` describing the first problem found.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::EmptyName);
        }
        if self.cost < Decimal::ZERO {
            return Err(CatalogError::NegativeCost);
        }
        if self.available_to <= self.available_from {
            return Err(CatalogError::InvalidWindow);
        }
        Ok(())
    }
}

/// Checks that `actor` may activate a service naming `service_manager`.
///
/// # Errors
///
/// Returns `CatalogError::NotServiceManager` for anyone else.
pub fn ensure_can_activate(actor: UserId, service_manager: UserId) -> Result<(), CatalogError> {
    if actor == service_manager {
        Ok(())
    } else {
        Err(CatalogError::NotServiceManager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn definition() -> ServiceDefinition {
        let from = Utc::now();
        ServiceDefinition {
            name: "Window cleaning".to_string(),
            description: "Exterior windows, all floors".to_string(),
            cost: dec!(120.00),
            available_from: from,
            available_to: from + Duration::days(30),
        }
    }

    #[test]
    fn test_valid_definition() {
        assert_eq!(definition().validate(), Ok(()));
    }

    #[test]
    fn test_free_service_is_allowed() {
        let def = ServiceDefinition {
            cost: Decimal::ZERO,
            ..definition()
        };
        assert_eq!(def.validate(), Ok(()));
    }

    #[test]
    fn test_rejections() {
        let blank = ServiceDefinition {
            name: " ".to_string(),
            ..definition()
        };
        assert_eq!(blank.validate(), Err(CatalogError::EmptyName));

        let negative = ServiceDefinition {
            cost: dec!(-1),
            ..definition()
        };
        assert_eq!(negative.validate(), Err(CatalogError::NegativeCost));

        let base = definition();
        let empty_window = ServiceDefinition {
            available_to: base.available_from,
            ..base
        };
        assert_eq!(empty_window.validate(), Err(CatalogError::InvalidWindow));
    }

    #[test]
    fn test_only_named_manager_activates() {
        assert!(ensure_can_activate(UserId::new(4), UserId::new(4)).is_ok());
        assert_eq!(
            ensure_can_activate(UserId::new(5), UserId::new(4)),
            Err(CatalogError::NotServiceManager)
        );
    }
}
