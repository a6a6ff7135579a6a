//! Account roles and what each may do, plus password handling.

mod password;

pub use password::{
    MIN_PASSWORD_LEN, PasswordError, hash_password, is_acceptable_password, verify_password,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Account roles. Admin rights are a separate flag on the account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// Lives in a building; reports issues, pays bills and subscriptions.
    #[default]
    Resident,
    /// Runs a building; activates services, posts announcements and surveys.
    Manager,
    /// Offers services to buildings.
    Business,
}

impl AccountRole {
    /// Returns true if users may sign up with this role themselves.
    ///
    /// Managers are appointed by an admin.
    #[must_use]
    pub const fn is_self_registrable(&self) -> bool {
        matches!(self, Self::Resident | Self::Business)
    }

    /// Returns true if this role can run a building.
    #[must_use]
    pub const fn can_manage_building(&self) -> bool {
        matches!(self, Self::Manager)
    }

    /// Returns true if this role can define services.
    #[must_use]
    pub const fn can_offer_services(&self) -> bool {
        matches!(self, Self::Business)
    }

    /// Returns true if this role can file issue reports.
    #[must_use]
    pub const fn can_report_issues(&self) -> bool {
        matches!(self, Self::Resident)
    }

    /// Stable lowercase name used in tokens and storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Resident => "resident",
            Self::Manager => "manager",
            Self::Business => "business",
        }
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role string outside the known roles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl std::str::FromStr for AccountRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "resident" => Ok(Self::Resident),
            "manager" => Ok(Self::Manager),
            "business" => Ok(Self::Business),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_permissions() {
        assert!(AccountRole::Resident.is_self_registrable());
        assert!(AccountRole::Business.is_self_registrable());
        assert!(!AccountRole::Manager.is_self_registrable());

        assert!(AccountRole::Manager.can_manage_building());
        assert!(!AccountRole::Resident.can_manage_building());

        assert!(AccountRole::Business.can_offer_services());
        assert!(!AccountRole::Manager.can_offer_services());

        assert!(AccountRole::Resident.can_report_issues());
        assert!(!AccountRole::Business.can_report_issues());
    }

    #[test]
    fn test_role_parse_round_trip() {
        for role in [AccountRole::Resident, AccountRole::Manager, AccountRole::Business] {
            assert_eq!(role.to_string().parse::<AccountRole>().unwrap(), role);
        }
        assert_eq!(" Manager ".parse::<AccountRole>().unwrap(), AccountRole::Manager);
        assert!("owner".parse::<AccountRole>().is_err());
    }

    #[test]
    fn test_default_role_is_resident() {
        assert_eq!(AccountRole::default(), AccountRole::Resident);
    }

    #[test]
    fn test_password_length() {
        assert!(!is_acceptable_password("short"));
        assert!(is_acceptable_password("long enough"));
    }
}
