//! Role-specific profiles attached to an account.
//!
//! Every account has one role, and each role has its own profile record:
//! residents live in a building, managers run one, business owners trade under
//! a name. A [`RoleProfile`] is checked against the account's role before the
//! profile row is written.

use domus_shared::types::BuildingId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::AccountRole;

/// How a resident occupies their unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResidentType {
    /// Owns the unit.
    Owner,
    /// Rents the unit.
    #[default]
    Tenant,
    /// Temporary occupant.
    Visitor,
}

impl std::fmt::Display for ResidentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Owner => "owner",
            Self::Tenant => "tenant",
            Self::Visitor => "visitor",
        })
    }
}

impl std::str::FromStr for ResidentType {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "owner" => Ok(Self::Owner),
            "tenant" => Ok(Self::Tenant),
            "visitor" => Ok(Self::Visitor),
            other => Err(ProfileError::UnknownResidentType(other.to_string())),
        }
    }
}

/// Rejected profile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    /// The profile kind does not match the account's role.
    #[error("a {profile} profile cannot be attached to a {account} account")]
    RoleMismatch {
        /// Role the profile belongs to.
        profile: AccountRole,
        /// Role of the account.
        account: AccountRole,
    },

    /// Business profiles need a trading name.
    #[error("business name is required")]
    EmptyBusinessName,

    /// Unknown resident type string.
    #[error("unknown resident type '{0}', expected owner, tenant or visitor")]
    UnknownResidentType(String),
}

/// Per-role profile data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleProfile {
    /// Resident of a building.
    Resident {
        /// Home building.
        building_id: BuildingId,
        /// Occupancy kind.
        resident_type: ResidentType,
    },
    /// Manager of a building.
    Manager {
        /// Managed building.
        building_id: BuildingId,
    },
    /// Business owner offering services.
    Business {
        /// Trading name.
        business_name: String,
    },
}

impl RoleProfile {
    /// Role this profile belongs to.
    #[must_use]
    pub const fn role(&self) -> AccountRole {
        match self {
            Self::Resident { .. } => AccountRole::Resident,
            Self::Manager { .. } => AccountRole::Manager,
            Self::Business { .. } => AccountRole::Business,
        }
    }

    /// Checks the profile can be attached to an account holding `account_role`.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::RoleMismatch` for the wrong role and
    /// `ProfileError::EmptyBusinessName` for a blank trading name.
    pub fn validate_for(&self, account_role: AccountRole) -> Result<(), ProfileError> {
        if self.role() != account_role {
            return Err(ProfileError::RoleMismatch {
                profile: self.role(),
                account: account_role,
            });
        }
        if let Self::Business { business_name } = self
            && business_name.trim().is_empty()
        {
            return Err(ProfileError::EmptyBusinessName);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn resident() -> RoleProfile {
        RoleProfile::Resident {
            building_id: BuildingId::new(1),
            resident_type: ResidentType::Owner,
        }
    }

    #[rstest]
    #[case(AccountRole::Manager)]
    #[case(AccountRole::Business)]
    fn test_resident_profile_needs_resident_account(#[case] account: AccountRole) {
        let err = resident().validate_for(account).unwrap_err();
        assert_eq!(
            err,
            ProfileError::RoleMismatch {
                profile: AccountRole::Resident,
                account,
            }
        );
    }

    #[test]
    fn test_matching_profiles_are_accepted() {
        assert!(resident().validate_for(AccountRole::Resident).is_ok());
        assert!(
            RoleProfile::Manager {
                building_id: BuildingId::new(2)
            }
            .validate_for(AccountRole::Manager)
            .is_ok()
        );
        assert!(
            RoleProfile::Business {
                business_name: "Spotless Cleaning".to_string()
            }
            .validate_for(AccountRole::Business)
            .is_ok()
        );
    }

    #[test]
    fn test_blank_business_name() {
        let profile = RoleProfile::Business {
            business_name: "   ".to_string(),
        };
        assert_eq!(
            profile.validate_for(AccountRole::Business),
            Err(ProfileError::EmptyBusinessName)
        );
    }

    #[test]
    fn test_resident_type_parse() {
        assert_eq!("Visitor".parse::<ResidentType>().unwrap(), ResidentType::Visitor);
        assert!(matches!(
            "landlord".parse::<ResidentType>(),
            Err(ProfileError::UnknownResidentType(_))
        ));
        assert_eq!(ResidentType::default().to_string(), "tenant");
    }
}
