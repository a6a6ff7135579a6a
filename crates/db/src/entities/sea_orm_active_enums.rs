//! `SeaORM` mappings for the Postgres enum types, with conversions to the
//! domain enums in `domus-core`.

use domus_core::{auth, billing, catalog, engagement, profile};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Maps a database enum onto its domain twin in both directions.
macro_rules! mirror_enum {
    ($db:ident <=> $module:ident :: $domain:ident { $($variant:ident),+ $(,)? }) => {
        impl From<$module::$domain> for $db {
            fn from(value: $module::$domain) -> Self {
                match value {
                    $($module::$domain::$variant => Self::$variant,)+
                }
            }
        }

        impl From<$db> for $module::$domain {
            fn from(value: $db) -> Self {
                match value {
                    $($db::$variant => Self::$variant,)+
                }
            }
        }
    };
}

/// `account_role`
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_role")]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// Resident.
    #[sea_orm(string_value = "resident")]
    Resident,
    /// Building manager.
    #[sea_orm(string_value = "manager")]
    Manager,
    /// Business owner.
    #[sea_orm(string_value = "business")]
    Business,
}

/// `resident_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "resident_type")]
#[serde(rename_all = "snake_case")]
pub enum ResidentType {
    /// Owner.
    #[sea_orm(string_value = "owner")]
    Owner,
    /// Tenant.
    #[sea_orm(string_value = "tenant")]
    Tenant,
    /// Visitor.
    #[sea_orm(string_value = "visitor")]
    Visitor,
}

/// `contract_status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "contract_status")]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    /// Awaiting admin approval.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Approved.
    #[sea_orm(string_value = "approved")]
    Approved,
}

/// `request_status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "request_status")]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Pending.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Approved.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Completed.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Cancelled.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// `bill_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "bill_type")]
#[serde(rename_all = "snake_case")]
pub enum BillType {
    /// Electricity.
    #[sea_orm(string_value = "electricity")]
    Electricity,
    /// Water.
    #[sea_orm(string_value = "water")]
    Water,
    /// Gas.
    #[sea_orm(string_value = "gas")]
    Gas,
}

/// `audience`
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "audience")]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    /// Everyone.
    #[sea_orm(string_value = "all")]
    All,
    /// Residents.
    #[sea_orm(string_value = "residents")]
    Residents,
    /// Managers.
    #[sea_orm(string_value = "managers")]
    Managers,
    /// Business owners.
    #[sea_orm(string_value = "businesses")]
    Businesses,
}

/// `notification_status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "notification_status")]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    /// Sent.
    #[sea_orm(string_value = "sent")]
    Sent,
    /// Failed.
    #[sea_orm(string_value = "failed")]
    Failed,
}

/// `issue_status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "issue_status")]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    /// Open.
    #[sea_orm(string_value = "open")]
    Open,
    /// In progress.
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    /// Resolved.
    #[sea_orm(string_value = "resolved")]
    Resolved,
}

mirror_enum!(AccountRole <=> auth::AccountRole { Resident, Manager, Business });
mirror_enum!(ResidentType <=> profile::ResidentType { Owner, Tenant, Visitor });
mirror_enum!(ContractStatus <=> engagement::ContractStatus { Pending, Approved });
mirror_enum!(RequestStatus <=> catalog::RequestStatus { Pending, Approved, Completed, Cancelled });
mirror_enum!(BillType <=> billing::BillType { Electricity, Water, Gas });
mirror_enum!(Audience <=> engagement::Audience { All, Residents, Managers, Businesses });
mirror_enum!(NotificationStatus <=> engagement::NotificationStatus { Sent, Failed });
mirror_enum!(IssueStatus <=> engagement::IssueStatus { Open, InProgress, Resolved });

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn test_round_trip_through_domain() {
        for role in AccountRole::iter() {
            let domain: auth::AccountRole = role.into();
            assert_eq!(AccountRole::from(domain), role);
        }
        for status in IssueStatus::iter() {
            let domain: engagement::IssueStatus = status.into();
            assert_eq!(IssueStatus::from(domain), status);
        }
    }

    #[test]
    fn test_string_values_match_domain_display() {
        for bill in BillType::iter() {
            let domain: billing::BillType = bill.into();
            assert_eq!(bill.to_value(), domain.to_string());
        }
        for status in RequestStatus::iter() {
            let domain: catalog::RequestStatus = status.into();
            assert_eq!(status.to_value(), domain.to_string());
        }
    }
}
