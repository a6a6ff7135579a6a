//! `SeaORM` Entity for services table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub cost: Decimal,
    pub available_from: DateTimeWithTimeZone,
    pub available_to: DateTimeWithTimeZone,
    pub building_manager_id: i64,
    pub business_owner_id: i64,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::building_managers::Entity",
        from = "Column::BuildingManagerId",
        to = "super::building_managers::Column::Id"
    )]
    BuildingManagers,
    #[sea_orm(
        belongs_to = "super::business_owners::Entity",
        from = "Column::BusinessOwnerId",
        to = "super::business_owners::Column::Id"
    )]
    BusinessOwners,
    #[sea_orm(has_many = "super::service_requests::Entity")]
    ServiceRequests,
}

impl Related<super::building_managers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BuildingManagers.def()
    }
}

impl Related<super::business_owners::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BusinessOwners.def()
    }
}

impl Related<super::service_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
