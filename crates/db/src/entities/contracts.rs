//! `SeaORM` Entity for contracts table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ContractStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "contracts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub manager_id: i64,
    #[sea_orm(column_type = "Text")]
    pub details: String,
    pub verified: bool,
    pub status: ContractStatus,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::building_managers::Entity",
        from = "Column::ManagerId",
        to = "super::building_managers::Column::Id"
    )]
    BuildingManagers,
}

impl Related<super::building_managers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BuildingManagers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
