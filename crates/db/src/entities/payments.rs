//! `SeaORM` Entity for payments table.
//!
//! `receipt_number` carries the unique constraint `uq_payments_receipt_number`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount: Decimal,
    pub date: DateTimeWithTimeZone,
    #[sea_orm(unique)]
    pub receipt_number: String,
    pub modified_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_one = "super::bill_payments::Entity")]
    BillPayments,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::bill_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BillPayments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
