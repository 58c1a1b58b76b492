//! `SeaORM` Entity for collaborators table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "collaborators")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::collaborator_payments::Entity")]
    CollaboratorPayments,
    #[sea_orm(has_many = "super::payroll_payments::Entity")]
    PayrollPayments,
}

impl Related<super::collaborator_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CollaboratorPayments.def()
    }
}

impl Related<super::payroll_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayrollPayments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
