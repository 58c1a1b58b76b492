//! `SeaORM` Entity for collaborator_payments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::DocumentStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "collaborator_payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub collaborator_id: Option<Uuid>,
    pub status: DocumentStatus,
    pub currency: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub gross_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub net_amount: Decimal,
    pub paid_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::collaborators::Entity",
        from = "Column::CollaboratorId",
        to = "super::collaborators::Column::Id"
    )]
    Collaborators,
}

impl Related<super::collaborators::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Collaborators.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
