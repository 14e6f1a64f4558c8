//! Activity entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,

    pub duration_minutes: i64,

    /// Price in cents; exposed as a decimal at the domain boundary.
    pub price_cents: i64,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::activity_appointment::Entity")]
    ActivityAppointments,
}

impl Related<super::activity_appointment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActivityAppointments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
