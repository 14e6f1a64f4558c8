//! Appointment entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "appointments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub start_time: DateTimeUtc,

    /// Derived: start plus the summed durations of the linked activities.
    /// Stored denormalized so the overlap query can filter on it.
    pub end_time: DateTimeUtc,

    pub user_id: String,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,

    #[sea_orm(has_many = "super::activity_appointment::Entity")]
    ActivityAppointments,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::activity_appointment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActivityAppointments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
