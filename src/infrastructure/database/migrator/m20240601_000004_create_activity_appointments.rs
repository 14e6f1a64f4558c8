//! Create activity_appointments link table
//!
//! Rows cascade with their appointment and with their activity.

use sea_orm_migration::prelude::*;

use super::m20240601_000002_create_activities::Activities;
use super::m20240601_000003_create_appointments::Appointments;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ActivityAppointments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ActivityAppointments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ActivityAppointments::AppointmentId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ActivityAppointments::ActivityId)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activity_appointments_appointment")
                            .from(
                                ActivityAppointments::Table,
                                ActivityAppointments::AppointmentId,
                            )
                            .to(Appointments::Table, Appointments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activity_appointments_activity")
                            .from(
                                ActivityAppointments::Table,
                                ActivityAppointments::ActivityId,
                            )
                            .to(Activities::Table, Activities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activity_appointments_appointment")
                    .table(ActivityAppointments::Table)
                    .col(ActivityAppointments::AppointmentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activity_appointments_activity")
                    .table(ActivityAppointments::Table)
                    .col(ActivityAppointments::ActivityId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivityAppointments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ActivityAppointments {
    Table,
    Id,
    AppointmentId,
    ActivityId,
}
