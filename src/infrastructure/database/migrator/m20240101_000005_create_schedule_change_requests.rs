//! Create schedule_change_requests table migration

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScheduleChangeRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScheduleChangeRequests::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ScheduleChangeRequests::ScheduleId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleChangeRequests::TeacherId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleChangeRequests::TeacherName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleChangeRequests::RequestedChanges)
                            .text()
                            .not_null()
                            .default("{}"),
                    )
                    .col(
                        ColumnDef::new(ScheduleChangeRequests::Reason)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleChangeRequests::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(ScheduleChangeRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleChangeRequests::ReviewedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleChangeRequests::ReviewedBy)
                            .string()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_schedule_change_requests_status")
                    .table(ScheduleChangeRequests::Table)
                    .col(ScheduleChangeRequests::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(ScheduleChangeRequests::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
pub enum ScheduleChangeRequests {
    Table,
    Id,
    ScheduleId,
    TeacherId,
    TeacherName,
    RequestedChanges,
    Reason,
    Status,
    CreatedAt,
    ReviewedAt,
    ReviewedBy,
}
