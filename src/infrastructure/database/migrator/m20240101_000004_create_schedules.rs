//! Create schedules table migration

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Schedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Schedules::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Schedules::ClassId).string().not_null())
                    .col(ColumnDef::new(Schedules::DayOfWeek).integer().not_null())
                    .col(ColumnDef::new(Schedules::TimeSlot).string_len(50).not_null())
                    .col(ColumnDef::new(Schedules::Subject).string_len(255).not_null())
                    .col(ColumnDef::new(Schedules::TeacherId).string().not_null())
                    .col(
                        ColumnDef::new(Schedules::TeacherName)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Schedules::Extra)
                            .text()
                            .not_null()
                            .default("{}"),
                    )
                    .col(
                        ColumnDef::new(Schedules::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_schedules_class_id")
                    .table(Schedules::Table)
                    .col(Schedules::ClassId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_schedules_teacher_id")
                    .table(Schedules::Table)
                    .col(Schedules::TeacherId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Schedules::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Schedules {
    Table,
    Id,
    ClassId,
    DayOfWeek,
    TimeSlot,
    Subject,
    TeacherId,
    TeacherName,
    Extra,
    CreatedAt,
}
