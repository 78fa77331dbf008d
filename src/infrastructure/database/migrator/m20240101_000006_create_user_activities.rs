//! Create user_activities table migration

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserActivities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserActivities::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserActivities::UserId).string().not_null())
                    .col(
                        ColumnDef::new(UserActivities::Action)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserActivities::Details)
                            .text()
                            .not_null()
                            .default("{}"),
                    )
                    .col(
                        ColumnDef::new(UserActivities::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Analytics counts by action over a time window
        manager
            .create_index(
                Index::create()
                    .name("idx_user_activities_action_timestamp")
                    .table(UserActivities::Table)
                    .col(UserActivities::Action)
                    .col(UserActivities::Timestamp)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserActivities::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum UserActivities {
    Table,
    Id,
    UserId,
    Action,
    Details,
    Timestamp,
}
