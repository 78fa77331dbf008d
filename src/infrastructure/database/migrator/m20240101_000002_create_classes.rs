//! Create classes table migration

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Classes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Classes::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Classes::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Classes::Grade).integer().not_null())
                    .col(ColumnDef::new(Classes::TeacherId).string().null())
                    .col(
                        ColumnDef::new(Classes::StudentCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Classes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Classes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Classes {
    Table,
    Id,
    Name,
    Grade,
    TeacherId,
    StudentCount,
    CreatedAt,
}
