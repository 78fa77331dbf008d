//! Create news table migration

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(News::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(News::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(News::Title).string_len(255).not_null())
                    .col(ColumnDef::new(News::Content).text().not_null())
                    .col(ColumnDef::new(News::AuthorId).string().not_null())
                    .col(ColumnDef::new(News::AuthorName).string_len(255).not_null())
                    .col(ColumnDef::new(News::Status).string_len(20).not_null())
                    .col(ColumnDef::new(News::Views).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(News::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(News::PublishedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_news_status")
                    .table(News::Table)
                    .col(News::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(News::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum News {
    Table,
    Id,
    Title,
    Content,
    AuthorId,
    AuthorName,
    Status,
    Views,
    CreatedAt,
    PublishedAt,
}
