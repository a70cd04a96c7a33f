//! Opinions table migration
//!
//! Creates the opinions table holding one row per submitted feedback report,
//! plus an index on prodchan for per-product queries.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Opinions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Opinions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Opinions::Happy).boolean().not_null())
                    .col(ColumnDef::new(Opinions::Description).text().not_null())
                    .col(ColumnDef::new(Opinions::Url).text().null())
                    .col(
                        ColumnDef::new(Opinions::Prodchan)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Opinions::UserAgent).text().not_null())
                    .col(ColumnDef::new(Opinions::Browser).string_len(64).null())
                    .col(
                        ColumnDef::new(Opinions::BrowserVersion)
                            .string_len(32)
                            .null(),
                    )
                    .col(ColumnDef::new(Opinions::Platform).string_len(64).null())
                    .col(ColumnDef::new(Opinions::Locale).string_len(16).null())
                    .col(
                        ColumnDef::new(Opinions::Manufacturer)
                            .string_len(64)
                            .null(),
                    )
                    .col(ColumnDef::new(Opinions::Device).string_len(64).null())
                    .col(
                        ColumnDef::new(Opinions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_opinions_prodchan")
                    .table(Opinions::Table)
                    .col(Opinions::Prodchan)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_opinions_prodchan").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Opinions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Opinions {
    #[sea_orm(iden = "opinions")]
    Table,
    Id,
    Happy,
    Description,
    Url,
    Prodchan,
    UserAgent,
    Browser,
    BrowserVersion,
    Platform,
    Locale,
    Manufacturer,
    Device,
    CreatedAt,
}
