//! Opinion contact emails table migration
//!
//! Creates the opinion_emails table, one optional row per opinion, linked
//! with a cascading foreign key so deleting an opinion removes its email.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OpinionEmails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OpinionEmails::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(OpinionEmails::OpinionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OpinionEmails::Email)
                            .string_len(255)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_opinion_emails_opinion")
                            .from(OpinionEmails::Table, OpinionEmails::OpinionId)
                            .to(Opinions::Table, Opinions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_opinion_emails_opinion_id")
                    .table(OpinionEmails::Table)
                    .col(OpinionEmails::OpinionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_opinion_emails_opinion_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(OpinionEmails::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum OpinionEmails {
    #[sea_orm(iden = "opinion_emails")]
    Table,
    Id,
    OpinionId,
    Email,
}

#[derive(DeriveIden)]
enum Opinions {
    #[sea_orm(iden = "opinions")]
    Table,
    Id,
}
