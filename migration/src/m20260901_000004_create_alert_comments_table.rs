use super::m20260901_000003_create_scam_alerts_table::ScamAlerts;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AlertComments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AlertComments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AlertComments::AlertId).uuid().not_null())
                    .col(ColumnDef::new(AlertComments::AuthorId).uuid().not_null())
                    .col(ColumnDef::new(AlertComments::Content).text().not_null())
                    .col(
                        ColumnDef::new(AlertComments::Status)
                            .string_len(20)
                            .not_null()
                            .default("approved"),
                    )
                    .col(ColumnDef::new(AlertComments::ModeratorId).uuid().null())
                    .col(ColumnDef::new(AlertComments::ModeratorNotes).text().null())
                    .col(
                        ColumnDef::new(AlertComments::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(AlertComments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(AlertComments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(AlertComments::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    // アラート削除時はコメントも削除
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_alert_comments_alert_id")
                            .from(AlertComments::Table, AlertComments::AlertId)
                            .to(ScamAlerts::Table, ScamAlerts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(AlertComments::Table)
                    .name("idx_alert_comments_alert_id")
                    .col(AlertComments::AlertId)
                    .col(AlertComments::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AlertComments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AlertComments {
    Table,
    Id,
    AlertId,
    AuthorId,
    Content,
    Status,
    ModeratorId,
    ModeratorNotes,
    IsActive,
    CreatedAt,
    UpdatedAt,
    Version,
}
