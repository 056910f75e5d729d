use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScamAlerts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScamAlerts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScamAlerts::CreatedBy).uuid().not_null())
                    .col(ColumnDef::new(ScamAlerts::Title).string_len(200).not_null())
                    .col(ColumnDef::new(ScamAlerts::Description).text().not_null())
                    .col(
                        ColumnDef::new(ScamAlerts::Severity)
                            .string_len(20)
                            .not_null()
                            .default("medium"),
                    )
                    .col(ColumnDef::new(ScamAlerts::Region).string_len(100).null())
                    .col(
                        ColumnDef::new(ScamAlerts::ExpiresAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScamAlerts::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(ScamAlerts::ModeratorId).uuid().null())
                    .col(ColumnDef::new(ScamAlerts::ModeratorNotes).text().null())
                    .col(
                        ColumnDef::new(ScamAlerts::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ScamAlerts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ScamAlerts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ScamAlerts::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .to_owned(),
            )
            .await?;

        // 公開中アラートの抽出
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(ScamAlerts::Table)
                    .name("idx_scam_alerts_published")
                    .col(ScamAlerts::Status)
                    .col(ScamAlerts::IsActive)
                    .col(ScamAlerts::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(ScamAlerts::Table)
                    .name("idx_scam_alerts_created_by")
                    .col(ScamAlerts::CreatedBy)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScamAlerts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ScamAlerts {
    Table,
    Id,
    CreatedBy,
    Title,
    Description,
    Severity,
    Region,
    ExpiresAt,
    Status,
    ModeratorId,
    ModeratorNotes,
    IsActive,
    CreatedAt,
    UpdatedAt,
    Version,
}
