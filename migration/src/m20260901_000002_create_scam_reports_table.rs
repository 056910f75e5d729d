use super::m20260901_000001_create_users_table::Users;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScamReports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScamReports::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScamReports::ReporterId).uuid().not_null())
                    .col(ColumnDef::new(ScamReports::Title).string_len(200).not_null())
                    .col(ColumnDef::new(ScamReports::Description).text().not_null())
                    .col(ColumnDef::new(ScamReports::ScamType).string_len(50).not_null())
                    .col(ColumnDef::new(ScamReports::ScammerContact).string_len(255).null())
                    .col(ColumnDef::new(ScamReports::AmountLostCents).big_integer().null())
                    .col(
                        ColumnDef::new(ScamReports::IncidentDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScamReports::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(ScamReports::ModeratorId).uuid().null())
                    .col(ColumnDef::new(ScamReports::ModeratorNotes).text().null())
                    .col(
                        ColumnDef::new(ScamReports::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ScamReports::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ScamReports::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ScamReports::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scam_reports_reporter_id")
                            .from(ScamReports::Table, ScamReports::ReporterId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 報告者ごとの一覧
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(ScamReports::Table)
                    .name("idx_scam_reports_reporter_id")
                    .col(ScamReports::ReporterId)
                    .to_owned(),
            )
            .await?;

        // モデレーション待ちの抽出
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(ScamReports::Table)
                    .name("idx_scam_reports_status_created_at")
                    .col(ScamReports::Status)
                    .col(ScamReports::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScamReports::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ScamReports {
    Table,
    Id,
    ReporterId,
    Title,
    Description,
    ScamType,
    ScammerContact,
    AmountLostCents,
    IncidentDate,
    Status,
    ModeratorId,
    ModeratorNotes,
    IsActive,
    CreatedAt,
    UpdatedAt,
    Version,
}
