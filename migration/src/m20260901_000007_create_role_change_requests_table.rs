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
                    .table(RoleChangeRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RoleChangeRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RoleChangeRequests::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(RoleChangeRequests::RequestedRole)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(RoleChangeRequests::Reason).text().not_null())
                    .col(
                        ColumnDef::new(RoleChangeRequests::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(RoleChangeRequests::ModeratorId).uuid().null())
                    .col(ColumnDef::new(RoleChangeRequests::ModeratorNotes).text().null())
                    .col(
                        ColumnDef::new(RoleChangeRequests::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(RoleChangeRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(RoleChangeRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(RoleChangeRequests::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_change_requests_user_id")
                            .from(RoleChangeRequests::Table, RoleChangeRequests::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ユーザーごとに pending の申請は一件まで（部分インデックス）
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_role_change_requests_single_pending \
                 ON role_change_requests (user_id) WHERE status = 'pending'",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP INDEX IF EXISTS idx_role_change_requests_single_pending")
            .await?;

        manager
            .drop_table(Table::drop().table(RoleChangeRequests::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum RoleChangeRequests {
    Table,
    Id,
    UserId,
    RequestedRole,
    Reason,
    Status,
    ModeratorId,
    ModeratorNotes,
    IsActive,
    CreatedAt,
    UpdatedAt,
    Version,
}
