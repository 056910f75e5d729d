use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LegalCases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LegalCases::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LegalCases::OfficerId).uuid().not_null())
                    .col(
                        ColumnDef::new(LegalCases::CaseNumber)
                            .string_len(40)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(LegalCases::Title).string_len(200).not_null())
                    .col(ColumnDef::new(LegalCases::Description).text().not_null())
                    .col(ColumnDef::new(LegalCases::VictimName).string_len(200).null())
                    .col(
                        ColumnDef::new(LegalCases::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(LegalCases::ModeratorId).uuid().null())
                    .col(ColumnDef::new(LegalCases::ModeratorNotes).text().null())
                    .col(
                        ColumnDef::new(LegalCases::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(LegalCases::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(LegalCases::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(LegalCases::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(LegalCases::Table)
                    .name("idx_legal_cases_officer_id")
                    .col(LegalCases::OfficerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(LegalCases::Table)
                    .name("idx_legal_cases_status")
                    .col(LegalCases::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LegalCases::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum LegalCases {
    Table,
    Id,
    OfficerId,
    CaseNumber,
    Title,
    Description,
    VictimName,
    Status,
    ModeratorId,
    ModeratorNotes,
    IsActive,
    CreatedAt,
    UpdatedAt,
    Version,
}
