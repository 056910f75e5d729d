use super::m20260901_000005_create_legal_cases_table::LegalCases;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 子レコードは案件の削除時にアプリ側でまとめて削除する（外部キーで取り残しを防ぐ）
        manager
            .create_table(
                Table::create()
                    .table(CaseDocuments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CaseDocuments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CaseDocuments::CaseId).uuid().not_null())
                    .col(ColumnDef::new(CaseDocuments::UploadedBy).uuid().not_null())
                    .col(ColumnDef::new(CaseDocuments::FileName).string_len(255).not_null())
                    .col(ColumnDef::new(CaseDocuments::FileSize).big_integer().not_null())
                    .col(ColumnDef::new(CaseDocuments::MimeType).string_len(100).not_null())
                    .col(ColumnDef::new(CaseDocuments::FileUri).string_len(2048).not_null())
                    .col(
                        ColumnDef::new(CaseDocuments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_case_documents_case_id")
                            .from(CaseDocuments::Table, CaseDocuments::CaseId)
                            .to(LegalCases::Table, LegalCases::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(CaseDocuments::Table)
                    .name("idx_case_documents_case_id")
                    .col(CaseDocuments::CaseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CaseEvidence::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CaseEvidence::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CaseEvidence::CaseId).uuid().not_null())
                    .col(ColumnDef::new(CaseEvidence::SubmittedBy).uuid().not_null())
                    .col(ColumnDef::new(CaseEvidence::FileName).string_len(255).not_null())
                    .col(ColumnDef::new(CaseEvidence::FileSize).big_integer().not_null())
                    .col(ColumnDef::new(CaseEvidence::MimeType).string_len(100).not_null())
                    .col(ColumnDef::new(CaseEvidence::FileUri).string_len(2048).not_null())
                    .col(ColumnDef::new(CaseEvidence::Description).text().null())
                    .col(
                        ColumnDef::new(CaseEvidence::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_case_evidence_case_id")
                            .from(CaseEvidence::Table, CaseEvidence::CaseId)
                            .to(LegalCases::Table, LegalCases::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(CaseEvidence::Table)
                    .name("idx_case_evidence_case_id")
                    .col(CaseEvidence::CaseId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CaseEvidence::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CaseDocuments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CaseDocuments {
    Table,
    Id,
    CaseId,
    UploadedBy,
    FileName,
    FileSize,
    MimeType,
    FileUri,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CaseEvidence {
    Table,
    Id,
    CaseId,
    SubmittedBy,
    FileName,
    FileSize,
    MimeType,
    FileUri,
    Description,
    CreatedAt,
}
