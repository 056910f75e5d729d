// migration/src/lib.rs
pub use sea_orm_migration::prelude::*;

// ユーザー
mod m20260901_000001_create_users_table;

// モデレーション対象レコード
mod m20260901_000002_create_scam_reports_table;
mod m20260901_000003_create_scam_alerts_table;
mod m20260901_000004_create_alert_comments_table;
mod m20260901_000005_create_legal_cases_table;
mod m20260901_000006_create_case_files_tables;
mod m20260901_000007_create_role_change_requests_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            // 1. 基本テーブル作成（依存関係なし）
            Box::new(m20260901_000001_create_users_table::Migration),
            // 2. usersテーブルに依存
            Box::new(m20260901_000002_create_scam_reports_table::Migration),
            // 3. アラートとコメント
            Box::new(m20260901_000003_create_scam_alerts_table::Migration),
            Box::new(m20260901_000004_create_alert_comments_table::Migration),
            // 4. 案件と子レコード
            Box::new(m20260901_000005_create_legal_cases_table::Migration),
            Box::new(m20260901_000006_create_case_files_tables::Migration),
            // 5. ロール変更申請（部分ユニークインデックス付き）
            Box::new(m20260901_000007_create_role_change_requests_table::Migration),
        ]
    }
}
