//! SQLite in-memory TestDatabase helper for SeaORM.

use migration::Migrator;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;

pub struct TestDatabase {
    pub connection: DatabaseConnection,
}

impl TestDatabase {
    pub async fn new() -> Self {
        // インメモリDBは接続ごとに別物になるため接続は一本に固定する
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false); // テスト時のログ出力を減らす

        let connection = Database::connect(opt).await.unwrap();

        // マイグレーションを実行
        Migrator::up(&connection, None).await.unwrap();

        Self { connection }
    }
}
