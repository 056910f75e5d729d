// scamwatch-backend/src/main.rs
use migration::{Migrator, MigratorTrait};
use scamwatch_backend::config::Config;
use scamwatch_backend::db::create_db_pool;
use scamwatch_backend::logging::init_tracing;
use scamwatch_backend::service::policy_facade::PolicyFacade;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 設定を読み込む
    let app_config = Config::from_env()?;

    // トレーシングの設定
    init_tracing(&app_config.log_filter);

    tracing::info!("Starting Scamwatch backend core...");
    tracing::info!(
        schema = ?app_config.db_schema,
        max_connections = app_config.db_max_connections,
        "Configuration loaded"
    );

    // データベース接続を作成
    let db_pool = create_db_pool(&app_config).await?;
    tracing::info!("Database pool created successfully.");

    if app_config.run_migrations {
        Migrator::up(&db_pool, None).await?;
        tracing::info!("Database migrations applied.");
    }

    // コアの組み立て（トランスポート層はこのファサード越しに呼び出す）
    let _facade = PolicyFacade::from_db(db_pool.clone());
    tracing::info!("Scamwatch core ready");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down.");
    db_pool.close().await?;

    Ok(())
}
