pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod ingest;
pub mod utils;

use std::path::PathBuf;
use std::sync::Arc;

use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use serde_json::Value;

use config::IngestConfig;
use database::transaction::TransactionManager;
use database::{ConferencesService, GamesService, TeamsService};
use ingest::validator::StandardValidator;

pub use error::{IngestError, Result};
pub use ingest::{BatchSummary, IngestAction, IngestionResult, IngestionService};

/// 运行时组件：数据库连接与导入服务
pub struct App {
    pub db: DatabaseConnection,
    pub service: IngestionService,
}

/// 组合根：建立连接、执行迁移并装配导入服务
pub async fn bootstrap(config: &IngestConfig) -> Result<App> {
    let db = database::connection::establish_connection(&config.database).await?;
    log::info!("数据库连接建立成功");

    log::info!("开始执行数据库迁移...");
    migration::Migrator::up(&db, None).await?;
    log::info!("数据库迁移完成");

    Ok(App {
        service: build_service(db.clone(), config),
        db,
    })
}

/// 用给定连接装配导入服务（不执行迁移）
pub fn build_service(db: DatabaseConnection, config: &IngestConfig) -> IngestionService {
    let level = &config.ingestion.default_level;
    IngestionService::new(
        Arc::new(GamesService::new(db.clone())),
        Arc::new(TeamsService::new(db.clone(), level.as_str())),
        Arc::new(ConferencesService::new(db.clone(), level.as_str())),
        Arc::new(StandardValidator),
        Arc::new(TransactionManager::new(db)),
        &config.ingestion,
    )
}

impl App {
    /// 导入 JSON 输入：对象按单条记录处理，其余按批量处理
    pub async fn ingest_value(&self, input: Value) -> Result<Value> {
        let output = match input {
            Value::Object(_) => {
                let result = match serde_json::from_value(input) {
                    Ok(record) => self.service.ingest_game(record).await,
                    Err(err) => {
                        IngestionResult::failed(None, format!("Invalid game record: {}", err))
                    }
                };
                serde_json::to_value(result)?
            }
            other => serde_json::to_value(self.service.ingest_games_value(other).await?)?,
        };
        Ok(output)
    }

    /// 回滚遗留事务并关闭数据库连接
    pub async fn shutdown(self) -> Result<()> {
        self.service.transactions().force_rollback_all().await;
        database::connection::close_connection(self.db).await?;
        log::info!("数据库连接已成功关闭");
        Ok(())
    }
}

/// 命令行入口使用的参数
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config: Option<PathBuf>,
    pub database_url: Option<String>,
    pub log_level: Option<String>,
    pub input: PathBuf,
}

/// 读取输入文件并导入，返回输出 JSON
pub async fn run(options: RunOptions) -> Result<Value> {
    let mut config = IngestConfig::load(options.config.as_deref())?;
    if let Some(url) = options.database_url {
        config.database.url = Some(url);
    }
    if let Some(level) = options.log_level {
        config.log_level = level;
    }
    utils::logs::init_logging(&config.log_level).map_err(IngestError::Config)?;

    let raw = tokio::fs::read_to_string(&options.input).await?;
    let input: Value = serde_json::from_str(&raw)?;

    let app = bootstrap(&config).await?;
    let outcome = app.ingest_value(input).await;
    app.shutdown().await?;
    outcome
}
