use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, RuntimeErr};
use std::fs;
use std::time::Duration;
use url::Url;

use crate::config::DatabaseConfig;

/// 解析连接字符串：优先使用配置中的 URL，否则指向数据目录下的 SQLite 文件
pub fn resolve_database_url(config: &DatabaseConfig) -> Result<String, DbErr> {
    if let Some(url) = config.url.as_deref().filter(|url| !url.trim().is_empty()) {
        return Ok(url.to_string());
    }

    // 1. 获取数据库路径（自动判断便携模式）
    let db_path = ingest_path::get_db_path().map_err(|e| DbErr::Conn(RuntimeErr::Internal(e)))?;

    // 2. 如果数据库不存在，创建目录
    if !db_path.exists() {
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                DbErr::Conn(RuntimeErr::Internal(format!("无法创建数据库目录: {}", e)))
            })?;
        }
        log::info!("首次启动，创建数据库: {}", db_path.display());
    } else {
        log::info!("使用数据库: {}", db_path.display());
    }

    // 3. 使用 `url` crate 安全地构建连接字符串
    let db_url = Url::from_file_path(&db_path).map_err(|_| {
        DbErr::Conn(RuntimeErr::Internal(format!(
            "Invalid database path: {}",
            db_path.display()
        )))
    })?;

    Ok(format!("sqlite:{}?mode=rwc", db_url.path()))
}

/// Establish a SeaORM database connection.
pub async fn establish_connection(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let connection_string = resolve_database_url(config)?;

    let mut options = ConnectOptions::new(connection_string);
    options
        .max_connections(config.max_connections.max(1))
        .min_connections(config.min_connections.min(config.max_connections.max(1)))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .sqlx_logging(false);

    Database::connect(options).await
}

/// 关闭数据库连接
pub async fn close_connection(conn: DatabaseConnection) -> Result<(), DbErr> {
    conn.close().await?;
    Ok(())
}
