//! 配置
//!
//! 优先级：命令行参数 > 环境变量 > JSON 配置文件 > 默认值。

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

pub const ENV_DATABASE_URL: &str = "NCAA_INGEST_DATABASE_URL";
pub const ENV_LOG_LEVEL: &str = "NCAA_INGEST_LOG_LEVEL";

/// 顶层配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub database: DatabaseConfig,
    pub ingestion: IngestionConfig,
    pub log_level: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            ingestion: IngestionConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

/// 数据库连接配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// 为空时使用数据目录下的 SQLite 文件
    pub url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        // 本地 SQLite，连接池大小为 1 即可
        Self {
            url: None,
            max_connections: 1,
            min_connections: 1,
            connect_timeout_secs: 8,
        }
    }
}

/// 导入流程配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// 新建球队 / 联盟的默认 level
    pub default_level: String,
    /// 写入 games.data_source 的来源标记
    pub data_source: String,
    /// 记录未提供状态时使用
    pub default_status: String,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            default_level: "college".to_string(),
            data_source: "ncaa".to_string(),
            default_status: "scheduled".to_string(),
        }
    }
}

impl IngestConfig {
    /// 读取配置文件（可选）并应用环境变量覆盖
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            IngestError::Config(format!("无法读取配置文件 {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| IngestError::Config(format!("配置格式错误: {}", e)))
    }

    fn apply_env(&mut self) {
        if let Some(url) = non_empty_env(ENV_DATABASE_URL) {
            self.database.url = Some(url);
        }
        if let Some(level) = non_empty_env(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
