//! 错误类型定义

use sea_orm::{DbErr, SqlErr};

use crate::database::transaction::TransactionError;
use crate::ingest::validator::ValidationError;

/// 导入流程的统一结果类型
pub type Result<T> = std::result::Result<T, IngestError>;

/// 导入流程的顶层错误
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to resolve {entity} '{name}': {source}")]
    EntityResolution {
        entity: &'static str,
        name: String,
        #[source]
        source: DbErr,
    },

    #[error("Database error: {0}")]
    Store(#[from] DbErr),

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error("Expected an array of game records, got {0}")]
    InputShape(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IngestError {
    /// 是否为写入时的唯一约束冲突（并发导入同一场比赛时出现）
    pub fn is_unique_violation(&self) -> bool {
        match self {
            IngestError::Store(err) => {
                matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
            }
            _ => false,
        }
    }
}
