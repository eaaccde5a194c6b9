//! 导入结果

use serde::{Deserialize, Serialize};

pub const REASON_ALREADY_EXISTS: &str = "Game already exists";

/// 单条记录的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestAction {
    Created,
    Skipped,
    Failed,
}

/// 本次导入新建的球队 / 联盟数量（各 0–2）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitiesCreated {
    pub teams: u32,
    pub conferences: u32,
}

/// 单条记录的导入结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_id: Option<String>,
    pub action: IngestAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entities_created: Option<EntitiesCreated>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub message: String,
}

impl IngestionResult {
    pub fn created(game_id: String, entities_created: EntitiesCreated) -> Self {
        Self {
            success: true,
            message: format!("Game {} created", game_id),
            game_id: Some(game_id),
            action: IngestAction::Created,
            entities_created: Some(entities_created),
            reason: None,
            error: None,
        }
    }

    pub fn skipped(game_id: String) -> Self {
        Self {
            success: true,
            message: format!("Game {} already exists, skipped", game_id),
            game_id: Some(game_id),
            action: IngestAction::Skipped,
            entities_created: None,
            reason: Some(REASON_ALREADY_EXISTS.to_string()),
            error: None,
        }
    }

    pub fn failed(game_id: Option<String>, error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            success: false,
            message: format!("Failed to ingest game: {}", error),
            game_id,
            action: IngestAction::Failed,
            entities_created: None,
            reason: None,
            error: Some(error),
        }
    }
}

/// 批量导入汇总，details 与输入顺序一致
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
    pub details: Vec<IngestionResult>,
}

impl BatchSummary {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            details: Vec::with_capacity(capacity),
            ..Default::default()
        }
    }

    /// 记录一条结果并更新计数
    pub fn record(&mut self, result: IngestionResult) {
        self.total += 1;
        match result.action {
            IngestAction::Created => self.successful += 1,
            IngestAction::Skipped => self.skipped += 1,
            IngestAction::Failed => self.failed += 1,
        }
        self.details.push(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skipped_result_serializes_reason_without_counts() {
        let value = serde_json::to_value(IngestionResult::skipped("ncaa-1".to_string())).unwrap();
        assert_eq!(value["action"], "skipped");
        assert_eq!(value["success"], true);
        assert_eq!(value["reason"], REASON_ALREADY_EXISTS);
        assert!(value.get("entities_created").is_none());
        assert!(value.get("error").is_none());
    }

    #[test]
    fn summary_counts_each_action() {
        let mut summary = BatchSummary::with_capacity(3);
        summary.record(IngestionResult::created("a".into(), EntitiesCreated::default()));
        summary.record(IngestionResult::skipped("b".into()));
        summary.record(IngestionResult::failed(None, "boom"));

        assert_eq!(
            (summary.total, summary.successful, summary.skipped, summary.failed),
            (3, 1, 1, 1)
        );
        assert_eq!(summary.details[2].error.as_deref(), Some("boom"));
    }
}
