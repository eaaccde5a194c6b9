//! 导入编排
//!
//! 单条记录的处理顺序固定为：校验 → 派生标识 → 存在性检查 → 解析球队与联盟 → 事务内创建。
//! 单条记录的任何错误都转换为 `failed` 结果，不会向调用方抛出。

use std::sync::Arc;

use serde_json::Value;

use crate::config::IngestionConfig;
use crate::database::dto::{
    ConferenceParams, GameRecord, InsertGameData, NaturalKey, Resolved, TeamParams,
};
use crate::database::transaction::TransactionManager;
use crate::entity::{conferences, teams};
use crate::error::{IngestError, Result};
use crate::ingest::facade::{ConferencesFacade, GamesFacade, TeamsFacade};
use crate::ingest::identifier::derive_identifier;
use crate::ingest::result::{BatchSummary, EntitiesCreated, IngestionResult};
use crate::ingest::validator::RecordValidator;

/// 幂等导入服务
pub struct IngestionService {
    games: Arc<dyn GamesFacade>,
    teams: Arc<dyn TeamsFacade>,
    conferences: Arc<dyn ConferencesFacade>,
    validator: Arc<dyn RecordValidator>,
    transactions: Arc<TransactionManager>,
    data_source: String,
    default_status: String,
}

/// 主客场联盟的解析结果
struct ConferencePair {
    home: Option<conferences::Model>,
    away: Option<conferences::Model>,
    created: u32,
}

impl IngestionService {
    pub fn new(
        games: Arc<dyn GamesFacade>,
        teams: Arc<dyn TeamsFacade>,
        conferences: Arc<dyn ConferencesFacade>,
        validator: Arc<dyn RecordValidator>,
        transactions: Arc<TransactionManager>,
        config: &IngestionConfig,
    ) -> Self {
        Self {
            games,
            teams,
            conferences,
            validator,
            transactions,
            data_source: config.data_source.clone(),
            default_status: config.default_status.clone(),
        }
    }

    pub fn transactions(&self) -> &Arc<TransactionManager> {
        &self.transactions
    }

    // ==================== 单条导入 ====================

    /// 导入单条比赛记录
    pub async fn ingest_game(&self, record: GameRecord) -> IngestionResult {
        let game_id = match prepare_record(self.validator.as_ref(), &record) {
            Ok(game_id) => game_id,
            Err(err) => {
                log::debug!("记录校验失败: {}", err);
                return IngestionResult::failed(None, err.to_string());
            }
        };

        match self.ingest_validated(&record, &game_id).await {
            Ok(result) => result,
            Err(err) => {
                log::error!("导入比赛 {} 失败: {}", game_id, err);
                IngestionResult::failed(Some(game_id), err.to_string())
            }
        }
    }

    async fn ingest_validated(
        &self,
        record: &GameRecord,
        game_id: &str,
    ) -> Result<IngestionResult> {
        if let Some(existing) = self.games.get_by_identifier(game_id).await? {
            log::debug!("比赛 {} 已存在，跳过", existing.game_id);
            return Ok(IngestionResult::skipped(existing.game_id));
        }

        let mut created = EntitiesCreated::default();

        let home_team = self
            .resolve_team(&record.home_team, record.home_conference.as_deref(), record)
            .await?;
        let away_team = self
            .resolve_team(&record.away_team, record.away_conference.as_deref(), record)
            .await?;
        created.teams = u32::from(home_team.created) + u32::from(away_team.created);

        let conferences = self.resolve_conferences(record).await?;
        created.conferences = conferences.created;

        let data = InsertGameData {
            game_id: game_id.to_string(),
            date: record.date.clone(),
            sport: record.sport.clone(),
            division: record.division.clone(),
            gender: record.gender.clone(),
            home_team_id: home_team.entity.id,
            away_team_id: away_team.entity.id,
            home_conference_id: conferences.home.as_ref().map(|c| c.id),
            away_conference_id: conferences.away.as_ref().map(|c| c.id),
            home_score: record.home_score,
            away_score: record.away_score,
            status: record
                .status
                .clone()
                .filter(|status| !status.trim().is_empty())
                .unwrap_or_else(|| self.default_status.clone()),
            start_time: record.start_time.clone(),
            venue: record.venue.clone(),
            data_source: self.data_source.clone(),
        };

        let games = Arc::clone(&self.games);
        let outcome = self
            .transactions
            .execute_in_transaction(move |txn, _sequence| {
                Box::pin(async move { games.create(txn, data).await.map_err(IngestError::from) })
            })
            .await;

        match outcome {
            Ok(game) => {
                log::info!(
                    "新建比赛 {}（新球队 {}，新联盟 {}）",
                    game.game_id,
                    created.teams,
                    created.conferences
                );
                Ok(IngestionResult::created(game.game_id, created))
            }
            // 并发导入同一场比赛：存在性检查均未命中，败者在唯一约束处冲突
            Err(err) if err.is_unique_violation() => {
                log::warn!("比赛 {} 创建时发生唯一约束冲突，视为已存在", game_id);
                Ok(IngestionResult::skipped(game_id.to_string()))
            }
            Err(err) => Err(err),
        }
    }

    async fn resolve_team(
        &self,
        name: &str,
        conference: Option<&str>,
        record: &GameRecord,
    ) -> Result<Resolved<teams::Model>> {
        let params = TeamParams {
            key: NaturalKey::for_record(name, record),
            conference: non_blank(conference).map(str::to_string),
        };

        self.teams
            .find_or_create(params)
            .await
            .map_err(|source| IngestError::EntityResolution {
                entity: "team",
                name: name.to_string(),
                source,
            })
    }

    /// 解析主客场联盟，名称相同时只解析一次
    async fn resolve_conferences(&self, record: &GameRecord) -> Result<ConferencePair> {
        let home_name = non_blank(record.home_conference.as_deref());
        let away_name = non_blank(record.away_conference.as_deref());

        let mut pair = ConferencePair {
            home: None,
            away: None,
            created: 0,
        };

        if let Some(name) = home_name {
            let resolved = self.resolve_conference(name, record).await?;
            pair.created += u32::from(resolved.created);
            pair.home = Some(resolved.entity);
        }

        if let Some(name) = away_name {
            if home_name == Some(name) {
                pair.away = pair.home.clone();
            } else {
                let resolved = self.resolve_conference(name, record).await?;
                pair.created += u32::from(resolved.created);
                pair.away = Some(resolved.entity);
            }
        }

        Ok(pair)
    }

    async fn resolve_conference(
        &self,
        name: &str,
        record: &GameRecord,
    ) -> Result<Resolved<conferences::Model>> {
        let params = ConferenceParams {
            key: NaturalKey::for_record(name, record),
        };

        self.conferences
            .find_or_create(params)
            .await
            .map_err(|source| IngestError::EntityResolution {
                entity: "conference",
                name: name.to_string(),
                source,
            })
    }

    // ==================== 批量导入 ====================

    /// 逐条导入，每条记录相互独立，结果顺序与输入一致
    pub async fn ingest_games(&self, records: Vec<GameRecord>) -> BatchSummary {
        let mut summary = BatchSummary::with_capacity(records.len());
        for record in records {
            summary.record(self.ingest_game(record).await);
        }
        log_summary(&summary);
        summary
    }

    /// 从未定型的 JSON 导入
    ///
    /// 输入不是数组时直接返回 [`IngestError::InputShape`]；
    /// 无法解析为比赛记录的元素作为该条记录的失败结果。
    pub async fn ingest_games_value(&self, input: Value) -> Result<BatchSummary> {
        let Value::Array(items) = input else {
            return Err(IngestError::InputShape(json_kind(&input).to_string()));
        };

        let mut summary = BatchSummary::with_capacity(items.len());
        for item in items {
            let result = match serde_json::from_value::<GameRecord>(item) {
                Ok(record) => self.ingest_game(record).await,
                Err(err) => IngestionResult::failed(None, format!("Invalid game record: {}", err)),
            };
            summary.record(result);
        }
        log_summary(&summary);
        Ok(summary)
    }
}

/// 校验记录并派生比赛标识
fn prepare_record(validator: &dyn RecordValidator, record: &GameRecord) -> Result<String> {
    validator.validate(record)?;
    Ok(derive_identifier(record))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn log_summary(summary: &BatchSummary) {
    log::info!(
        "批量导入完成：共 {} 条，新建 {}，跳过 {}，失败 {}",
        summary.total,
        summary.successful,
        summary.skipped,
        summary.failed
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::validator::{StandardValidator, ValidationError};

    fn record() -> GameRecord {
        GameRecord {
            home_team: "Duke".to_string(),
            away_team: "UNC".to_string(),
            sport: "basketball".to_string(),
            division: "d1".to_string(),
            date: "2024-01-15".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn prepare_record_derives_identifier() {
        assert_eq!(
            prepare_record(&StandardValidator, &record()).unwrap(),
            "ncaa-basketball-d1-20240115-duke-vs-unc"
        );
    }

    #[test]
    fn prepare_record_surfaces_validation_error() {
        let mut game = record();
        game.home_team = "  ".to_string();

        let err = prepare_record(&StandardValidator, &game).unwrap_err();
        assert!(matches!(
            err,
            IngestError::Validation(ValidationError::MissingField("home_team"))
        ));
        assert_eq!(err.to_string(), "Missing required field: home_team");
    }

    #[test]
    fn json_kind_names_each_variant() {
        assert_eq!(json_kind(&Value::Null), "null");
        assert_eq!(json_kind(&serde_json::json!({})), "object");
        assert_eq!(json_kind(&serde_json::json!([1])), "array");
    }
}
