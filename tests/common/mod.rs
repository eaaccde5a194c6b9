#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use migration::MigratorTrait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr};

use ncaa_ingest_lib::config::{DatabaseConfig, IngestionConfig};
use ncaa_ingest_lib::database::connection::establish_connection;
use ncaa_ingest_lib::database::dto::{
    ConferenceParams, GameRecord, InsertGameData, NaturalKey, Resolved, TeamParams,
};
use ncaa_ingest_lib::database::transaction::TransactionManager;
use ncaa_ingest_lib::database::{ConferencesService, GamesService, TeamsService};
use ncaa_ingest_lib::entity::{conferences, games, teams};
use ncaa_ingest_lib::ingest::IngestionService;
use ncaa_ingest_lib::ingest::facade::{ConferencesFacade, GamesFacade, TeamsFacade};
use ncaa_ingest_lib::ingest::validator::StandardValidator;

/// 内存 SQLite（连接池内共享），已执行迁移
pub async fn setup_db() -> DatabaseConnection {
    let config = DatabaseConfig {
        url: Some("sqlite::memory:".to_string()),
        max_connections: 4,
        min_connections: 1,
        connect_timeout_secs: 8,
    };
    let db = establish_connection(&config).await.expect("connect");
    migration::Migrator::up(&db, None).await.expect("migrate");
    db
}

pub fn record(home: &str, away: &str, date: &str) -> GameRecord {
    GameRecord {
        home_team: home.to_string(),
        away_team: away.to_string(),
        sport: "basketball".to_string(),
        division: "d1".to_string(),
        date: date.to_string(),
        ..Default::default()
    }
}

pub fn team_params(name: &str) -> TeamParams {
    TeamParams {
        key: NaturalKey {
            name: name.to_string(),
            sport: "basketball".to_string(),
            division: "d1".to_string(),
            gender: None,
        },
        conference: None,
    }
}

/// 使用真实适配器装配服务
pub fn service(db: &DatabaseConnection) -> IngestionService {
    service_with(
        db,
        Arc::new(GamesService::new(db.clone())),
        Arc::new(TeamsService::new(db.clone(), "college")),
        Arc::new(ConferencesService::new(db.clone(), "college")),
    )
}

pub fn service_with(
    db: &DatabaseConnection,
    games: Arc<dyn GamesFacade>,
    teams: Arc<dyn TeamsFacade>,
    conferences: Arc<dyn ConferencesFacade>,
) -> IngestionService {
    IngestionService::new(
        games,
        teams,
        conferences,
        Arc::new(StandardValidator),
        Arc::new(TransactionManager::new(db.clone())),
        &IngestionConfig::default(),
    )
}

// ==================== 测试替身 ====================

/// 统计调用次数的联盟解析
pub struct CountingConferences {
    pub inner: ConferencesService,
    pub calls: AtomicUsize,
}

impl CountingConferences {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self {
            inner: ConferencesService::new(db.clone(), "college"),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConferencesFacade for CountingConferences {
    async fn find_or_create(
        &self,
        params: ConferenceParams,
    ) -> Result<Resolved<conferences::Model>, DbErr> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_or_create(params).await
    }
}

/// 写入成功后强制失败，用于验证事务回滚
pub struct FailAfterInsertGames {
    pub inner: GamesService,
}

#[async_trait]
impl GamesFacade for FailAfterInsertGames {
    async fn get_by_identifier(&self, game_id: &str) -> Result<Option<games::Model>, DbErr> {
        self.inner.get_by_identifier(game_id).await
    }

    async fn create(
        &self,
        txn: &DatabaseTransaction,
        game: InsertGameData,
    ) -> Result<games::Model, DbErr> {
        self.inner.create(txn, game).await?;
        Err(DbErr::Custom("forced failure after insert".to_string()))
    }
}

/// 存在性检查永远未命中，模拟并发导入的竞争窗口
pub struct StaleGames {
    pub inner: GamesService,
}

#[async_trait]
impl GamesFacade for StaleGames {
    async fn get_by_identifier(&self, _game_id: &str) -> Result<Option<games::Model>, DbErr> {
        Ok(None)
    }

    async fn create(
        &self,
        txn: &DatabaseTransaction,
        game: InsertGameData,
    ) -> Result<games::Model, DbErr> {
        self.inner.create(txn, game).await
    }
}

/// 球队存储不可用
pub struct UnavailableTeams;

#[async_trait]
impl TeamsFacade for UnavailableTeams {
    async fn find_or_create(&self, _params: TeamParams) -> Result<Resolved<teams::Model>, DbErr> {
        Err(DbErr::Custom("team store unavailable".to_string()))
    }
}
