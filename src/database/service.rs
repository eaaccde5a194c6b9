//! 仓库适配层
//!
//! 将 SeaORM 仓库包装为导入流程依赖的协作者接口（见 `crate::ingest::facade`）。

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr};

use crate::database::dto::{ConferenceParams, InsertGameData, Resolved, TeamParams};
use crate::database::repository::{
    conferences_repository::ConferencesRepository, games_repository::GamesRepository,
    teams_repository::TeamsRepository,
};
use crate::entity::{conferences, games, teams};
use crate::ingest::facade::{ConferencesFacade, GamesFacade, TeamsFacade};

// ==================== 比赛 ====================

pub struct GamesService {
    db: DatabaseConnection,
}

impl GamesService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GamesFacade for GamesService {
    async fn get_by_identifier(&self, game_id: &str) -> Result<Option<games::Model>, DbErr> {
        GamesRepository::find_by_game_id(&self.db, game_id).await
    }

    async fn create(
        &self,
        txn: &DatabaseTransaction,
        game: InsertGameData,
    ) -> Result<games::Model, DbErr> {
        GamesRepository::insert(txn, game).await
    }
}

// ==================== 球队 ====================

pub struct TeamsService {
    db: DatabaseConnection,
    default_level: String,
}

impl TeamsService {
    pub fn new(db: DatabaseConnection, default_level: impl Into<String>) -> Self {
        Self {
            db,
            default_level: default_level.into(),
        }
    }
}

#[async_trait]
impl TeamsFacade for TeamsService {
    async fn find_or_create(&self, params: TeamParams) -> Result<Resolved<teams::Model>, DbErr> {
        TeamsRepository::find_or_create(&self.db, params, &self.default_level).await
    }
}

// ==================== 联盟 ====================

pub struct ConferencesService {
    db: DatabaseConnection,
    default_level: String,
}

impl ConferencesService {
    pub fn new(db: DatabaseConnection, default_level: impl Into<String>) -> Self {
        Self {
            db,
            default_level: default_level.into(),
        }
    }
}

#[async_trait]
impl ConferencesFacade for ConferencesService {
    async fn find_or_create(
        &self,
        params: ConferenceParams,
    ) -> Result<Resolved<conferences::Model>, DbErr> {
        ConferencesRepository::find_or_create(&self.db, params, &self.default_level).await
    }
}
