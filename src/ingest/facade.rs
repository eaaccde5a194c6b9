//! 导入流程依赖的协作者接口
//!
//! 流程只依赖这些 trait，具体实现（SeaORM 适配器或测试替身）在组合根注入。

use async_trait::async_trait;
use sea_orm::{DatabaseTransaction, DbErr};

use crate::database::dto::{ConferenceParams, InsertGameData, Resolved, TeamParams};
use crate::entity::{conferences, games, teams};

/// 比赛存储
#[async_trait]
pub trait GamesFacade: Send + Sync {
    /// 按比赛标识查询，不存在时返回 `None`
    async fn get_by_identifier(&self, game_id: &str) -> Result<Option<games::Model>, DbErr>;

    /// 在调用方提供的事务中创建比赛
    async fn create(
        &self,
        txn: &DatabaseTransaction,
        game: InsertGameData,
    ) -> Result<games::Model, DbErr>;
}

/// 球队查找或创建
#[async_trait]
pub trait TeamsFacade: Send + Sync {
    async fn find_or_create(&self, params: TeamParams) -> Result<Resolved<teams::Model>, DbErr>;
}

/// 联盟查找或创建
#[async_trait]
pub trait ConferencesFacade: Send + Sync {
    async fn find_or_create(
        &self,
        params: ConferenceParams,
    ) -> Result<Resolved<conferences::Model>, DbErr>;
}
