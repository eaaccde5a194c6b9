//! 比赛数据仓库
//!
//! 只负责 games 表的读写；幂等判断与事务边界由导入流程决定，
//! 因此所有方法都对连接类型泛型，既可以在连接池上调用，也可以在事务内调用。

use crate::database::dto::InsertGameData;
use crate::entity::games;
use crate::entity::prelude::*;
use sea_orm::*;

/// 比赛数据仓库
pub struct GamesRepository;

impl GamesRepository {
    // ==================== 写入操作 ====================

    /// 插入比赛数据
    ///
    /// game_id 上有唯一约束，重复插入会返回唯一约束冲突错误
    pub async fn insert<C>(db: &C, game: InsertGameData) -> Result<games::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = chrono::Utc::now().timestamp();

        let game_active = games::ActiveModel {
            id: NotSet,
            game_id: Set(game.game_id),
            date: Set(game.date),
            sport: Set(game.sport),
            division: Set(game.division),
            gender: Set(game.gender),
            home_team_id: Set(game.home_team_id),
            away_team_id: Set(game.away_team_id),
            home_conference_id: Set(game.home_conference_id),
            away_conference_id: Set(game.away_conference_id),
            home_score: Set(game.home_score),
            away_score: Set(game.away_score),
            status: Set(game.status),
            start_time: Set(game.start_time),
            venue: Set(game.venue),
            data_source: Set(game.data_source),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
        };

        game_active.insert(db).await
    }

    // ==================== 查询操作 ====================

    /// 根据比赛标识查询
    pub async fn find_by_game_id<C>(db: &C, game_id: &str) -> Result<Option<games::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Games::find()
            .filter(games::Column::GameId.eq(game_id))
            .one(db)
            .await
    }

    /// 获取比赛总数
    pub async fn count<C>(db: &C) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        Games::find().count(db).await
    }
}
