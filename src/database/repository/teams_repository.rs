//! 球队数据仓库
//!
//! 按自然键查找或创建球队。查找与创建本身不开启事务，由调用方决定事务范围；
//! 同一自然键的并发创建不在此处防护。

use crate::database::dto::{NaturalKey, Resolved, TeamParams};
use crate::entity::prelude::*;
use crate::entity::teams;
use sea_orm::*;

/// 球队数据仓库
pub struct TeamsRepository;

impl TeamsRepository {
    /// 按自然键查找球队，gender 为空时只匹配 gender 为 NULL 的记录
    pub async fn find_by_natural_key<C>(
        db: &C,
        key: &NaturalKey,
    ) -> Result<Option<teams::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        let gender = match &key.gender {
            Some(gender) => teams::Column::Gender.eq(gender.as_str()),
            None => teams::Column::Gender.is_null(),
        };

        Teams::find()
            .filter(
                Condition::all()
                    .add(teams::Column::Name.eq(key.name.as_str()))
                    .add(teams::Column::Sport.eq(key.sport.as_str()))
                    .add(teams::Column::Division.eq(key.division.as_str()))
                    .add(gender),
            )
            .order_by_asc(teams::Column::Id)
            .one(db)
            .await
    }

    /// 创建球队
    pub async fn insert<C>(db: &C, params: TeamParams, level: &str) -> Result<teams::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = chrono::Utc::now().timestamp();

        let team = teams::ActiveModel {
            id: NotSet,
            name: Set(params.key.name),
            sport: Set(params.key.sport),
            division: Set(params.key.division),
            gender: Set(params.key.gender),
            level: Set(level.to_string()),
            conference: Set(params.conference),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
        };

        team.insert(db).await
    }

    /// 查找或创建球队
    pub async fn find_or_create<C>(
        db: &C,
        params: TeamParams,
        level: &str,
    ) -> Result<Resolved<teams::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        if let Some(existing) = Self::find_by_natural_key(db, &params.key).await? {
            return Ok(Resolved::found(existing));
        }

        let team = Self::insert(db, params, level).await?;
        log::debug!("新建球队: {} ({})", team.name, team.id);
        Ok(Resolved::created(team))
    }

    /// 根据主键查询
    pub async fn find_by_id<C>(db: &C, id: i32) -> Result<Option<teams::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Teams::find_by_id(id).one(db).await
    }

    /// 获取球队总数
    pub async fn count<C>(db: &C) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        Teams::find().count(db).await
    }
}
