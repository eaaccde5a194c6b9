use crate::database::dto::{ConferenceParams, NaturalKey, Resolved};
use crate::entity::conferences;
use crate::entity::prelude::*;
use sea_orm::*;

/// 联盟数据仓库
pub struct ConferencesRepository;

impl ConferencesRepository {
    /// 按自然键查找联盟
    pub async fn find_by_natural_key<C>(
        db: &C,
        key: &NaturalKey,
    ) -> Result<Option<conferences::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        let gender = match &key.gender {
            Some(gender) => conferences::Column::Gender.eq(gender.as_str()),
            None => conferences::Column::Gender.is_null(),
        };

        Conferences::find()
            .filter(
                Condition::all()
                    .add(conferences::Column::Name.eq(key.name.as_str()))
                    .add(conferences::Column::Sport.eq(key.sport.as_str()))
                    .add(conferences::Column::Division.eq(key.division.as_str()))
                    .add(gender),
            )
            .order_by_asc(conferences::Column::Id)
            .one(db)
            .await
    }

    /// 创建联盟
    pub async fn insert<C>(
        db: &C,
        params: ConferenceParams,
        level: &str,
    ) -> Result<conferences::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = chrono::Utc::now().timestamp();

        let conference = conferences::ActiveModel {
            id: NotSet,
            name: Set(params.key.name),
            sport: Set(params.key.sport),
            division: Set(params.key.division),
            gender: Set(params.key.gender),
            level: Set(level.to_string()),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
        };

        conference.insert(db).await
    }

    /// 查找或创建联盟
    pub async fn find_or_create<C>(
        db: &C,
        params: ConferenceParams,
        level: &str,
    ) -> Result<Resolved<conferences::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        if let Some(existing) = Self::find_by_natural_key(db, &params.key).await? {
            return Ok(Resolved::found(existing));
        }

        let conference = Self::insert(db, params, level).await?;
        log::debug!("新建联盟: {} ({})", conference.name, conference.id);
        Ok(Resolved::created(conference))
    }

    /// 获取联盟总数
    pub async fn count<C>(db: &C) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        Conferences::find().count(db).await
    }
}
