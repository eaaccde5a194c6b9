//! 比赛数据实体
//!
//! game_id 为派生（或来自数据源）的稳定标识，带唯一约束，是幂等导入的依据。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    // === 标识 ===
    #[sea_orm(column_type = "Text", unique)]
    pub game_id: String,
    #[sea_orm(column_type = "Text")]
    pub date: String,

    // === 赛事分类 ===
    #[sea_orm(column_type = "Text")]
    pub sport: String,
    #[sea_orm(column_type = "Text")]
    pub division: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub gender: Option<String>,

    // === 关联 ===
    pub home_team_id: i32,
    pub away_team_id: i32,
    pub home_conference_id: Option<i32>,
    pub away_conference_id: Option<i32>,

    // === 比分与状态 ===
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    #[sea_orm(column_type = "Text")]
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub start_time: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub venue: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub data_source: String,

    // === 时间戳 ===
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teams::Entity",
        from = "Column::HomeTeamId",
        to = "super::teams::Column::Id"
    )]
    HomeTeam,
    #[sea_orm(
        belongs_to = "super::teams::Entity",
        from = "Column::AwayTeamId",
        to = "super::teams::Column::Id"
    )]
    AwayTeam,
    #[sea_orm(
        belongs_to = "super::conferences::Entity",
        from = "Column::HomeConferenceId",
        to = "super::conferences::Column::Id"
    )]
    HomeConference,
    #[sea_orm(
        belongs_to = "super::conferences::Entity",
        from = "Column::AwayConferenceId",
        to = "super::conferences::Column::Id"
    )]
    AwayConference,
}

impl ActiveModelBehavior for ActiveModel {}
