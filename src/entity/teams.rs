//! 球队数据实体
//!
//! 以 (name, sport, division, gender) 为自然键，被多场比赛共享。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "teams")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    // === 自然键 ===
    #[sea_orm(column_type = "Text")]
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub sport: String,
    #[sea_orm(column_type = "Text")]
    pub division: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub gender: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub level: String,
    /// 首次出现时所属联盟名称
    #[sea_orm(column_type = "Text", nullable)]
    pub conference: Option<String>,

    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
