//! 数据传输对象 (DTO)
//!
//! 外部数据源的比赛记录，以及写入 games / teams / conferences 表所需的结构。

use serde::{Deserialize, Serialize};

/// 外部数据源提交的比赛记录
///
/// 必填字段使用 `#[serde(default)]`，缺失时为空字符串，由校验器统一报告，
/// 而不是在反序列化阶段直接失败。
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    #[serde(default)]
    pub home_team: String,
    #[serde(default)]
    pub away_team: String,
    #[serde(default)]
    pub sport: String,
    #[serde(default)]
    pub division: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// YYYY-MM-DD
    #[serde(default)]
    pub date: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_conference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_conference: Option<String>,

    /// 数据源自带的比赛 ID
    #[serde(
        default,
        alias = "ncaa_game_id",
        alias = "external_identifier",
        skip_serializing_if = "Option::is_none"
    )]
    pub external_id: Option<String>,

    // === 可选的比分与状态 ===
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_score: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_score: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
}

/// 球队 / 联盟共用的自然键
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NaturalKey {
    pub name: String,
    pub sport: String,
    pub division: String,
    pub gender: Option<String>,
}

impl NaturalKey {
    /// 以比赛记录的赛事分类构造指定名称的自然键
    pub fn for_record(name: &str, record: &GameRecord) -> Self {
        Self {
            name: name.trim().to_string(),
            sport: record.sport.clone(),
            division: record.division.clone(),
            gender: record.gender.clone(),
        }
    }
}

/// 球队查找或创建参数
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamParams {
    #[serde(flatten)]
    pub key: NaturalKey,
    pub conference: Option<String>,
}

/// 联盟查找或创建参数（创建时不关联球队）
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConferenceParams {
    #[serde(flatten)]
    pub key: NaturalKey,
}

/// 查找或创建的结果，`created` 明确指示本次是否新建
#[derive(Clone, Debug, PartialEq)]
pub struct Resolved<T> {
    pub entity: T,
    pub created: bool,
}

impl<T> Resolved<T> {
    pub fn found(entity: T) -> Self {
        Self {
            entity,
            created: false,
        }
    }

    pub fn created(entity: T) -> Self {
        Self {
            entity,
            created: true,
        }
    }
}

/// 用于插入比赛的数据结构
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InsertGameData {
    pub game_id: String,
    pub date: String,
    pub sport: String,
    pub division: String,
    pub gender: Option<String>,

    pub home_team_id: i32,
    pub away_team_id: i32,
    pub home_conference_id: Option<i32>,
    pub away_conference_id: Option<i32>,

    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub status: String,
    pub start_time: Option<String>,
    pub venue: Option<String>,
    pub data_source: String,
}
