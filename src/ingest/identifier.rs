//! 比赛标识派生
//!
//! 同一场比赛无论提交多少次都得到相同的标识，无需先查询存储。

use crate::database::dto::GameRecord;

pub const ID_PREFIX: &str = "ncaa";

/// 由比赛记录派生稳定的比赛标识
///
/// - 记录带有外部 ID：`ncaa-{external_id}`
/// - 否则：`ncaa-{sport}-{division}-{yyyymmdd}-{home}-vs-{away}`
pub fn derive_identifier(record: &GameRecord) -> String {
    // 外部 ID 原样使用，仅空白值视为缺失
    if let Some(external_id) = record
        .external_id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
    {
        return format!("{}-{}", ID_PREFIX, external_id);
    }

    format!(
        "{}-{}-{}-{}-{}-vs-{}",
        ID_PREFIX,
        record.sport,
        record.division,
        normalize_date(&record.date),
        normalize_team(&record.home_team),
        normalize_team(&record.away_team),
    )
}

/// 小写化，连续的非字母数字字符折叠为一个连字符，并去掉首尾连字符
pub fn normalize_team(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

fn normalize_date(date: &str) -> String {
    date.trim().replace('-', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(home: &str, away: &str) -> GameRecord {
        GameRecord {
            home_team: home.to_string(),
            away_team: away.to_string(),
            sport: "basketball".to_string(),
            division: "d1".to_string(),
            date: "2024-01-15".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn derives_matchup_identifier() {
        assert_eq!(
            derive_identifier(&record("Duke", "UNC")),
            "ncaa-basketball-d1-20240115-duke-vs-unc"
        );
    }

    #[test]
    fn external_identifier_wins() {
        let mut game = record("Duke", "UNC");
        game.external_id = Some("6102345".to_string());
        assert_eq!(derive_identifier(&game), "ncaa-6102345");
    }

    #[test]
    fn external_identifier_is_not_trimmed() {
        let mut game = record("Duke", "UNC");
        game.external_id = Some(" 6102345".to_string());
        assert_eq!(derive_identifier(&game), "ncaa- 6102345");
    }

    #[test]
    fn blank_external_identifier_is_ignored() {
        let mut game = record("Duke", "UNC");
        game.external_id = Some("   ".to_string());
        assert_eq!(
            derive_identifier(&game),
            "ncaa-basketball-d1-20240115-duke-vs-unc"
        );
    }

    #[test]
    fn casing_and_punctuation_normalize_to_same_key() {
        let a = derive_identifier(&record("Texas A&M", "St. John's (NY)"));
        let b = derive_identifier(&record("  TEXAS a & m ", "st johns ny"));
        assert_eq!(a, "ncaa-basketball-d1-20240115-texas-a-m-vs-st-john-s-ny");
        // 撇号会产生额外的分隔，因此与去掉撇号的写法不同
        assert_ne!(a, b);
        assert_eq!(
            derive_identifier(&record("  TEXAS a & m ", "ST. JOHN'S (ny)")),
            a
        );
    }

    #[test]
    fn normalize_team_trims_and_collapses() {
        assert_eq!(normalize_team("--Miami (FL)--"), "miami-fl");
        assert_eq!(normalize_team("UNC   Wilmington"), "unc-wilmington");
        assert_eq!(normalize_team("!!!"), "");
    }
}
