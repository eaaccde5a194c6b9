//! 比赛记录校验

use chrono::NaiveDate;

use crate::database::dto::GameRecord;

pub const SPORTS: &[&str] = &[
    "baseball",
    "basketball",
    "fieldhockey",
    "football",
    "icehockey",
    "lacrosse",
    "soccer",
    "softball",
    "volleyball",
    "waterpolo",
];
pub const DIVISIONS: &[&str] = &["d1", "d2", "d3", "fbs", "fcs"];
pub const GENDERS: &[&str] = &["men", "women"];

/// 校验失败原因
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid {field} '{value}', expected one of: {allowed}")]
    InvalidValue {
        field: &'static str,
        value: String,
        allowed: String,
    },

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// 记录校验器
pub trait RecordValidator: Send + Sync {
    fn validate(&self, record: &GameRecord) -> Result<(), ValidationError>;
}

/// 默认校验：必填字段、取值范围与日期格式
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardValidator;

impl RecordValidator for StandardValidator {
    fn validate(&self, record: &GameRecord) -> Result<(), ValidationError> {
        let required = [
            ("home_team", &record.home_team),
            ("away_team", &record.away_team),
            ("sport", &record.sport),
            ("division", &record.division),
            ("date", &record.date),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(field));
            }
        }

        check_allowed("sport", &record.sport, SPORTS)?;
        check_allowed("division", &record.division, DIVISIONS)?;
        if let Some(gender) = &record.gender {
            check_allowed("gender", gender, GENDERS)?;
        }

        // %Y-%m-%d 也接受 2024-1-5，这里要求严格的 10 位格式
        if record.date.len() != 10 || NaiveDate::parse_from_str(&record.date, "%Y-%m-%d").is_err()
        {
            return Err(ValidationError::InvalidDate(record.date.clone()));
        }

        Ok(())
    }
}

fn check_allowed(
    field: &'static str,
    value: &str,
    allowed: &[&str],
) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field,
            value: value.to_string(),
            allowed: allowed.join(", "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> GameRecord {
        GameRecord {
            home_team: "Duke".to_string(),
            away_team: "UNC".to_string(),
            sport: "basketball".to_string(),
            division: "d1".to_string(),
            date: "2024-01-15".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn accepts_minimal_record() {
        assert_eq!(StandardValidator.validate(&valid()), Ok(()));
    }

    #[test]
    fn reports_first_missing_field() {
        let mut record = valid();
        record.away_team = "  ".to_string();
        assert_eq!(
            StandardValidator.validate(&record),
            Err(ValidationError::MissingField("away_team"))
        );
    }

    #[test]
    fn rejects_unknown_sport_and_gender() {
        let mut record = valid();
        record.sport = "quidditch".to_string();
        assert!(matches!(
            StandardValidator.validate(&record),
            Err(ValidationError::InvalidValue { field: "sport", .. })
        ));

        let mut record = valid();
        record.gender = Some("coed".to_string());
        assert!(matches!(
            StandardValidator.validate(&record),
            Err(ValidationError::InvalidValue { field: "gender", .. })
        ));
    }

    #[test]
    fn rejects_malformed_and_impossible_dates() {
        for date in ["2024/01/15", "2024-1-5", "2024-02-30", "yesterday"] {
            let mut record = valid();
            record.date = date.to_string();
            assert_eq!(
                StandardValidator.validate(&record),
                Err(ValidationError::InvalidDate(date.to_string())),
                "{date}"
            );
        }
    }
}
