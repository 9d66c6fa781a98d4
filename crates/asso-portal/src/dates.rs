use chrono::NaiveDate;
use serde::Deserialize;

pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).map_err(serde::de::Error::custom)
}

/// Treats blank CSV/JSON cells as absent.
pub fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_trims_whitespace() {
        let date = parse_date(" 2026-03-14 ").expect("valid date");
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 3, 14).expect("valid"));
    }

    #[test]
    fn parse_date_reports_the_raw_value() {
        let err = parse_date("14/03/2026").expect_err("wrong format rejected");
        assert!(err.contains("14/03/2026"));
    }
}
