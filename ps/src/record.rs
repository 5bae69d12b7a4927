//! The prompt record and its timestamp handling

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One prompt, either from the static catalog or submitted locally
///
/// Static catalog data is trusted as-is, so every string field tolerates
/// being missing, `null` or a non-string scalar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRecord {
    /// `local-<millis>` for local records, catalog supplied otherwise
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,

    /// School level tag, e.g. 小学校
    #[serde(default, deserialize_with = "lenient_string")]
    pub school_type: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub subject: String,

    /// The prompt body, may span multiple lines
    #[serde(default, deserialize_with = "lenient_string")]
    pub content: String,

    #[serde(default, deserialize_with = "lenient_optional", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// ISO-8601 creation time; numeric catalog values are epoch millis
    #[serde(default, deserialize_with = "lenient_timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl PromptRecord {
    /// Parsed creation time, `None` when missing or unparseable
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }

    /// Ordering key in unix millis; records without a usable timestamp are epoch-zero
    pub fn sort_key(&self) -> i64 {
        self.timestamp().map(|t| t.timestamp_millis()).unwrap_or(0)
    }

    /// The footer annotation, if there is anything to show
    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }
}

/// Parse the timestamp formats found in catalog and local data
///
/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS[.fff]` (read as UTC) and bare
/// dates (UTC midnight).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|n| n.and_utc())
}

/// Format a timestamp the way new records store it: `2024-01-01T00:00:00.000Z`
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

fn lenient_optional<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(format_timestamp)
            .or_else(|| Some(n.to_string())),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_deserialize_full_record() {
        let json = r#"{
            "id": "42",
            "title": "読書感想文の構成",
            "school_type": "小学校",
            "subject": "国語",
            "content": "line1\nline2",
            "description": "三段構成",
            "created_at": "2024-01-01T00:00:00Z"
        }"#;
        let record: PromptRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "42");
        assert_eq!(record.content, "line1\nline2");
        assert_eq!(record.description_text(), Some("三段構成"));
        assert_eq!(record.timestamp(), Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_deserialize_tolerates_missing_and_null_fields() {
        let record: PromptRecord = serde_json::from_str(r#"{"title": null, "id": 7, "extra": true}"#).unwrap();
        assert_eq!(record.id, "7");
        assert_eq!(record.title, "");
        assert_eq!(record.subject, "");
        assert!(record.description.is_none());
        assert!(record.created_at.is_none());
        assert_eq!(record.sort_key(), 0);
    }

    #[test]
    fn test_deserialize_tolerates_non_string_optionals() {
        let records: Vec<PromptRecord> = serde_json::from_str(
            r#"[
                {"id": "a", "created_at": 1704067200000, "description": null},
                {"id": "b", "description": 3, "created_at": true},
                {"id": "c", "created_at": 1.5e300}
            ]"#,
        )
        .unwrap();

        let midnight = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(records[0].created_at.as_deref(), Some("2024-01-01T00:00:00.000Z"));
        assert_eq!(records[0].timestamp(), Some(midnight));
        assert!(records[0].description.is_none());

        assert_eq!(records[1].description_text(), Some("3"));
        assert_eq!(records[1].timestamp(), None);
        assert_eq!(records[1].sort_key(), 0);

        assert_eq!(records[2].timestamp(), None);
    }

    #[test]
    fn test_serialize_omits_absent_optionals() {
        let record = PromptRecord {
            id: "local-1".to_string(),
            title: "t".to_string(),
            school_type: "s".to_string(),
            subject: "j".to_string(),
            content: "c".to_string(),
            description: None,
            created_at: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("description"));
        assert!(!json.contains("created_at"));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let midnight = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-01T00:00:00Z"), Some(midnight));
        assert_eq!(parse_timestamp("2024-01-01T09:00:00+09:00"), Some(midnight));
        assert_eq!(parse_timestamp("2024-01-01T00:00:00.000Z"), Some(midnight));
        assert_eq!(parse_timestamp("2024-01-01T00:00:00"), Some(midnight));
        assert_eq!(parse_timestamp("2024-01-01T00:00:00.123456").map(|t| t.timestamp()), Some(midnight.timestamp()));
        assert_eq!(parse_timestamp("2024-01-01"), Some(midnight));
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2024-13-45"), None);
    }

    #[test]
    fn test_format_timestamp_matches_iso_string() {
        let at = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        assert_eq!(format_timestamp(at), "2024-05-06T07:08:09.000Z");
        assert_eq!(parse_timestamp(&format_timestamp(at)), Some(at));
    }

    #[test]
    fn test_description_text_skips_empty() {
        let record: PromptRecord = serde_json::from_str(r#"{"description": ""}"#).unwrap();
        assert_eq!(record.description_text(), None);
    }
}
