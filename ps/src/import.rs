//! Catalog import from tab-separated exports
//!
//! Expected header: `id  title  school  subject  prompt  description`.
//! Missing columns read as empty.

use std::fs;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::record::{PromptRecord, format_timestamp};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogRow {
    id: String,
    title: String,
    school: String,
    subject: String,
    prompt: String,
    description: String,
}

/// Display label for a school code; unknown codes pass through trimmed
pub fn school_label(code: &str) -> String {
    let code = code.trim();
    match code {
        "elementary" => "小学校".to_string(),
        "junior-high" => "中学校".to_string(),
        "high" => "高校".to_string(),
        other => other.to_string(),
    }
}

/// Read catalog rows; every record is stamped with `imported_at`
pub fn import_tsv<R: Read>(reader: R, imported_at: DateTime<Utc>) -> StoreResult<Vec<PromptRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_reader(reader);

    let created_at = format_timestamp(imported_at);
    let mut records = Vec::new();
    for row in reader.deserialize::<CatalogRow>() {
        let row = row?;
        debug!(id = %row.id, "import_tsv: row");
        records.push(PromptRecord {
            id: row.id,
            title: row.title,
            school_type: school_label(&row.school),
            subject: row.subject,
            content: row.prompt.trim_matches('"').to_string(),
            description: Some(row.description).filter(|d| !d.is_empty()),
            created_at: Some(created_at.clone()),
        });
    }
    Ok(records)
}

pub fn import_tsv_file(path: impl AsRef<Path>, imported_at: DateTime<Utc>) -> StoreResult<Vec<PromptRecord>> {
    let path = path.as_ref();
    let file = fs::File::open(path)?;
    let records = import_tsv(file, imported_at)?;
    info!(path = %path.display(), count = records.len(), "Imported catalog rows");
    Ok(records)
}

/// Write a catalog as pretty JSON, creating parent directories
pub fn write_catalog(path: impl AsRef<Path>, records: &[PromptRecord]) -> StoreResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(records)
        .map_err(|e| StoreError::json(format!("catalog {}", path.display()), e))?;
    fs::write(path, json)?;
    info!(path = %path.display(), count = records.len(), "Wrote catalog");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_school_label() {
        assert_eq!(school_label("elementary"), "小学校");
        assert_eq!(school_label(" junior-high "), "中学校");
        assert_eq!(school_label("high"), "高校");
        assert_eq!(school_label("特別支援学校"), "特別支援学校");
    }

    #[test]
    fn test_import_rows() {
        let tsv = "id\ttitle\tschool\tsubject\tprompt\tdescription\n\
                   1\t俳句\telementary\t国語\t\"\"\"季語を入れて\"\"\"\t\n\
                   2\tDebate\thigh\tEnglish\tArgue both sides\tfor seminars\n";
        let records = import_tsv(tsv.as_bytes(), at()).unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].id, "1");
        assert_eq!(records[0].school_type, "小学校");
        assert_eq!(records[0].content, "季語を入れて");
        assert_eq!(records[0].description, None);
        assert_eq!(records[0].created_at.as_deref(), Some("2025-01-15T12:00:00.000Z"));

        assert_eq!(records[1].school_type, "高校");
        assert_eq!(records[1].description.as_deref(), Some("for seminars"));
    }

    #[test]
    fn test_import_missing_columns() {
        let tsv = "title\tprompt\nOnly title\tbody\n";
        let records = import_tsv(tsv.as_bytes(), at()).unwrap();
        assert_eq!(records[0].id, "");
        assert_eq!(records[0].school_type, "");
        assert_eq!(records[0].content, "body");
    }

    #[test]
    fn test_write_catalog_then_reload() {
        let temp = TempDir::new().unwrap();
        let tsv_path = temp.path().join("raw_data.tsv");
        fs::write(&tsv_path, "id\ttitle\tschool\tsubject\tprompt\n9\tT\thigh\t数学\tP\n").unwrap();

        let records = import_tsv_file(&tsv_path, at()).unwrap();
        let out = temp.path().join("data").join("prompts.json");
        write_catalog(&out, &records).unwrap();

        let reloaded: Vec<PromptRecord> = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(reloaded, records);
        assert!(fs::read_to_string(&out).unwrap().contains("数学"));
    }
}
