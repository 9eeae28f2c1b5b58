//! CSV ingest and cleaning.
//!
//! This module turns the raw GSS extract into a clean [`Dataset`]:
//!
//! - decode the Windows-1252 bytes
//! - select the fixed set of source columns and rename them
//! - treat the fixed missing-value tokens (and empty cells) as absent
//! - recode the open-ended top age bracket and coerce numeric columns
//!
//! The schema is strict: a missing column or an unparseable number aborts the
//! load with exit code 3. There is no partial load.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use csv::StringRecord;
use encoding_rs::WINDOWS_1252;

use crate::domain::{AGE_TOP_CODE, AGE_TOP_VALUE, Column, ColumnKind, Dataset, MISSING_TOKENS, Respondent};
use crate::error::AppError;

/// Summary of what the cleaning pass did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestStats {
    pub rows_read: usize,
    /// Number of absent cells per kept column.
    pub missing_by_column: BTreeMap<Column, usize>,
    /// Rows whose age was the top-coded category.
    pub ages_recoded: usize,
}

/// Ingest output: the cleaned table plus cleaning stats.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub dataset: Dataset,
    pub stats: IngestStats,
}

/// Read and clean a local copy of the file.
pub fn load_file(path: &Path) -> Result<IngestedData, AppError> {
    let bytes = std::fs::read(path)
        .map_err(|e| AppError::usage(format!("Failed to read CSV '{}': {e}", path.display())))?;
    ingest_bytes(&bytes)
}

/// Clean raw Windows-1252 encoded CSV bytes.
pub fn ingest_bytes(bytes: &[u8]) -> Result<IngestedData, AppError> {
    let text = decode_cp1252(bytes);
    ingest_str(&text)
}

/// Decode Windows-1252 bytes. A leading UTF-8 BOM switches to UTF-8.
pub fn decode_cp1252(bytes: &[u8]) -> String {
    let (text, _encoding, _had_errors) = WINDOWS_1252.decode(bytes);
    text.into_owned()
}

/// Clean already-decoded CSV text.
pub fn ingest_str(text: &str) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::data(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let columns = resolve_columns(&build_header_map(&headers))?;

    let mut stats = IngestStats::default();
    let mut rows = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header line, and lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::data(format!("CSV parse error on line {line}: {e}")))?;
        rows.push(clean_record(&record, &columns, line, &mut stats)?);
    }
    stats.rows_read = rows.len();

    Ok(IngestedData {
        dataset: Dataset::new(rows),
        stats,
    })
}

/// `true` if a trimmed raw cell marks an absent value.
pub fn is_missing(raw: &str) -> bool {
    raw.is_empty() || MISSING_TOKENS.contains(&raw)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes leave a BOM on the first header.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn resolve_columns(header_map: &HashMap<String, usize>) -> Result<Vec<(Column, usize)>, AppError> {
    let mut resolved = Vec::with_capacity(Column::ALL.len());
    let mut missing = Vec::new();
    for column in Column::ALL {
        match header_map.get(column.source_name()) {
            Some(&idx) => resolved.push((column, idx)),
            None => missing.push(column.source_name()),
        }
    }
    if !missing.is_empty() {
        return Err(AppError::data(format!(
            "Missing required column(s): {}",
            missing.join(", ")
        )));
    }
    Ok(resolved)
}

fn clean_record(
    record: &StringRecord,
    columns: &[(Column, usize)],
    line: usize,
    stats: &mut IngestStats,
) -> Result<Respondent, AppError> {
    let mut row = Respondent::default();
    for &(column, idx) in columns {
        let raw = record.get(idx).unwrap_or("").trim();
        if is_missing(raw) {
            *stats.missing_by_column.entry(column).or_insert(0) += 1;
            continue;
        }
        match column.kind() {
            ColumnKind::Categorical => row.set_text(column, Some(raw.to_string())),
            ColumnKind::Numeric => {
                let value = if column == Column::Age && raw == AGE_TOP_CODE {
                    stats.ages_recoded += 1;
                    AGE_TOP_VALUE
                } else {
                    parse_number(raw).ok_or_else(|| {
                        AppError::data(format!(
                            "Line {line}: column `{}` has non-numeric value '{raw}'",
                            column.source_name()
                        ))
                    })?
                };
                row.set_number(column, Some(value));
            }
        }
    }
    Ok(row)
}

fn parse_number(raw: &str) -> Option<f64> {
    let v = raw.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "id,wtss,sex,educ,region,age,coninc,prestg10,mapres10,papres10,sei10,satjob,fechld,fefam,fehire,fepol,fepresch,meovrwrk";

    fn csv(rows: &[&str]) -> String {
        let mut out = String::from(HEADER);
        for r in rows {
            out.push('\n');
            out.push_str(r);
        }
        out
    }

    #[test]
    fn renames_and_coerces_columns() {
        let text = csv(&[
            "1,0.9,male,12,new england,43,30000,47,31,45,65.3,very satisfied,agree,disagree,IAP,disagree,agree,agree",
        ]);
        let data = ingest_str(&text).unwrap();
        let r = &data.dataset.rows()[0];
        assert_eq!(r.id, Some(1.0));
        assert_eq!(r.weight, Some(0.9));
        assert_eq!(r.sex.as_deref(), Some("male"));
        assert_eq!(r.education, Some(12.0));
        assert_eq!(r.income, Some(30000.0));
        assert_eq!(r.job_prestige, Some(47.0));
        assert_eq!(r.socioeconomic_index, Some(65.3));
        assert_eq!(r.male_breadwinner.as_deref(), Some("disagree"));
        assert_eq!(r.men_overwork.as_deref(), Some("agree"));
    }

    #[test]
    fn top_coded_age_becomes_numeric() {
        let text = csv(&[
            "1,1,male,12,south atlantic,89 or older,1,1,1,1,1,DK,DK,DK,DK,DK,DK,DK",
            "2,1,female,16,south atlantic,30,1,1,1,1,1,DK,DK,DK,DK,DK,DK,DK",
        ]);
        let data = ingest_str(&text).unwrap();
        assert_eq!(data.stats.ages_recoded, 1);
        let ages: Vec<_> = data.dataset.rows().iter().map(|r| r.age).collect();
        assert_eq!(ages, vec![Some(89.0), Some(30.0)]);
    }

    #[test]
    fn missing_tokens_never_survive_cleaning() {
        let text = csv(&[
            "1,1,male,DK,\"IAP,DK,NA,uncodeable\",.a,IAP,,1,1,1,NOT SURE,CAN'T CHOOSE,\"IAP, DK, NA, uncodeable\",x,DK,IAP,agree",
        ]);
        let data = ingest_str(&text).unwrap();
        let r = &data.dataset.rows()[0];
        assert_eq!(r.education, None);
        assert_eq!(r.region, None);
        assert_eq!(r.age, None);
        assert_eq!(r.income, None);
        assert_eq!(r.job_prestige, None);
        assert_eq!(r.satjob, None);
        assert_eq!(r.relationship, None);
        assert_eq!(r.male_breadwinner, None);
        assert_eq!(r.men_bettersuited, None);
        assert_eq!(r.child_suffer, None);
        assert_eq!(r.men_overwork.as_deref(), Some("agree"));
        for column in Column::ALL {
            if let Some(crate::domain::Value::Text(s)) = r.value(column) {
                assert!(!MISSING_TOKENS.contains(&s), "{s} leaked into {column:?}");
            }
        }
        assert_eq!(data.stats.missing_by_column.get(&Column::Satjob), Some(&1));
    }

    #[test]
    fn missing_column_is_fatal() {
        let text = "id,wtss,sex\n1,1,male\n";
        let err = ingest_str(text).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_DATA);
        assert!(err.message().contains("coninc"));
    }

    #[test]
    fn non_numeric_value_is_fatal() {
        let text = csv(&["1,1,male,twelve,south,30,1,1,1,1,1,a,a,a,a,a,a,a"]);
        let err = ingest_str(&text).unwrap_err();
        assert!(err.message().contains("Line 2"));
        assert!(err.message().contains("educ"));
    }

    #[test]
    fn decodes_windows_1252_bytes() {
        // 0x92 is a right single quotation mark in cp1252.
        let bytes = b"CAN\x92T";
        assert_eq!(decode_cp1252(bytes), "CAN\u{2019}T");
    }

    #[test]
    fn header_names_are_normalized() {
        let upper = csv(&[]).to_uppercase();
        let with_bom = format!("\u{feff}{upper}\n1,1,male,12,south,30,1,1,1,1,1,a,a,a,a,a,a,a");
        let data = ingest_str(&with_bom).unwrap();
        assert_eq!(data.dataset.len(), 1);
    }
}
