use std::io::Read;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use super::normalizer::{normalize_text, optional_text, parse_flag};
use super::CatalogImportError;
use crate::workflows::admission::{HistoricalRecord, HistoricalYearRecord, InventoryRow};

pub(crate) fn parse_inventory<R: Read>(
    reader: R,
) -> Result<Vec<InventoryRow>, CatalogImportError> {
    parse_rows::<R, InventoryCsvRow, _>(reader, InventoryCsvRow::into_row)
}

pub(crate) fn parse_history<R: Read>(
    reader: R,
) -> Result<Vec<HistoricalRecord>, CatalogImportError> {
    parse_rows::<R, HistoryCsvRow, _>(reader, HistoryCsvRow::into_record)
}

fn parse_rows<R, Row, T>(
    reader: R,
    convert: fn(Row, u64) -> Result<T, CatalogImportError>,
) -> Result<Vec<T>, CatalogImportError>
where
    R: Read,
    Row: for<'de> Deserialize<'de>,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut parsed = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|position| position.line()).unwrap_or(0);
        let row: Row = record.deserialize(Some(&headers))?;
        parsed.push(convert(row, line)?);
    }

    Ok(parsed)
}

#[derive(Debug, Deserialize)]
struct InventoryCsvRow {
    year: String,
    source_province: String,
    subject_category: String,
    institution_code: String,
    institution_name: String,
    institution_province: String,
    #[serde(default)]
    is_985: String,
    #[serde(default)]
    is_211: String,
    #[serde(default)]
    is_double_first_class: String,
    group_code: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    group_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    subject_requirement: Option<String>,
    major_code: String,
    major_name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    major_category: Option<String>,
    plan_count: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    tuition: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    duration_years: Option<String>,
    #[serde(default)]
    is_cooperative: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    popularity: Option<String>,
}

impl InventoryCsvRow {
    fn into_row(self, line: u64) -> Result<InventoryRow, CatalogImportError> {
        Ok(InventoryRow {
            year: required(line, "year", &self.year)?,
            source_province: normalize_text(&self.source_province),
            subject_category: normalize_text(&self.subject_category),
            institution_code: normalize_text(&self.institution_code),
            institution_name: normalize_text(&self.institution_name),
            institution_province: normalize_text(&self.institution_province),
            is_985: flag(line, "is_985", &self.is_985)?,
            is_211: flag(line, "is_211", &self.is_211)?,
            is_double_first_class: flag(
                line,
                "is_double_first_class",
                &self.is_double_first_class,
            )?,
            group_code: normalize_text(&self.group_code),
            group_name: optional_text(self.group_name),
            subject_requirement: optional_text(self.subject_requirement),
            major_code: normalize_text(&self.major_code),
            major_name: normalize_text(&self.major_name),
            major_category: optional_text(self.major_category),
            plan_count: required(line, "plan_count", &self.plan_count)?,
            tuition: optional(line, "tuition", self.tuition)?,
            duration_years: optional(line, "duration_years", self.duration_years)?,
            is_cooperative: flag(line, "is_cooperative", &self.is_cooperative)?,
            popularity: optional_score(line, "popularity", self.popularity)?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct HistoryCsvRow {
    institution_code: String,
    institution_name: String,
    group_code: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    group_name: Option<String>,
    province: String,
    subject_category: String,
    year: String,
    min_score: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    avg_score: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    max_score: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    min_rank: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    max_rank: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    accepted_count: Option<String>,
}

impl HistoryCsvRow {
    fn into_record(self, line: u64) -> Result<HistoricalRecord, CatalogImportError> {
        Ok(HistoricalRecord {
            institution_code: normalize_text(&self.institution_code),
            institution_name: normalize_text(&self.institution_name),
            group_code: normalize_text(&self.group_code),
            group_name: optional_text(self.group_name),
            province: normalize_text(&self.province),
            subject_category: normalize_text(&self.subject_category),
            outcome: HistoricalYearRecord {
                year: required(line, "year", &self.year)?,
                min_score: required_score(line, "min_score", &self.min_score)?,
                avg_score: optional_score(line, "avg_score", self.avg_score)?,
                max_score: optional_score(line, "max_score", self.max_score)?,
                min_rank: optional(line, "min_rank", self.min_rank)?,
                max_rank: optional(line, "max_rank", self.max_rank)?,
                accepted_count: optional(line, "accepted_count", self.accepted_count)?,
            },
        })
    }
}

fn required<T: FromStr>(
    line: u64,
    field: &'static str,
    value: &str,
) -> Result<T, CatalogImportError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| CatalogImportError::InvalidField {
            line,
            field,
            value: value.to_string(),
        })
}

fn optional<T: FromStr>(
    line: u64,
    field: &'static str,
    value: Option<String>,
) -> Result<Option<T>, CatalogImportError> {
    value
        .map(|value| required(line, field, &value))
        .transpose()
}

/// Like `required`, but `NaN` and infinities are rejected.
fn required_score(line: u64, field: &'static str, value: &str) -> Result<f64, CatalogImportError> {
    let parsed: f64 = required(line, field, value)?;
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(CatalogImportError::InvalidField {
            line,
            field,
            value: value.to_string(),
        })
    }
}

fn optional_score(
    line: u64,
    field: &'static str,
    value: Option<String>,
) -> Result<Option<f64>, CatalogImportError> {
    value
        .map(|value| required_score(line, field, &value))
        .transpose()
}

fn flag(line: u64, field: &'static str, value: &str) -> Result<bool, CatalogImportError> {
    parse_flag(value).ok_or_else(|| CatalogImportError::InvalidField {
        line,
        field,
        value: value.to_string(),
    })
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
