//! Shared domain types.
//!
//! These types describe the cleaned survey table and the fixed column
//! vocabulary that the report and the dashboard are built from. They are
//! lightweight and serializable so they can be:
//!
//! - queried in-memory by the report builder
//! - deserialized straight out of dashboard query strings
//! - exported to JSON/CSV

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default remote location of the 2018 GSS extract.
pub const DEFAULT_SOURCE_URL: &str = "https://github.com/jkropko/DS-6001/raw/master/localdata/gss2018.csv";

/// Literal tokens that mark a missing value in the raw file.
///
/// Matching is exact after trimming surrounding whitespace. Empty fields are
/// also treated as missing.
pub const MISSING_TOKENS: [&str; 7] = [
    "IAP",
    "IAP,DK,NA,uncodeable",
    "NOT SURE",
    "DK",
    "IAP, DK, NA, uncodeable",
    ".a",
    "CAN'T CHOOSE",
];

/// Open-ended age category used by the survey for the top age bracket.
pub const AGE_TOP_CODE: &str = "89 or older";

/// Numeric floor that replaces [`AGE_TOP_CODE`].
pub const AGE_TOP_VALUE: f64 = 89.0;

/// Whether a column holds numbers or category labels after cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// Every column kept after the select/rename pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Id,
    Weight,
    Sex,
    Education,
    Region,
    Age,
    Income,
    JobPrestige,
    MotherJobPrestige,
    FatherJobPrestige,
    SocioeconomicIndex,
    Satjob,
    Relationship,
    MaleBreadwinner,
    MenBettersuited,
    ChildSuffer,
    MenOverwork,
}

impl Column {
    pub const ALL: [Column; 17] = [
        Column::Id,
        Column::Weight,
        Column::Sex,
        Column::Education,
        Column::Region,
        Column::Age,
        Column::Income,
        Column::JobPrestige,
        Column::MotherJobPrestige,
        Column::FatherJobPrestige,
        Column::SocioeconomicIndex,
        Column::Satjob,
        Column::Relationship,
        Column::MaleBreadwinner,
        Column::MenBettersuited,
        Column::ChildSuffer,
        Column::MenOverwork,
    ];

    /// Header name in the raw GSS file.
    pub fn source_name(self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Weight => "wtss",
            Column::Sex => "sex",
            Column::Education => "educ",
            Column::Region => "region",
            Column::Age => "age",
            Column::Income => "coninc",
            Column::JobPrestige => "prestg10",
            Column::MotherJobPrestige => "mapres10",
            Column::FatherJobPrestige => "papres10",
            Column::SocioeconomicIndex => "sei10",
            Column::Satjob => "satjob",
            Column::Relationship => "fechld",
            Column::MaleBreadwinner => "fefam",
            Column::MenBettersuited => "fepol",
            Column::ChildSuffer => "fepresch",
            Column::MenOverwork => "meovrwrk",
        }
    }

    /// Column name after renaming.
    pub fn name(self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Weight => "weight",
            Column::Sex => "sex",
            Column::Education => "education",
            Column::Region => "region",
            Column::Age => "age",
            Column::Income => "income",
            Column::JobPrestige => "job_prestige",
            Column::MotherJobPrestige => "mother_job_prestige",
            Column::FatherJobPrestige => "father_job_prestige",
            Column::SocioeconomicIndex => "socioeconomic_index",
            Column::Satjob => "satjob",
            Column::Relationship => "relationship",
            Column::MaleBreadwinner => "male_breadwinner",
            Column::MenBettersuited => "men_bettersuited",
            Column::ChildSuffer => "child_suffer",
            Column::MenOverwork => "men_overwork",
        }
    }

    /// Human-readable axis/table label.
    pub fn label(self) -> &'static str {
        match self {
            Column::Id => "ID",
            Column::Weight => "Weight",
            Column::Sex => "Gender",
            Column::Education => "Years of Education",
            Column::Region => "Region",
            Column::Age => "Age",
            Column::Income => "Income",
            Column::JobPrestige => "Occupational Prestige",
            Column::MotherJobPrestige => "Mother's Occupational Prestige",
            Column::FatherJobPrestige => "Father's Occupational Prestige",
            Column::SocioeconomicIndex => "Socioeconomic Index",
            Column::Satjob => "Job Satisfaction",
            Column::Relationship => "Working Mother Relationship",
            Column::MaleBreadwinner => "Level of Agreement",
            Column::MenBettersuited => "Men Better Suited for Politics",
            Column::ChildSuffer => "Preschool Child Suffers",
            Column::MenOverwork => "Men Overwork",
        }
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            Column::Id
            | Column::Weight
            | Column::Education
            | Column::Age
            | Column::Income
            | Column::JobPrestige
            | Column::MotherJobPrestige
            | Column::FatherJobPrestige
            | Column::SocioeconomicIndex => ColumnKind::Numeric,
            Column::Sex
            | Column::Region
            | Column::Satjob
            | Column::Relationship
            | Column::MaleBreadwinner
            | Column::MenBettersuited
            | Column::ChildSuffer
            | Column::MenOverwork => ColumnKind::Categorical,
        }
    }
}

/// The attitude/behavior columns selectable as the dynamic chart's x-axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XAxisColumn {
    Satjob,
    Relationship,
    #[default]
    MaleBreadwinner,
    MenBettersuited,
    ChildSuffer,
    MenOverwork,
}

impl XAxisColumn {
    pub const ALL: [XAxisColumn; 6] = [
        XAxisColumn::Satjob,
        XAxisColumn::Relationship,
        XAxisColumn::MaleBreadwinner,
        XAxisColumn::MenBettersuited,
        XAxisColumn::ChildSuffer,
        XAxisColumn::MenOverwork,
    ];

    pub fn column(self) -> Column {
        match self {
            XAxisColumn::Satjob => Column::Satjob,
            XAxisColumn::Relationship => Column::Relationship,
            XAxisColumn::MaleBreadwinner => Column::MaleBreadwinner,
            XAxisColumn::MenBettersuited => Column::MenBettersuited,
            XAxisColumn::ChildSuffer => Column::ChildSuffer,
            XAxisColumn::MenOverwork => Column::MenOverwork,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.column().name()
    }
}

/// The demographic columns selectable as the dynamic chart's color grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupColumn {
    #[default]
    Sex,
    Region,
    Education,
}

impl GroupColumn {
    pub const ALL: [GroupColumn; 3] = [GroupColumn::Sex, GroupColumn::Region, GroupColumn::Education];

    pub fn column(self) -> Column {
        match self {
            GroupColumn::Sex => Column::Sex,
            GroupColumn::Region => Column::Region,
            GroupColumn::Education => Column::Education,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.column().name()
    }
}

/// Current state of the two dashboard dropdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Selection {
    pub x: XAxisColumn,
    pub color: GroupColumn,
}

/// Columns that must all be present for a row to enter the interactive chart.
pub fn interactive_columns() -> Vec<Column> {
    XAxisColumn::ALL
        .iter()
        .map(|x| x.column())
        .chain(GroupColumn::ALL.iter().map(|g| g.column()))
        .collect()
}

/// A borrowed cell value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Number(f64),
    Text(&'a str),
}

/// One cleaned survey respondent.
///
/// `None` means the raw cell was empty or one of [`MISSING_TOKENS`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Respondent {
    pub id: Option<f64>,
    pub weight: Option<f64>,
    pub sex: Option<String>,
    pub education: Option<f64>,
    pub region: Option<String>,
    pub age: Option<f64>,
    pub income: Option<f64>,
    pub job_prestige: Option<f64>,
    pub mother_job_prestige: Option<f64>,
    pub father_job_prestige: Option<f64>,
    pub socioeconomic_index: Option<f64>,
    pub satjob: Option<String>,
    pub relationship: Option<String>,
    pub male_breadwinner: Option<String>,
    pub men_bettersuited: Option<String>,
    pub child_suffer: Option<String>,
    pub men_overwork: Option<String>,
}

impl Respondent {
    pub fn value(&self, column: Column) -> Option<Value<'_>> {
        match column.kind() {
            ColumnKind::Numeric => self.number(column).map(Value::Number),
            ColumnKind::Categorical => self.text(column).map(Value::Text),
        }
    }

    /// Numeric value of a numeric column; `None` for categorical columns.
    pub fn number(&self, column: Column) -> Option<f64> {
        match column {
            Column::Id => self.id,
            Column::Weight => self.weight,
            Column::Education => self.education,
            Column::Age => self.age,
            Column::Income => self.income,
            Column::JobPrestige => self.job_prestige,
            Column::MotherJobPrestige => self.mother_job_prestige,
            Column::FatherJobPrestige => self.father_job_prestige,
            Column::SocioeconomicIndex => self.socioeconomic_index,
            _ => None,
        }
    }

    /// Text value of a categorical column; `None` for numeric columns.
    pub fn text(&self, column: Column) -> Option<&str> {
        let slot = match column {
            Column::Sex => &self.sex,
            Column::Region => &self.region,
            Column::Satjob => &self.satjob,
            Column::Relationship => &self.relationship,
            Column::MaleBreadwinner => &self.male_breadwinner,
            Column::MenBettersuited => &self.men_bettersuited,
            Column::ChildSuffer => &self.child_suffer,
            Column::MenOverwork => &self.men_overwork,
            _ => return None,
        };
        slot.as_deref()
    }

    /// Category label for grouping. Numbers render without a trailing `.0`
    /// when integral (`12.0` groups as `"12"`).
    pub fn category(&self, column: Column) -> Option<String> {
        match self.value(column)? {
            Value::Text(s) => Some(s.to_string()),
            Value::Number(v) => Some(format_number_label(v)),
        }
    }

    pub fn has(&self, column: Column) -> bool {
        self.value(column).is_some()
    }

    pub fn set_number(&mut self, column: Column, value: Option<f64>) {
        match column {
            Column::Id => self.id = value,
            Column::Weight => self.weight = value,
            Column::Education => self.education = value,
            Column::Age => self.age = value,
            Column::Income => self.income = value,
            Column::JobPrestige => self.job_prestige = value,
            Column::MotherJobPrestige => self.mother_job_prestige = value,
            Column::FatherJobPrestige => self.father_job_prestige = value,
            Column::SocioeconomicIndex => self.socioeconomic_index = value,
            _ => {}
        }
    }

    pub fn set_text(&mut self, column: Column, value: Option<String>) {
        match column {
            Column::Sex => self.sex = value,
            Column::Region => self.region = value,
            Column::Satjob => self.satjob = value,
            Column::Relationship => self.relationship = value,
            Column::MaleBreadwinner => self.male_breadwinner = value,
            Column::MenBettersuited => self.men_bettersuited = value,
            Column::ChildSuffer => self.child_suffer = value,
            Column::MenOverwork => self.men_overwork = value,
            _ => {}
        }
    }
}

pub fn format_number_label(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

/// The cleaned, read-only survey table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    rows: Vec<Respondent>,
}

impl Dataset {
    pub fn new(rows: Vec<Respondent>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Respondent] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows that have a value in every one of `columns`.
    pub fn complete_rows<'a>(&'a self, columns: &'a [Column]) -> impl Iterator<Item = &'a Respondent> + 'a {
        self.rows
            .iter()
            .filter(move |r| columns.iter().all(|&c| r.has(c)))
    }

    /// Copy of the table restricted to rows complete in `columns`.
    pub fn drop_missing(&self, columns: &[Column]) -> Dataset {
        Dataset::new(self.complete_rows(columns).cloned().collect())
    }

    /// Subset feeding the dynamic bar chart: no missing value in any of the
    /// nine candidate columns.
    pub fn interactive_subset(&self) -> Dataset {
        self.drop_missing(&interactive_columns())
    }
}

/// Where the raw CSV comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// Fetch over HTTP(S).
    Remote { url: String },
    /// Read a local copy of the file.
    File { path: PathBuf },
    /// Generate a deterministic synthetic file.
    Sample { count: usize, seed: u64 },
}

impl DataSource {
    pub fn describe(&self) -> String {
        match self {
            DataSource::Remote { url } => url.clone(),
            DataSource::File { path } => path.display().to_string(),
            DataSource::Sample { count, seed } => format!("synthetic sample (n={count}, seed={seed})"),
        }
    }
}

/// Resolved settings for `gss serve`.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub source: DataSource,
    pub host: String,
    pub port: u16,
    pub debug: bool,
}

/// Resolved settings for `gss report`.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub source: DataSource,
    pub out_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interactive_columns_cover_both_dropdowns() {
        let cols = interactive_columns();
        assert_eq!(cols.len(), 9);
        assert!(cols.contains(&Column::Satjob));
        assert!(cols.contains(&Column::Education));
    }

    #[test]
    fn category_formats_integral_numbers_without_fraction() {
        let r = Respondent {
            education: Some(12.0),
            age: Some(34.5),
            sex: Some("female".into()),
            ..Default::default()
        };
        assert_eq!(r.category(Column::Education).as_deref(), Some("12"));
        assert_eq!(r.category(Column::Age).as_deref(), Some("34.5"));
        assert_eq!(r.category(Column::Sex).as_deref(), Some("female"));
        assert_eq!(r.category(Column::Region), None);
    }

    #[test]
    fn selection_defaults_match_dashboard_literals() {
        let s = Selection::default();
        assert_eq!(s.x, XAxisColumn::MaleBreadwinner);
        assert_eq!(s.color, GroupColumn::Sex);
    }

    #[test]
    fn selection_deserializes_from_snake_case() {
        let s: Selection = serde_json::from_str(r#"{"x":"satjob","color":"region"}"#).unwrap();
        assert_eq!(s.x, XAxisColumn::Satjob);
        assert_eq!(s.color, GroupColumn::Region);
        assert!(serde_json::from_str::<Selection>(r#"{"x":"income"}"#).is_err());
    }

    #[test]
    fn drop_missing_keeps_only_complete_rows() {
        let full = Respondent {
            sex: Some("male".into()),
            income: Some(1.0),
            ..Default::default()
        };
        let partial = Respondent {
            sex: Some("male".into()),
            ..Default::default()
        };
        let ds = Dataset::new(vec![full.clone(), partial]);
        let kept = ds.drop_missing(&[Column::Sex, Column::Income]);
        assert_eq!(kept.rows(), &[full]);
    }
}
