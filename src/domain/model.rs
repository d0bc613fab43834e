use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::LabelError;

/// Dates and codes derived from one reference date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateLabelResult {
    pub reference_date: NaiveDate,
    pub manufacture_date: NaiveDate,
    pub use_by_date: NaiveDate,
    pub batch_code: String,
    pub label_text: String,
}

impl DateLabelResult {
    /// 標籤四行：RS、PKD、USE BY、Batch
    pub fn label_lines(&self) -> impl Iterator<Item = &str> {
        self.label_text.split('\n')
    }
}

/// Shelf-life offset paired with the batch-code suffix it is printed with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRule {
    pub shelf_life_days: u32,
    pub batch_suffix: String,
    #[serde(default = "default_header_line")]
    pub header_line: String,
}

pub const DEFAULT_HEADER_LINE: &str = "RS: 80";

fn default_header_line() -> String {
    DEFAULT_HEADER_LINE.to_string()
}

impl LabelRule {
    pub fn new(shelf_life_days: u32, batch_suffix: impl Into<String>) -> Self {
        Self {
            shelf_life_days,
            batch_suffix: batch_suffix.into(),
            header_line: default_header_line(),
        }
    }

    /// USE BY 為參考日 + 8 天，批號尾碼 "26"
    pub fn eight_day() -> Self {
        Self::new(8, "26")
    }

    /// USE BY 為參考日 + 9 天，批號尾碼 "25"
    pub fn nine_day() -> Self {
        Self::new(9, "25")
    }

    pub fn with_header_line(mut self, header_line: impl Into<String>) -> Self {
        self.header_line = header_line.into();
        self
    }
}

/// Selector accepted by `format_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateFormat {
    /// `DD.MM.YY`
    #[serde(rename = "DD.MM.YY")]
    DotDdMmYy,
    /// `DDMMYY`
    #[serde(rename = "DDMMYY")]
    DdMmYy,
}

impl DateFormat {
    pub fn pattern(&self) -> &'static str {
        match self {
            DateFormat::DotDdMmYy => "%d.%m.%y",
            DateFormat::DdMmYy => "%d%m%y",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DateFormat::DotDdMmYy => "DD.MM.YY",
            DateFormat::DdMmYy => "DDMMYY",
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateFormat {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DD.MM.YY" => Ok(DateFormat::DotDdMmYy),
            "DDMMYY" => Ok(DateFormat::DdMmYy),
            other => Err(LabelError::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }
}

/// Fields decoded back out of a batch code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchCodeParts {
    pub day: u32,
    pub month: u32,
    pub year_two_digit: u32,
    pub suffix: String,
}

impl BatchCodeParts {
    /// Resolve the two-digit year inside the given century, e.g. 2000.
    pub fn reference_date(&self, century: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(century + self.year_two_digit as i32, self.month, self.day)
    }
}

/// Preparation dates worked backwards from the selected date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintingSchedule {
    pub selected_date: NaiveDate,
    pub printing_date: NaiveDate,
    pub packing_date: NaiveDate,
    pub bag_making_date: NaiveDate,
    pub printing_filename: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMaterialBreakdown {
    pub estimated_weight: f64,
    pub dosa_rice: f64,
    pub idly_rice: f64,
    pub urad_dal: f64,
    pub fenugreek: f64,
    pub salt: f64,
    pub total_weight: f64,
}

impl RawMaterialBreakdown {
    /// (名稱, 公斤數) 依畫面顯示順序
    pub fn rows(&self) -> [(&'static str, f64); 6] {
        [
            ("Dosa Rice", self.dosa_rice),
            ("Idly Rice", self.idly_rice),
            ("Urad Dal", self.urad_dal),
            ("Fenugreek", self.fenugreek),
            ("Salt", self.salt),
            ("Total Weight", self.total_weight),
        ]
    }
}

/// Image about to be handed to the storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUpload {
    pub original_name: String,
    pub content_type: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum ImageKind {
    BatchCode,
    Printing,
}

impl ImageKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            ImageKind::BatchCode => "batch-code-images",
            ImageKind::Printing => "printing-images",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationOutcome {
    pub matched: bool,
    pub expected_text: String,
    pub recognized_text: String,
}
