//! Packaging dates, batch codes and label text derived from a reference date.
//!
//! Every screen that prints or verifies a label goes through
//! [`BatchCodeCalculator`], so the shelf-life offset and batch suffix live in
//! exactly one [`LabelRule`].

use chrono::{Datelike, Days, NaiveDate};

use crate::core::clock::{today_in, SystemClock, DEFAULT_UTC_OFFSET_MINUTES};
use crate::domain::model::{BatchCodeParts, DateFormat, DateLabelResult, LabelRule};
use crate::domain::ports::{Clock, ConfigProvider};
use crate::utils::error::{LabelError, Result};
use crate::utils::validation::{
    validate_digits, validate_non_empty_string, validate_positive_number, validate_required_field,
    Validate,
};

pub const DEFAULT_YEARS_BACK: i32 = 1;
pub const DEFAULT_YEARS_AHEAD: i32 = 10;
/// 年份窗口前後各自的上限
pub const MAX_YEAR_WINDOW: i32 = 100;

/// 批號固定開頭
const BATCH_PREFIX: char = '1';
const BATCH_CODE_LEN: usize = 9;

impl Validate for LabelRule {
    fn validate(&self) -> Result<()> {
        // PKD 為 +1 天，USE BY 必須更晚
        validate_positive_number("label.shelf_life_days", self.shelf_life_days, 2)?;
        validate_digits("label.batch_suffix", &self.batch_suffix, 2)?;
        validate_non_empty_string("label.header_line", &self.header_line)?;
        if self.header_line.contains('\n') || self.header_line.contains('\r') {
            return Err(LabelError::InvalidConfigValueError {
                field: "label.header_line".to_string(),
                value: self.header_line.clone(),
                reason: "Header must be a single line".to_string(),
            });
        }
        Ok(())
    }
}

pub fn format_date(date: NaiveDate, format: DateFormat) -> String {
    date.format(format.pattern()).to_string()
}

/// String-input variant of [`format_date`].
pub fn format_date_str(raw: &str, selector: &str) -> Result<String> {
    let format: DateFormat = selector.parse()?;
    let date = parse_reference_date(raw)?;
    Ok(format_date(date, format))
}

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`).
pub fn parse_reference_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LabelError::InvalidInput {
            input: raw.to_string(),
            reason: "a reference date is required".to_string(),
        });
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|e| LabelError::InvalidInput {
        input: raw.to_string(),
        reason: e.to_string(),
    })
}

pub fn build_batch_code(reference_date: NaiveDate, suffix: &str) -> String {
    format!(
        "{}{}{}",
        BATCH_PREFIX,
        format_date(reference_date, DateFormat::DdMmYy),
        suffix
    )
}

pub fn build_label_text(
    header_line: &str,
    manufacture_date: NaiveDate,
    use_by_date: NaiveDate,
    batch_code: &str,
) -> String {
    [
        header_line.to_string(),
        format!("PKD: {}", format_date(manufacture_date, DateFormat::DotDdMmYy)),
        format!("USE BY: {}", format_date(use_by_date, DateFormat::DotDdMmYy)),
        format!("Batch: {}", batch_code),
    ]
    .join("\n")
}

/// Decode `1` + DDMMYY + two-digit suffix.
pub fn parse_batch_code(code: &str) -> Result<BatchCodeParts> {
    let invalid = |reason: &str| LabelError::InvalidBatchCode {
        code: code.to_string(),
        reason: reason.to_string(),
    };

    let code_trimmed = code.trim();
    if code_trimmed.len() != BATCH_CODE_LEN || !code_trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("expected exactly 9 digits"));
    }
    if !code_trimmed.starts_with(BATCH_PREFIX) {
        return Err(invalid("batch codes start with '1'"));
    }

    let field = |range: std::ops::Range<usize>| -> Result<u32> {
        code_trimmed[range]
            .parse::<u32>()
            .map_err(|e| invalid(&e.to_string()))
    };
    let parts = BatchCodeParts {
        day: field(1..3)?,
        month: field(3..5)?,
        year_two_digit: field(5..7)?,
        suffix: code_trimmed[7..9].to_string(),
    };

    if !(1..=12).contains(&parts.month) || !(1..=31).contains(&parts.day) {
        return Err(invalid("embedded date is not a calendar date"));
    }
    Ok(parts)
}

pub struct BatchCodeCalculator<C: Clock = SystemClock> {
    rule: LabelRule,
    clock: C,
    utc_offset_minutes: i32,
    years_back: i32,
    years_ahead: i32,
}

impl BatchCodeCalculator<SystemClock> {
    pub fn new(rule: LabelRule) -> Result<Self> {
        rule.validate()?;
        Ok(Self {
            rule,
            clock: SystemClock,
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
            years_back: DEFAULT_YEARS_BACK,
            years_ahead: DEFAULT_YEARS_AHEAD,
        })
    }

    pub fn from_config<P: ConfigProvider + ?Sized>(config: &P) -> Result<Self> {
        let rule = config.label_rule();
        let rule = validate_required_field("label.preset", &rule)?.clone();
        Ok(Self::new(rule)?
            .with_utc_offset(config.utc_offset_minutes())
            .with_year_window(config.years_back(), config.years_ahead()))
    }
}

impl<C: Clock> BatchCodeCalculator<C> {
    pub fn with_clock<C2: Clock>(self, clock: C2) -> BatchCodeCalculator<C2> {
        BatchCodeCalculator {
            rule: self.rule,
            clock,
            utc_offset_minutes: self.utc_offset_minutes,
            years_back: self.years_back,
            years_ahead: self.years_ahead,
        }
    }

    pub fn with_utc_offset(mut self, utc_offset_minutes: i32) -> Self {
        self.utc_offset_minutes = utc_offset_minutes;
        self
    }

    pub fn with_year_window(mut self, years_back: i32, years_ahead: i32) -> Self {
        self.years_back = years_back;
        self.years_ahead = years_ahead;
        self
    }

    pub fn rule(&self) -> &LabelRule {
        &self.rule
    }

    /// "Today" in the configured timezone; the default reference date.
    pub fn today(&self) -> NaiveDate {
        today_in(&self.clock, self.utc_offset_minutes)
    }

    /// Inclusive `(min, max)` years accepted as a reference date.
    pub fn year_window(&self) -> (i32, i32) {
        let current_year = self.today().year();
        (
            current_year.saturating_sub(self.years_back),
            current_year.saturating_add(self.years_ahead),
        )
    }

    pub fn calculate_dates(&self, reference_date: NaiveDate) -> Result<DateLabelResult> {
        let (min, max) = self.year_window();
        let year = reference_date.year();
        if year < min || year > max {
            return Err(LabelError::OutOfRange { year, min, max });
        }

        let out_of_range = || LabelError::OutOfRange { year, min, max };
        let manufacture_date = reference_date
            .checked_add_days(Days::new(1))
            .ok_or_else(out_of_range)?;
        let use_by_date = reference_date
            .checked_add_days(Days::new(self.rule.shelf_life_days as u64))
            .ok_or_else(out_of_range)?;

        let batch_code = build_batch_code(reference_date, &self.rule.batch_suffix);
        let label_text = build_label_text(
            &self.rule.header_line,
            manufacture_date,
            use_by_date,
            &batch_code,
        );

        Ok(DateLabelResult {
            reference_date,
            manufacture_date,
            use_by_date,
            batch_code,
            label_text,
        })
    }

    /// `raw` is the date as typed by the user; `None` counts as missing.
    pub fn calculate_dates_from_input(&self, raw: Option<&str>) -> Result<DateLabelResult> {
        let reference_date = parse_reference_date(raw.unwrap_or_default())?;
        self.calculate_dates(reference_date)
    }

    pub fn calculate_today(&self) -> Result<DateLabelResult> {
        self.calculate_dates(self.today())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn calculator(rule: LabelRule) -> BatchCodeCalculator<FixedClock> {
        BatchCodeCalculator::new(rule)
            .unwrap()
            .with_clock(FixedClock(Utc.with_ymd_and_hms(2025, 3, 10, 6, 0, 0).unwrap()))
    }

    #[test]
    fn test_format_date_patterns() {
        assert_eq!(format_date(date(2025, 3, 10), DateFormat::DotDdMmYy), "10.03.25");
        assert_eq!(format_date(date(2025, 3, 10), DateFormat::DdMmYy), "100325");
        assert_eq!(format_date(date(2009, 1, 5), DateFormat::DdMmYy), "050109");
    }

    #[test]
    fn test_format_date_str_errors() {
        assert_eq!(format_date_str("2025-03-10", "DD.MM.YY").unwrap(), "10.03.25");
        assert!(matches!(
            format_date_str("2025-02-30", "DDMMYY"),
            Err(LabelError::InvalidInput { .. })
        ));
        assert!(matches!(
            format_date_str("2025-03-10", "MM/DD"),
            Err(LabelError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_nine_day_rule_scenario() {
        let result = calculator(LabelRule::nine_day())
            .calculate_dates(date(2025, 3, 10))
            .unwrap();
        assert_eq!(result.manufacture_date, date(2025, 3, 11));
        assert_eq!(result.use_by_date, date(2025, 3, 19));
        assert_eq!(result.batch_code, "110032525");
        assert_eq!(
            result.label_text,
            "RS: 80\nPKD: 11.03.25\nUSE BY: 19.03.25\nBatch: 110032525"
        );
    }

    #[test]
    fn test_eight_day_rule_scenario() {
        let result = calculator(LabelRule::eight_day())
            .calculate_dates_from_input(Some("2025-03-10"))
            .unwrap();
        assert_eq!(result.manufacture_date, date(2025, 3, 11));
        assert_eq!(result.use_by_date, date(2025, 3, 18));
        assert_eq!(result.batch_code, "110032526");
        assert_eq!(
            result.label_text,
            "RS: 80\nPKD: 11.03.25\nUSE BY: 18.03.25\nBatch: 110032526"
        );
    }

    #[test]
    fn test_month_and_year_boundaries() {
        let calc = calculator(LabelRule::eight_day());
        let leap = calc.calculate_dates(date(2024, 2, 29)).unwrap();
        assert_eq!(leap.manufacture_date, date(2024, 3, 1));
        assert_eq!(leap.use_by_date, date(2024, 3, 8));

        let new_year = calc.calculate_dates(date(2024, 12, 31)).unwrap();
        assert_eq!(new_year.manufacture_date, date(2025, 1, 1));
        assert_eq!(new_year.use_by_date, date(2025, 1, 8));
        assert_eq!(new_year.batch_code, "131122426");
    }

    #[test]
    fn test_rejects_missing_and_unparseable_input() {
        let calc = calculator(LabelRule::eight_day());
        assert!(matches!(
            calc.calculate_dates_from_input(None),
            Err(LabelError::InvalidInput { .. })
        ));
        assert!(matches!(
            calc.calculate_dates_from_input(Some("   ")),
            Err(LabelError::InvalidInput { .. })
        ));
        assert!(matches!(
            calc.calculate_dates_from_input(Some("not-a-date")),
            Err(LabelError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_year_window() {
        let calc = calculator(LabelRule::eight_day());
        assert_eq!(calc.year_window(), (2024, 2035));
        assert!(calc.calculate_dates(date(2024, 1, 1)).is_ok());
        assert!(calc.calculate_dates(date(2035, 12, 31)).is_ok());

        match calc.calculate_dates_from_input(Some("1990-01-01")) {
            Err(LabelError::OutOfRange { year, min, max }) => {
                assert_eq!((year, min, max), (1990, 2024, 2035));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(matches!(
            calc.calculate_dates(date(2036, 1, 1)),
            Err(LabelError::OutOfRange { .. })
        ));
        assert!(matches!(
            calc.calculate_dates(date(2023, 12, 31)),
            Err(LabelError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_extreme_year_window_saturates() {
        let calc = calculator(LabelRule::eight_day()).with_year_window(i32::MAX, i32::MAX);
        assert_eq!(calc.year_window(), (2025 - i32::MAX, i32::MAX));
        assert!(calc.calculate_dates(date(2026, 3, 10)).is_ok());
    }

    #[test]
    fn test_today_uses_configured_offset() {
        // 2024-12-31 20:00 UTC 在 IST 已是 2025-01-01
        let calc = BatchCodeCalculator::new(LabelRule::eight_day())
            .unwrap()
            .with_clock(FixedClock(Utc.with_ymd_and_hms(2024, 12, 31, 20, 0, 0).unwrap()));
        let result = calc.calculate_today().unwrap();
        assert_eq!(result.reference_date, date(2025, 1, 1));
        assert_eq!(result.batch_code, "101012526");

        let utc = calc.with_utc_offset(0);
        assert_eq!(utc.today(), date(2024, 12, 31));
    }

    #[test]
    fn test_invalid_rules_are_rejected() {
        assert!(BatchCodeCalculator::new(LabelRule::new(1, "26")).is_err());
        assert!(BatchCodeCalculator::new(LabelRule::new(8, "6")).is_err());
        assert!(BatchCodeCalculator::new(LabelRule::eight_day().with_header_line("RS\n80")).is_err());
        assert!(BatchCodeCalculator::new(LabelRule::eight_day().with_header_line(" ")).is_err());
    }

    #[test]
    fn test_parse_batch_code() {
        let parts = parse_batch_code("110032526").unwrap();
        assert_eq!(parts.day, 10);
        assert_eq!(parts.month, 3);
        assert_eq!(parts.year_two_digit, 25);
        assert_eq!(parts.suffix, "26");

        assert!(parse_batch_code("210032526").is_err());
        assert!(parse_batch_code("11003252").is_err());
        assert!(parse_batch_code("1100325a6").is_err());
        assert!(parse_batch_code("199132526").is_err());
    }

    #[test]
    fn test_label_text_has_four_lines_without_trailing_newline() {
        let result = calculator(LabelRule::nine_day())
            .calculate_dates(date(2025, 7, 1))
            .unwrap();
        let lines: Vec<&str> = result.label_lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("RS: "));
        assert!(lines[1].starts_with("PKD: "));
        assert!(lines[2].starts_with("USE BY: "));
        assert!(lines[3].starts_with("Batch: "));
        assert!(!result.label_text.ends_with('\n'));
    }
}
