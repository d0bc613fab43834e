use crate::config::RulePreset;
use crate::core::calculator::{DEFAULT_YEARS_AHEAD, DEFAULT_YEARS_BACK, MAX_YEAR_WINDOW};
use crate::core::clock::DEFAULT_UTC_OFFSET_MINUTES;
use crate::core::verification::DEFAULT_RECOGNITION_TIMEOUT;
use crate::domain::model::LabelRule;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{LabelError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub label: LabelConfig,
    pub calendar: Option<CalendarConfig>,
    pub output: Option<OutputConfig>,
    pub verification: Option<VerificationConfig>,
}

/// 保存期限規則：`preset` 或明確的 `shelf_life_days` + `batch_suffix`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelConfig {
    pub preset: Option<RulePreset>,
    pub shelf_life_days: Option<u32>,
    pub batch_suffix: Option<String>,
    pub header_line: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    pub utc_offset_minutes: Option<i32>,
    pub years_back: Option<i32>,
    pub years_ahead: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub directory: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationConfig {
    pub timeout_seconds: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LabelError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LabelError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${LABEL_SUFFIX})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LabelError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 依 preset 與個別欄位組出規則，個別欄位優先
    pub fn resolve_rule(&self) -> Option<LabelRule> {
        let label = &self.label;
        let mut rule = match (label.preset, label.shelf_life_days, &label.batch_suffix) {
            (Some(preset), _, _) => preset.rule(),
            (None, Some(days), Some(suffix)) => LabelRule::new(days, suffix.clone()),
            _ => return None,
        };

        if let Some(days) = label.shelf_life_days {
            rule.shelf_life_days = days;
        }
        if let Some(suffix) = &label.batch_suffix {
            rule.batch_suffix = suffix.clone();
        }
        if let Some(header) = &label.header_line {
            rule.header_line = header.clone();
        }
        Some(rule)
    }

    pub fn output_directory(&self) -> Option<&str> {
        self.output.as_ref().map(|o| o.directory.as_str())
    }

    pub fn recognition_timeout_seconds(&self) -> u64 {
        self.verification
            .as_ref()
            .and_then(|v| v.timeout_seconds)
            .unwrap_or(DEFAULT_RECOGNITION_TIMEOUT.as_secs())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        use crate::utils::validation::*;

        // 沒有 preset 時，shelf_life_days 與 batch_suffix 必須成對出現
        let label = &self.label;
        if label.preset.is_none()
            && label.shelf_life_days.is_some() != label.batch_suffix.is_some()
        {
            validate_required_field("label.shelf_life_days", &label.shelf_life_days)?;
            validate_required_field("label.batch_suffix", &label.batch_suffix)?;
        }

        if let Some(rule) = self.resolve_rule() {
            rule.validate()?;
        }

        validate_range(
            "calendar.utc_offset_minutes",
            self.utc_offset_minutes(),
            -12 * 60,
            14 * 60,
        )?;
        validate_range("calendar.years_back", self.years_back(), 0, MAX_YEAR_WINDOW)?;
        validate_range("calendar.years_ahead", self.years_ahead(), 0, MAX_YEAR_WINDOW)?;

        if let Some(directory) = self.output_directory() {
            validate_path("output.directory", directory)?;
        }
        validate_positive_number(
            "verification.timeout_seconds",
            self.recognition_timeout_seconds(),
            1,
        )?;

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn label_rule(&self) -> Option<LabelRule> {
        self.resolve_rule()
    }

    fn utc_offset_minutes(&self) -> i32 {
        self.calendar
            .as_ref()
            .and_then(|c| c.utc_offset_minutes)
            .unwrap_or(DEFAULT_UTC_OFFSET_MINUTES)
    }

    fn years_back(&self) -> i32 {
        self.calendar
            .as_ref()
            .and_then(|c| c.years_back)
            .unwrap_or(DEFAULT_YEARS_BACK)
    }

    fn years_ahead(&self) -> i32 {
        self.calendar
            .as_ref()
            .and_then(|c| c.years_ahead)
            .unwrap_or(DEFAULT_YEARS_AHEAD)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
