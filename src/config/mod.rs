pub mod toml_config;

use crate::core::calculator::{DEFAULT_YEARS_AHEAD, DEFAULT_YEARS_BACK, MAX_YEAR_WINDOW};
use crate::core::clock::DEFAULT_UTC_OFFSET_MINUTES;
use crate::core::verification::DEFAULT_RECOGNITION_TIMEOUT;
use crate::domain::model::LabelRule;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use toml_config::TomlConfig;

/// Named shelf-life rules seen on the production floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum RulePreset {
    /// USE BY +8 days, batch suffix 26
    EightDay,
    /// USE BY +9 days, batch suffix 25
    NineDay,
}

impl RulePreset {
    pub fn rule(&self) -> LabelRule {
        match self {
            RulePreset::EightDay => LabelRule::eight_day(),
            RulePreset::NineDay => LabelRule::nine_day(),
        }
    }
}

/// Effective settings after merging the config file with command-line overrides.
#[derive(Debug, Clone)]
pub struct LabelSettings {
    pub rule: Option<LabelRule>,
    pub utc_offset_minutes: i32,
    pub years_back: i32,
    pub years_ahead: i32,
    pub output_directory: Option<String>,
    pub recognition_timeout_seconds: u64,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            rule: None,
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
            years_back: DEFAULT_YEARS_BACK,
            years_ahead: DEFAULT_YEARS_AHEAD,
            output_directory: None,
            recognition_timeout_seconds: DEFAULT_RECOGNITION_TIMEOUT.as_secs(),
        }
    }
}

impl From<&TomlConfig> for LabelSettings {
    fn from(config: &TomlConfig) -> Self {
        Self {
            rule: config.label_rule(),
            utc_offset_minutes: config.utc_offset_minutes(),
            years_back: config.years_back(),
            years_ahead: config.years_ahead(),
            output_directory: config.output_directory().map(str::to_string),
            recognition_timeout_seconds: config.recognition_timeout_seconds(),
        }
    }
}

impl LabelSettings {
    /// `--save` 優先於 [output] directory
    pub fn save_directory<'a>(&'a self, requested: Option<&'a str>) -> Result<Option<&'a str>> {
        match requested {
            Some(directory) => {
                crate::utils::validation::validate_path("--save", directory)?;
                Ok(Some(directory))
            }
            None => Ok(self.output_directory.as_deref()),
        }
    }
}

impl ConfigProvider for LabelSettings {
    fn label_rule(&self) -> Option<LabelRule> {
        self.rule.clone()
    }

    fn utc_offset_minutes(&self) -> i32 {
        self.utc_offset_minutes
    }

    fn years_back(&self) -> i32 {
        self.years_back
    }

    fn years_ahead(&self) -> i32 {
        self.years_ahead
    }
}

impl Validate for LabelSettings {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        if let Some(rule) = &self.rule {
            rule.validate()?;
        }
        validate_range(
            "calendar.utc_offset_minutes",
            self.utc_offset_minutes,
            -12 * 60,
            14 * 60,
        )?;
        validate_range("calendar.years_back", self.years_back, 0, MAX_YEAR_WINDOW)?;
        validate_range("calendar.years_ahead", self.years_ahead, 0, MAX_YEAR_WINDOW)?;
        if let Some(directory) = &self.output_directory {
            validate_path("output.directory", directory)?;
        }
        validate_positive_number(
            "verification.timeout_seconds",
            self.recognition_timeout_seconds,
            1,
        )?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command, OutputFormat};

#[cfg(feature = "cli")]
mod cli {
    use super::{LabelSettings, RulePreset, TomlConfig};
    use crate::domain::model::ImageKind;
    use crate::utils::error::Result;
    use crate::utils::validation::Validate;
    use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
    use std::path::PathBuf;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "batch-label")]
    #[command(about = "Packaging dates, batch codes and label checks for the production line")]
    pub struct CliConfig {
        /// Path to TOML configuration file
        #[arg(short, long, global = true)]
        pub config: Option<PathBuf>,

        /// Shelf-life rule; overrides [label] in the config file
        #[arg(long, value_enum, global = true)]
        pub preset: Option<RulePreset>,

        /// Minutes east of UTC used to decide "today"
        #[arg(long, global = true, allow_hyphen_values = true)]
        pub utc_offset_minutes: Option<i32>,

        #[arg(short, long, global = true, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, global = true, help = "Emit logs as JSON")]
        pub json_logs: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    pub enum OutputFormat {
        Text,
        Json,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Derive PKD, USE BY, batch code and label text
        Calculate {
            /// Reference date (YYYY-MM-DD); defaults to today
            #[arg(long)]
            date: Option<String>,

            #[arg(long, value_enum, default_value = "text")]
            format: OutputFormat,

            /// Directory to save the label record into
            #[arg(long)]
            save: Option<String>,
        },
        /// Format a date with DD.MM.YY or DDMMYY
        Format {
            #[arg(long)]
            date: String,

            #[arg(long, default_value = "DD.MM.YY")]
            pattern: String,
        },
        /// Printing, packing and bag-making dates before the selected date
        Schedule {
            #[arg(long)]
            date: Option<String>,
        },
        /// Raw material quantities for an estimated batch weight (kg)
        Materials {
            #[arg(long)]
            weight: String,
        },
        /// Compare recognized label text with the expected label
        #[command(group(ArgGroup::new("observed_source").required(true).args(["observed", "transcript"])))]
        Verify {
            #[arg(long)]
            date: Option<String>,

            /// Recognized text given inline
            #[arg(long)]
            observed: Option<String>,

            /// File holding the recognized text
            #[arg(long)]
            transcript: Option<PathBuf>,
        },
        /// Decode a batch code back into its date and suffix
        Decode {
            #[arg(long)]
            code: String,
        },
        /// Storage key for an uploaded label image
        ObjectKey {
            #[arg(long, value_enum, default_value = "batch-code")]
            kind: ImageKind,

            /// Original file name of the image
            #[arg(long)]
            file: String,

            #[arg(long)]
            date: Option<String>,

            /// Fixed token instead of a random one (ASCII letters and digits)
            #[arg(long)]
            token: Option<String>,

            /// MIME type of the image; checked together with --size
            #[arg(long, requires = "size")]
            content_type: Option<String>,

            /// Image size in bytes
            #[arg(long, requires = "content_type")]
            size: Option<u64>,
        },
        /// Full storage key for a stored image given its key or bare name
        ResolveKey {
            #[arg(long, value_enum, default_value = "batch-code")]
            kind: ImageKind,

            #[arg(long)]
            name: String,
        },
    }

    impl CliConfig {
        /// 讀取設定檔並套用命令列覆蓋
        pub fn settings(&self) -> Result<LabelSettings> {
            let mut settings = match &self.config {
                Some(path) => {
                    let file_config = TomlConfig::from_file(path)?;
                    file_config.validate()?;
                    tracing::debug!("Loaded configuration from {}", path.display());
                    LabelSettings::from(&file_config)
                }
                None => LabelSettings::default(),
            };

            if let Some(preset) = self.preset {
                tracing::debug!("Shelf-life rule overridden to {:?}", preset);
                settings.rule = Some(preset.rule());
            }
            if let Some(offset) = self.utc_offset_minutes {
                settings.utc_offset_minutes = offset;
            }

            settings.validate()?;
            Ok(settings)
        }
    }
}
