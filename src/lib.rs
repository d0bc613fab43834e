pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{LocalStorage, TranscriptRecognizer};
pub use config::{toml_config::TomlConfig, LabelSettings, RulePreset};
pub use crate::core::{
    calculator::{format_date, parse_batch_code, BatchCodeCalculator},
    store::LabelStore,
    verification::{match_label, LabelVerifier},
};
pub use domain::model::{DateFormat, DateLabelResult, LabelRule};
pub use utils::error::{LabelError, Result};
