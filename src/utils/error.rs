use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabelError {
    #[error("Invalid date input '{input}': {reason}")]
    InvalidInput { input: String, reason: String },

    #[error("Invalid weight '{input}': {reason}")]
    InvalidWeight { input: String, reason: String },

    #[error("Year {year} is outside the accepted range {min}..={max}")]
    OutOfRange { year: i32, min: i32, max: i32 },

    #[error("Unsupported date format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Invalid batch code '{code}': {reason}")]
    InvalidBatchCode { code: String, reason: String },

    #[error("Invalid image upload: {reason}")]
    InvalidUpload { reason: String },

    #[error("Text recognition timed out after {seconds}s")]
    RecognitionTimeout { seconds: u64 },

    #[error("Text recognition failed: {message}")]
    Recognition { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

/// 錯誤分類，用於日誌與結束碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    UserInput,
    Configuration,
    Recognition,
    System,
    Programming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LabelError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LabelError::InvalidInput { .. }
            | LabelError::InvalidWeight { .. }
            | LabelError::OutOfRange { .. }
            | LabelError::InvalidBatchCode { .. }
            | LabelError::InvalidUpload { .. } => ErrorCategory::UserInput,
            LabelError::ConfigValidationError { .. }
            | LabelError::InvalidConfigValueError { .. }
            | LabelError::MissingConfigError { .. } => ErrorCategory::Configuration,
            LabelError::RecognitionTimeout { .. } | LabelError::Recognition { .. } => {
                ErrorCategory::Recognition
            }
            LabelError::IoError(_) | LabelError::SerializationError(_) => ErrorCategory::System,
            LabelError::UnsupportedFormat { .. } => ErrorCategory::Programming,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::UserInput => ErrorSeverity::High,
            ErrorCategory::Recognition => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System | ErrorCategory::Programming => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            LabelError::InvalidInput { .. } => {
                "Enter the date as YYYY-MM-DD, for example 2025-03-10".to_string()
            }
            LabelError::InvalidWeight { .. } => {
                "Enter the estimated batch weight in kilograms, for example 12.5".to_string()
            }
            LabelError::OutOfRange { min, max, .. } => {
                format!("Pick a date between the years {} and {}", min, max)
            }
            LabelError::UnsupportedFormat { .. } => {
                "Use one of the supported patterns: DD.MM.YY or DDMMYY".to_string()
            }
            LabelError::InvalidBatchCode { .. } => {
                "A batch code is '1' followed by DDMMYY and a two-digit suffix".to_string()
            }
            LabelError::InvalidUpload { .. } => {
                "Select an image file smaller than 10MB".to_string()
            }
            LabelError::RecognitionTimeout { .. } => {
                "Retake the photo or try the verification again".to_string()
            }
            LabelError::Recognition { .. } => {
                "Check the recognized transcript or image and retry".to_string()
            }
            LabelError::IoError(_) => "Check file paths and permissions".to_string(),
            LabelError::SerializationError(_) => {
                "The stored label record is corrupted; recalculate it".to_string()
            }
            LabelError::ConfigValidationError { field, .. }
            | LabelError::InvalidConfigValueError { field, .. } => {
                format!("Fix the '{}' setting in the configuration file", field)
            }
            LabelError::MissingConfigError { field } => format!(
                "Set '{}' in the configuration file or pass --preset on the command line",
                field
            ),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            LabelError::InvalidInput { .. } => "Please select a valid date".to_string(),
            LabelError::InvalidWeight { .. } => "Please enter a valid weight".to_string(),
            LabelError::OutOfRange { .. } => {
                "Please select a date within a reasonable range".to_string()
            }
            LabelError::InvalidUpload { reason } => reason.clone(),
            LabelError::RecognitionTimeout { .. } => {
                "Label verification took too long".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LabelError>;
