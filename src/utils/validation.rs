use crate::utils::error::{LabelError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(LabelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(LabelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number<T>(field_name: &str, value: T, min_value: T) -> Result<()>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if value < min_value {
        return Err(LabelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| LabelError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LabelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// 檢查是否為固定長度的 ASCII 數字字串（例如批號尾碼）
pub fn validate_digits(field_name: &str, value: &str, length: usize) -> Result<()> {
    if value.len() != length || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LabelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be exactly {} ASCII digits", length),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(LabelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output.directory", "./labels").is_ok());
        assert!(validate_path("output.directory", "").is_err());
        assert!(validate_path("output.directory", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("label.shelf_life_days", 8u32, 2).is_ok());
        assert!(validate_positive_number("label.shelf_life_days", 1u32, 2).is_err());
    }

    #[test]
    fn test_validate_digits() {
        assert!(validate_digits("label.batch_suffix", "26", 2).is_ok());
        assert!(validate_digits("label.batch_suffix", "2", 2).is_err());
        assert!(validate_digits("label.batch_suffix", "2a", 2).is_err());
        assert!(validate_digits("label.batch_suffix", "２６", 2).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let missing: Option<u32> = None;
        match validate_required_field("label.preset", &missing) {
            Err(LabelError::MissingConfigError { field }) => assert_eq!(field, "label.preset"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(*validate_required_field("x", &Some(3)).unwrap(), 3);
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("calendar.utc_offset_minutes", 330, -720, 840).is_ok());
        assert!(validate_range("calendar.utc_offset_minutes", 900, -720, 840).is_err());
    }
}
