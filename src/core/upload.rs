//! Naming and metadata for label images handed to object storage.
//!
//! Only the deterministic parts live here: the upload itself and image
//! compression belong to the storage service.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::domain::model::{DateLabelResult, ImageKind, ImageUpload};
use crate::utils::error::{LabelError, Result};
use crate::utils::validation::Validate;

pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;
pub const MAX_METADATA_VALUE_CHARS: usize = 2000;
const DEFAULT_EXTENSION: &str = "jpg";
const TOKEN_LEN: usize = 8;
pub const MAX_TOKEN_LEN: usize = 32;

impl Validate for ImageUpload {
    fn validate(&self) -> Result<()> {
        if !self.content_type.starts_with("image/") {
            return Err(LabelError::InvalidUpload {
                reason: "Please select a valid image file".to_string(),
            });
        }
        if self.size_bytes == 0 {
            return Err(LabelError::InvalidUpload {
                reason: "Image file is empty".to_string(),
            });
        }
        if self.size_bytes > MAX_IMAGE_BYTES {
            return Err(LabelError::InvalidUpload {
                reason: "Image file is too large. Please select a file smaller than 10MB."
                    .to_string(),
            });
        }
        Ok(())
    }
}

/// Short random token that keeps same-day keys apart.
pub fn new_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..TOKEN_LEN].to_string()
}

/// 外部指定的 token 只能是 ASCII 英數字，不可帶路徑分隔
pub fn validate_token(token: &str) -> Result<()> {
    if token.is_empty()
        || token.len() > MAX_TOKEN_LEN
        || !token.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(LabelError::InvalidUpload {
            reason: format!(
                "Token '{}' must be 1 to {} ASCII letters or digits",
                token, MAX_TOKEN_LEN
            ),
        });
    }
    Ok(())
}

fn file_extension(original_name: &str) -> String {
    match original_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => {
            ext.to_ascii_lowercase()
        }
        _ => DEFAULT_EXTENSION.to_string(),
    }
}

/// `<prefix>/MM-YYYY/DD-MM-YYYY_<token>.<ext>`
pub fn object_key(
    kind: ImageKind,
    upload_date: NaiveDate,
    token: &str,
    original_name: &str,
) -> String {
    format!(
        "{}/{}/{}_{}.{}",
        kind.prefix(),
        upload_date.format("%m-%Y"),
        upload_date.format("%d-%m-%Y"),
        token,
        file_extension(original_name)
    )
}

/// Check the image and token, then build its key.
pub fn upload_key(
    kind: ImageKind,
    upload: &ImageUpload,
    upload_date: NaiveDate,
    token: &str,
) -> Result<String> {
    upload.validate()?;
    validate_token(token)?;
    let key = object_key(kind, upload_date, token, &upload.original_name);
    tracing::debug!(
        "🖼️ {} ({} bytes) -> {}",
        upload.original_name,
        upload.size_bytes,
        key
    );
    Ok(key)
}

/// Accept either a full key or a bare file name.
pub fn normalize_object_key(kind: ImageKind, name: &str) -> String {
    let prefix = format!("{}/", kind.prefix());
    if name.starts_with(&prefix) {
        name.to_string()
    } else {
        format!("{}{}", prefix, name.trim_start_matches('/'))
    }
}

/// Make metadata safe to send as HTTP header values.
pub fn sanitize_metadata(metadata: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    metadata
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .filter_map(|(key, value)| {
            let key: String = key
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
                .collect();
            let value: String = value
                .chars()
                .map(|c| if matches!(c, '\r' | '\n' | '\t') { ' ' } else { c })
                .take(MAX_METADATA_VALUE_CHARS)
                .collect();
            (!key.is_empty()).then_some((key, value))
        })
        .collect()
}

/// Metadata attached to an uploaded batch-code image.
pub fn label_metadata(result: &DateLabelResult) -> BTreeMap<String, String> {
    let raw = BTreeMap::from([
        ("referenceDate".to_string(), result.reference_date.to_string()),
        ("manufactureDate".to_string(), result.manufacture_date.to_string()),
        ("useByDate".to_string(), result.use_by_date.to_string()),
        ("batchCode".to_string(), result.batch_code.clone()),
        ("labelText".to_string(), result.label_text.clone()),
    ]);
    sanitize_metadata(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(content_type: &str, size_bytes: u64) -> ImageUpload {
        ImageUpload {
            original_name: "label.png".to_string(),
            content_type: content_type.to_string(),
            size_bytes,
        }
    }

    #[test]
    fn test_upload_validation() {
        assert!(upload("image/png", 2048).validate().is_ok());
        assert!(upload("image/jpeg", MAX_IMAGE_BYTES).validate().is_ok());
        assert!(upload("application/pdf", 2048).validate().is_err());
        assert!(upload("image/png", 0).validate().is_err());
        assert!(upload("image/png", MAX_IMAGE_BYTES + 1).validate().is_err());
    }

    #[test]
    fn test_object_key_layout() {
        let date = NaiveDate::from_ymd_opt(2025, 10, 14).unwrap();
        assert_eq!(
            object_key(ImageKind::BatchCode, date, "abcd1234", "IMG_001.PNG"),
            "batch-code-images/10-2025/14-10-2025_abcd1234.png"
        );
        assert_eq!(
            object_key(ImageKind::Printing, date, "abcd1234", "scan"),
            "printing-images/10-2025/14-10-2025_abcd1234.jpg"
        );
        assert_eq!(
            object_key(ImageKind::Printing, date, "abcd1234", "photo."),
            "printing-images/10-2025/14-10-2025_abcd1234.jpg"
        );
    }

    #[test]
    fn test_new_token_is_short_hex() {
        let token = new_token();
        assert_eq!(token.len(), 8);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_token_must_be_plain_alphanumeric() {
        assert!(validate_token("abcd1234").is_ok());
        assert!(validate_token(&new_token()).is_ok());
        for bad in ["", "../x", "a/b", "a.b", "a b", "ab\\cd", "тoken"] {
            assert!(
                matches!(validate_token(bad), Err(LabelError::InvalidUpload { .. })),
                "{:?}",
                bad
            );
        }
        assert!(validate_token(&"a".repeat(MAX_TOKEN_LEN)).is_ok());
        assert!(validate_token(&"a".repeat(MAX_TOKEN_LEN + 1)).is_err());
    }

    #[test]
    fn test_upload_key_checks_image_and_token() {
        let date = NaiveDate::from_ymd_opt(2025, 10, 14).unwrap();
        assert_eq!(
            upload_key(ImageKind::Printing, &upload("image/png", 2048), date, "abcd1234").unwrap(),
            "printing-images/10-2025/14-10-2025_abcd1234.png"
        );
        assert!(matches!(
            upload_key(ImageKind::Printing, &upload("text/plain", 2048), date, "abcd1234"),
            Err(LabelError::InvalidUpload { .. })
        ));
        assert!(upload_key(
            ImageKind::Printing,
            &upload("image/png", MAX_IMAGE_BYTES + 1),
            date,
            "abcd1234"
        )
        .is_err());
        assert!(upload_key(ImageKind::Printing, &upload("image/png", 2048), date, "../x").is_err());
    }

    #[test]
    fn test_normalize_object_key() {
        assert_eq!(
            normalize_object_key(ImageKind::BatchCode, "10-2025/a.png"),
            "batch-code-images/10-2025/a.png"
        );
        assert_eq!(
            normalize_object_key(ImageKind::BatchCode, "batch-code-images/10-2025/a.png"),
            "batch-code-images/10-2025/a.png"
        );
    }

    #[test]
    fn test_sanitize_metadata() {
        let raw = BTreeMap::from([
            ("uploaded_by".to_string(), "line\tlead\r\n".to_string()),
            ("empty".to_string(), String::new()),
            ("__".to_string(), "dropped".to_string()),
            ("long".to_string(), "x".repeat(2500)),
        ]);
        let clean = sanitize_metadata(&raw);
        assert_eq!(clean.len(), 2);
        assert_eq!(clean["uploadedby"], "line lead  ");
        assert_eq!(clean["long"].len(), MAX_METADATA_VALUE_CHARS);
    }
}
