use crate::domain::ports::TextRecognizer;
use crate::utils::error::{LabelError, Result};
use async_trait::async_trait;

/// Recognizer for labels that were already transcribed, e.g. by a
/// handheld scanner that exports plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TranscriptRecognizer;

#[async_trait]
impl TextRecognizer for TranscriptRecognizer {
    async fn recognize_text(&self, image: &[u8]) -> Result<String> {
        let text = std::str::from_utf8(image).map_err(|e| LabelError::Recognition {
            message: format!("transcript is not valid UTF-8: {}", e),
        })?;
        // 掃描器常輸出 CRLF
        Ok(text.replace("\r\n", "\n"))
    }
}
