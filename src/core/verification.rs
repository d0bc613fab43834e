use std::time::Duration;

use crate::domain::model::{DateLabelResult, VerificationOutcome};
use crate::domain::ports::TextRecognizer;
use crate::utils::error::{LabelError, Result};

pub const DEFAULT_RECOGNITION_TIMEOUT: Duration = Duration::from_secs(30);

/// Case-insensitive comparison of trimmed label text.
pub fn match_label(expected_text: &str, observed_text: &str) -> bool {
    expected_text.trim().to_lowercase() == observed_text.trim().to_lowercase()
}

pub struct LabelVerifier<R: TextRecognizer> {
    recognizer: R,
    timeout: Duration,
}

impl<R: TextRecognizer> LabelVerifier<R> {
    pub fn new(recognizer: R) -> Self {
        Self {
            recognizer,
            timeout: DEFAULT_RECOGNITION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn verify(
        &self,
        expected: &DateLabelResult,
        image: &[u8],
    ) -> Result<VerificationOutcome> {
        tracing::debug!(
            "Recognizing label for batch {} ({} bytes)",
            expected.batch_code,
            image.len()
        );

        let recognized_text =
            match tokio::time::timeout(self.timeout, self.recognizer.recognize_text(image)).await {
                Ok(result) => result?,
                Err(_) => {
                    tracing::warn!("Text recognition timed out after {:?}", self.timeout);
                    return Err(LabelError::RecognitionTimeout {
                        seconds: self.timeout.as_secs(),
                    });
                }
            };

        let matched = match_label(&expected.label_text, &recognized_text);
        if matched {
            tracing::info!("✅ Label matches batch {}", expected.batch_code);
        } else {
            tracing::warn!("❌ Label mismatch for batch {}", expected.batch_code);
        }

        Ok(VerificationOutcome {
            matched,
            expected_text: expected.label_text.clone(),
            recognized_text,
        })
    }
}
