use crate::domain::model::DateLabelResult;
use crate::domain::ports::Storage;
use crate::utils::error::Result;

const LABEL_DIR: &str = "labels";

/// Keeps computed labels as `labels/<batch>.json` plus a printable `.txt`.
pub struct LabelStore<S: Storage> {
    storage: S,
}

impl<S: Storage> LabelStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    fn record_path(batch_code: &str) -> String {
        format!("{}/{}.json", LABEL_DIR, batch_code)
    }

    fn text_path(batch_code: &str) -> String {
        format!("{}/{}.txt", LABEL_DIR, batch_code)
    }

    /// Returns the path of the JSON record.
    pub async fn save(&self, result: &DateLabelResult) -> Result<String> {
        let record_path = Self::record_path(&result.batch_code);
        let json = serde_json::to_vec_pretty(result)?;
        self.storage.write_file(&record_path, &json).await?;
        self.storage
            .write_file(&Self::text_path(&result.batch_code), result.label_text.as_bytes())
            .await?;

        tracing::debug!("Saved label record to {}", record_path);
        Ok(record_path)
    }

    pub async fn load(&self, batch_code: &str) -> Result<DateLabelResult> {
        let data = self.storage.read_file(&Self::record_path(batch_code)).await?;
        Ok(serde_json::from_slice(&data)?)
    }
}
