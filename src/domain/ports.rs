use crate::domain::model::LabelRule;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    /// `None` 代表尚未選定保存期限規則
    fn label_rule(&self) -> Option<LabelRule>;
    fn utc_offset_minutes(&self) -> i32;
    fn years_back(&self) -> i32;
    fn years_ahead(&self) -> i32;
}

/// Source of the current instant. Injected so "today" is testable.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Turns a photographed label into text.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize_text(&self, image: &[u8]) -> Result<String>;
}
