pub mod calculator;
pub mod clock;
pub mod materials;
pub mod schedule;
pub mod store;
pub mod upload;
pub mod verification;

pub use crate::domain::model::{DateLabelResult, LabelRule};
pub use crate::domain::ports::{Clock, ConfigProvider, Storage, TextRecognizer};
pub use crate::utils::error::Result;
