pub mod etl;
pub mod expiry;
pub mod filter;
pub mod parser;
pub mod pipeline;
pub mod report;

pub use crate::domain::model::{Extraction, FacilityRecord, FilterResult, RunOutcome};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
