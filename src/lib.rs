pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{cli::LocalStorage, CliConfig};

pub use config::{env::EnvConfig, s3::S3Storage};
pub use core::{etl::EtlEngine, pipeline::FacilityPipeline};
pub use domain::model::RunOutcome;
pub use domain::ports::{ConfigProvider, Pipeline, Storage};
pub use utils::error::{EtlError, Result};
