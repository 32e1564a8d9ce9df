#[cfg(feature = "cli")]
pub mod cli;
pub mod env;
pub mod s3;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "facility-etl")]
#[command(about = "Filters healthcare facilities with expiring accreditations")]
pub struct CliConfig {
    #[arg(long, default_value = "healthcare-facility-data")]
    pub input_bucket: String,

    #[arg(long, default_value = "healthcare-facility-data")]
    pub output_bucket: String,

    #[arg(long, default_value = "input/")]
    pub input_prefix: String,

    #[arg(long, default_value = "filtered/")]
    pub output_prefix: String,

    #[arg(long, default_value = "6", help = "Expiry horizon in months (30 days each)")]
    pub threshold_months: u32,

    #[arg(long, default_value = "us-east-1")]
    pub region: String,

    #[arg(
        long,
        help = "Run against a local directory instead of S3 (buckets become subdirectories)"
    )]
    pub local_dir: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_bucket(&self) -> &str {
        &self.input_bucket
    }

    fn output_bucket(&self) -> &str {
        &self.output_bucket
    }

    fn input_prefix(&self) -> &str {
        &self.input_prefix
    }

    fn output_prefix(&self) -> &str {
        &self.output_prefix
    }

    fn threshold_months(&self) -> u32 {
        self.threshold_months
    }
}

#[cfg(feature = "cli")]
impl crate::utils::validation::Validate for CliConfig {
    fn validate(&self) -> crate::utils::error::Result<()> {
        use crate::utils::validation::*;

        if self.local_dir.is_none() {
            validate_bucket_name("input_bucket", &self.input_bucket)?;
            validate_bucket_name("output_bucket", &self.output_bucket)?;
            validate_aws_region("region", &self.region)?;
        } else {
            validate_non_empty_string("input_bucket", &self.input_bucket)?;
            validate_non_empty_string("output_bucket", &self.output_bucket)?;
        }

        validate_key_prefix("input_prefix", &self.input_prefix)?;
        validate_key_prefix("output_prefix", &self.output_prefix)?;
        validate_range("threshold_months", self.threshold_months, 1, 120)?;

        tracing::debug!("CLI configuration validation passed");
        Ok(())
    }
}
