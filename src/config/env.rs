use crate::core::ConfigProvider;
use crate::utils::validation::{
    validate_aws_region, validate_bucket_name, validate_key_prefix, validate_range, Validate,
};
use std::env;

/// Environment-driven configuration, used by the Lambda entry point. Every
/// variable is optional and falls back to the documented default.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub input_bucket: String,
    pub output_bucket: String,
    pub input_prefix: String,
    pub output_prefix: String,
    pub threshold_months: u32,
    pub region: String,
}

impl EnvConfig {
    pub fn from_env() -> crate::utils::error::Result<Self> {
        let threshold_months = match env::var("EXPIRY_THRESHOLD_MONTHS") {
            Ok(raw) => raw.parse().map_err(|_| crate::utils::error::EtlError::ConfigError {
                message: format!("EXPIRY_THRESHOLD_MONTHS is not a valid number: {}", raw),
            })?,
            Err(_) => 6,
        };

        Ok(Self {
            input_bucket: env::var("INPUT_BUCKET")
                .unwrap_or_else(|_| "healthcare-facility-data".to_string()),
            output_bucket: env::var("OUTPUT_BUCKET")
                .unwrap_or_else(|_| "healthcare-facility-data".to_string()),
            input_prefix: env::var("INPUT_PREFIX").unwrap_or_else(|_| "input/".to_string()),
            output_prefix: env::var("OUTPUT_PREFIX").unwrap_or_else(|_| "filtered/".to_string()),
            threshold_months,
            region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
        })
    }
}

impl ConfigProvider for EnvConfig {
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

impl Validate for EnvConfig {
    fn validate(&self) -> crate::utils::error::Result<()> {
        validate_bucket_name("input_bucket", &self.input_bucket)?;
        validate_bucket_name("output_bucket", &self.output_bucket)?;
        validate_key_prefix("input_prefix", &self.input_prefix)?;
        validate_key_prefix("output_prefix", &self.output_prefix)?;
        validate_range("threshold_months", self.threshold_months, 1, 120)?;
        validate_aws_region("region", &self.region)?;

        tracing::info!("Environment configuration validation passed");
        Ok(())
    }
}
