#[cfg(feature = "lambda")]
use aws_config::BehaviorVersion;
#[cfg(feature = "lambda")]
use aws_sdk_s3::config::Region;
#[cfg(feature = "lambda")]
use aws_sdk_s3::Client as S3Client;
#[cfg(feature = "lambda")]
use facility_etl::utils::validation::Validate;
#[cfg(feature = "lambda")]
use facility_etl::{
    ConfigProvider, EnvConfig, EtlEngine, FacilityPipeline, RunOutcome, S3Storage, Storage,
};
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "lambda")]
#[derive(Deserialize)]
pub struct Request {
    pub input_bucket: Option<String>,
    pub output_bucket: Option<String>,
    pub input_prefix: Option<String>,
    pub output_prefix: Option<String>,
}

#[cfg(feature = "lambda")]
#[derive(Serialize)]
pub struct Response {
    pub message: String,
    pub output_key: Option<String>,
    pub facilities_found: usize,
}

#[cfg(feature = "lambda")]
async fn function_handler(event: LambdaEvent<Request>) -> Result<Response, Error> {
    tracing::info!("Starting facility filter Lambda function");

    // Event fields override the environment when present.
    if let Some(bucket) = &event.payload.input_bucket {
        std::env::set_var("INPUT_BUCKET", bucket);
    }
    if let Some(bucket) = &event.payload.output_bucket {
        std::env::set_var("OUTPUT_BUCKET", bucket);
    }
    if let Some(prefix) = &event.payload.input_prefix {
        std::env::set_var("INPUT_PREFIX", prefix);
    }
    if let Some(prefix) = &event.payload.output_prefix {
        std::env::set_var("OUTPUT_PREFIX", prefix);
    }

    let config = EnvConfig::from_env()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    config
        .validate()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    let shared = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let s3_config = aws_sdk_s3::config::Builder::from(&shared)
        .region(Region::new(config.region.clone()))
        .force_path_style(true)
        .build();
    let storage = S3Storage::new(S3Client::from_conf(s3_config));

    storage
        .head_bucket(config.input_bucket())
        .await
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    tracing::info!("Successfully connected to S3");

    let pipeline = FacilityPipeline::new(storage, config);
    let outcome = EtlEngine::new(pipeline)
        .run()
        .await
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    let response = match outcome {
        RunOutcome::NoInput => Response {
            message: "No input files found".to_string(),
            output_key: None,
            facilities_found: 0,
        },
        RunOutcome::Placeholder { key } => Response {
            message: "No facilities with expiring accreditations found".to_string(),
            output_key: Some(key),
            facilities_found: 0,
        },
        RunOutcome::Filtered {
            facilities_key,
            summary_key,
            facilities_found,
        } => {
            tracing::info!("Processing summary written to {}", summary_key);
            Response {
                message: "Facility processing completed successfully".to_string(),
                output_key: Some(facilities_key),
                facilities_found,
            }
        }
    };

    tracing::info!("Facility filter Lambda function completed successfully");
    Ok(response)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    facility_etl::utils::logger::init_lambda_logger();

    run(service_fn(function_handler)).await
}
