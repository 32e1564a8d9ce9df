use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client as S3Client;
use clap::Parser;
use facility_etl::utils::{logger, validation::Validate};
use facility_etl::{
    CliConfig, ConfigProvider, EtlEngine, FacilityPipeline, LocalStorage, RunOutcome, S3Storage,
    Storage,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting facility-etl CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let outcome = match config.local_dir.clone() {
        Some(dir) => {
            tracing::info!("Using local storage at {}", dir);
            run(LocalStorage::new(dir), config).await
        }
        None => {
            let shared = aws_config::defaults(BehaviorVersion::latest())
                .region(Region::new(config.region.clone()))
                .load()
                .await;
            run(S3Storage::new(S3Client::new(&shared)), config).await
        }
    };

    match outcome {
        Ok(outcome) => {
            tracing::info!("Healthcare facility processing completed successfully");
            match outcome {
                RunOutcome::NoInput => {
                    println!("⚠️  No input files found; nothing was written");
                }
                RunOutcome::Placeholder { key } => {
                    println!("✅ Processing complete, no expiring facilities found");
                    println!("📁 Placeholder written to: {}", key);
                }
                RunOutcome::Filtered {
                    facilities_key,
                    summary_key,
                    facilities_found,
                } => {
                    println!(
                        "✅ Processing complete, {} facility(ies) with expiring accreditations",
                        facilities_found
                    );
                    println!("📁 Filtered facilities: {}", facilities_key);
                    println!("📁 Processing summary: {}", summary_key);
                }
            }
        }
        Err(e) => {
            tracing::error!("Application failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn run<S: Storage>(storage: S, config: CliConfig) -> facility_etl::Result<RunOutcome> {
    // Connectivity check up front; a failure here aborts before any
    // processing starts.
    storage.head_bucket(config.input_bucket()).await?;
    tracing::info!("Successfully connected to storage");

    let pipeline = FacilityPipeline::new(storage, config);
    EtlEngine::new(pipeline).run().await
}
