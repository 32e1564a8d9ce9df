use crate::core::{Pipeline, RunOutcome};
use crate::utils::error::Result;

/// Drives one run: list and parse inputs, filter, write outputs. Everything
/// is sequential; a per-file failure is absorbed inside extract, while any
/// write failure surfaces here and ends the run.
pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunOutcome> {
        tracing::info!("Starting healthcare facility processing");

        let extraction = self.pipeline.extract().await?;
        if extraction.files_listed == 0 {
            tracing::warn!("No JSON files found in input location");
            return Ok(RunOutcome::NoInput);
        }
        tracing::info!(
            "Extracted {} facilities from {} files",
            extraction.facilities.len(),
            extraction.files_listed
        );

        let result = self.pipeline.transform(extraction.facilities).await?;
        tracing::info!(
            "Processing complete. Found {} facilities with expiring accreditations",
            result.filtered.len()
        );

        self.pipeline.load(result).await
    }
}
