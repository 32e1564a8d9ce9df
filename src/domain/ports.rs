use crate::domain::model::{Extraction, FacilityRecord, FilterResult, RunOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Object-storage collaborator. Mirrors the four operations the pipeline
/// needs: connectivity check, listing, read, write.
pub trait Storage: Send + Sync {
    fn head_bucket(&self, bucket: &str) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Keys under `prefix` ending in `.json`, excluding the prefix marker
    /// key itself, in listing order.
    fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;

    fn read_object(
        &self,
        bucket: &str,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;

    fn write_object(
        &self,
        bucket: &str,
        key: &str,
        data: &[u8],
        content_type: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_bucket(&self) -> &str;
    fn output_bucket(&self) -> &str;
    fn input_prefix(&self) -> &str;
    fn output_prefix(&self) -> &str;
    fn threshold_months(&self) -> u32;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Extraction>;
    async fn transform(&self, facilities: Vec<FacilityRecord>) -> Result<FilterResult>;
    async fn load(&self, result: FilterResult) -> Result<RunOutcome>;
}
