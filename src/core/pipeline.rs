use crate::core::filter::filter_expiring_facilities;
use crate::core::parser::parse_facilities;
use crate::core::report::{
    build_placeholder, build_summary, facilities_key, placeholder_key, run_timestamp, summary_key,
    to_pretty_json, JSON_CONTENT_TYPE,
};
use crate::core::{ConfigProvider, Extraction, FacilityRecord, FilterResult, RunOutcome, Storage};
use crate::utils::error::Result;

pub struct FacilityPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> FacilityPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    async fn read_and_parse(&self, key: &str) -> Result<Vec<FacilityRecord>> {
        tracing::info!(
            "Reading file from s3://{}/{}",
            self.config.input_bucket(),
            key
        );
        let content = self
            .storage
            .read_object(self.config.input_bucket(), key)
            .await?;
        parse_facilities(&content, key)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> crate::core::Pipeline for FacilityPipeline<S, C> {
    /// Lists the input prefix and parses every `.json` object found there.
    /// A file that fails to read or parse is skipped; the rest of the batch
    /// still goes through.
    async fn extract(&self) -> Result<Extraction> {
        let keys = self
            .storage
            .list_objects(self.config.input_bucket(), self.config.input_prefix())
            .await?;
        tracing::info!("Found {} JSON files in input location", keys.len());

        let files_listed = keys.len();
        let mut facilities = Vec::new();

        for key in keys {
            tracing::info!("Processing file: {}", key);
            match self.read_and_parse(&key).await {
                Ok(mut parsed) => facilities.append(&mut parsed),
                Err(e) => {
                    tracing::error!("Error processing file {}: {}", key, e);
                    continue;
                }
            }
        }

        Ok(Extraction {
            files_listed,
            facilities,
        })
    }

    async fn transform(&self, facilities: Vec<FacilityRecord>) -> Result<FilterResult> {
        let total_input = facilities.len();
        let filtered = filter_expiring_facilities(&facilities, self.config.threshold_months());
        Ok(FilterResult {
            filtered,
            total_input,
        })
    }

    /// Writes the run artifacts. Any write failure here is fatal for the run.
    async fn load(&self, result: FilterResult) -> Result<RunOutcome> {
        let bucket = self.config.output_bucket();
        let prefix = self.config.output_prefix();
        let timestamp = run_timestamp();

        if result.filtered.is_empty() {
            tracing::info!("No facilities found with expiring accreditations");

            let key = placeholder_key(prefix, &timestamp);
            let body = to_pretty_json(&build_placeholder())?;
            self.storage
                .write_object(bucket, &key, &body, JSON_CONTENT_TYPE)
                .await?;
            tracing::info!("Wrote placeholder result to s3://{}/{}", bucket, key);

            return Ok(RunOutcome::Placeholder { key });
        }

        let facilities_key = facilities_key(prefix, &timestamp);
        let body = to_pretty_json(&result.filtered)?;
        self.storage
            .write_object(bucket, &facilities_key, &body, JSON_CONTENT_TYPE)
            .await?;
        tracing::info!(
            "Successfully wrote {} filtered records to s3://{}/{}",
            result.filtered.len(),
            bucket,
            facilities_key
        );

        let output_location = format!("s3://{}/{}", bucket, facilities_key);
        let summary = build_summary(
            &result.filtered,
            &output_location,
            self.config.threshold_months(),
        );
        let summary_key = summary_key(prefix, &timestamp);
        let summary_body = to_pretty_json(&summary)?;
        self.storage
            .write_object(bucket, &summary_key, &summary_body, JSON_CONTENT_TYPE)
            .await?;
        tracing::info!("Created processing summary at s3://{}/{}", bucket, summary_key);

        Ok(RunOutcome::Filtered {
            facilities_key,
            summary_key,
            facilities_found: result.filtered.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{etl::EtlEngine, Pipeline};
    use crate::utils::error::EtlError;
    use chrono::{Duration, Local};
    use serde_json::json;
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        objects: Arc<Mutex<HashMap<(String, String), Vec<u8>>>>,
        unreadable: Arc<Mutex<HashSet<String>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self::default()
        }

        async fn seed(&self, bucket: &str, key: &str, data: &[u8]) {
            let mut objects = self.objects.lock().await;
            objects.insert((bucket.to_string(), key.to_string()), data.to_vec());
        }

        /// Key shows up in listings but reads fail, like a deleted object.
        async fn seed_unreadable(&self, bucket: &str, key: &str) {
            self.seed(bucket, key, b"").await;
            let mut unreadable = self.unreadable.lock().await;
            unreadable.insert(key.to_string());
        }

        async fn get(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
            let objects = self.objects.lock().await;
            objects.get(&(bucket.to_string(), key.to_string())).cloned()
        }

        async fn keys_with_prefix(&self, bucket: &str, prefix: &str) -> Vec<String> {
            let objects = self.objects.lock().await;
            let mut keys: Vec<String> = objects
                .keys()
                .filter(|(b, k)| b == bucket && k.starts_with(prefix))
                .map(|(_, k)| k.clone())
                .collect();
            keys.sort();
            keys
        }
    }

    impl Storage for MockStorage {
        async fn head_bucket(&self, _bucket: &str) -> Result<()> {
            Ok(())
        }

        async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
            Ok(self
                .keys_with_prefix(bucket, prefix)
                .await
                .into_iter()
                .filter(|k| k.ends_with(".json") && k.as_str() != prefix)
                .collect())
        }

        async fn read_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
            let unreadable = self.unreadable.lock().await;
            if unreadable.contains(key) {
                return Err(EtlError::StorageError {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                    message: "NoSuchKey".to_string(),
                });
            }
            drop(unreadable);

            self.get(bucket, key).await.ok_or_else(|| EtlError::StorageError {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: "NoSuchKey".to_string(),
            })
        }

        async fn write_object(
            &self,
            bucket: &str,
            key: &str,
            data: &[u8],
            _content_type: &str,
        ) -> Result<()> {
            self.seed(bucket, key, data).await;
            Ok(())
        }
    }

    struct MockConfig;

    impl ConfigProvider for MockConfig {
        fn input_bucket(&self) -> &str {
            "facility-data"
        }

        fn output_bucket(&self) -> &str {
            "facility-data"
        }

        fn input_prefix(&self) -> &str {
            "input/"
        }

        fn output_prefix(&self) -> &str {
            "filtered/"
        }

        fn threshold_months(&self) -> u32 {
            6
        }
    }

    fn soon() -> String {
        (Local::now().date_naive() + Duration::days(30))
            .format("%Y-%m-%d")
            .to_string()
    }

    fn distant() -> String {
        (Local::now().date_naive() + Duration::days(365))
            .format("%Y-%m-%d")
            .to_string()
    }

    fn facility_json(id: &str, valid_until: &str) -> serde_json::Value {
        json!({
            "facility_id": id,
            "facility_name": format!("Facility {}", id),
            "accreditations": [
                {"accreditation_body": "Joint Commission", "valid_until": valid_until}
            ]
        })
    }

    #[tokio::test]
    async fn test_extract_aggregates_across_files() {
        let storage = MockStorage::new();
        storage
            .seed(
                "facility-data",
                "input/a.json",
                serde_json::to_vec(&json!([facility_json("FAC001", &soon())])).unwrap().as_slice(),
            )
            .await;
        storage
            .seed(
                "facility-data",
                "input/b.json",
                format!("{}\n{}\n", facility_json("FAC002", &soon()), facility_json("FAC003", &distant()))
                    .as_bytes(),
            )
            .await;

        let pipeline = FacilityPipeline::new(storage, MockConfig);
        let extraction = pipeline.extract().await.unwrap();

        assert_eq!(extraction.files_listed, 2);
        assert_eq!(extraction.facilities.len(), 3);
    }

    #[tokio::test]
    async fn test_extract_skips_unreadable_file() {
        let storage = MockStorage::new();
        storage
            .seed(
                "facility-data",
                "input/a.json",
                serde_json::to_vec(&json!([facility_json("FAC001", &soon())])).unwrap().as_slice(),
            )
            .await;
        storage.seed_unreadable("facility-data", "input/gone.json").await;
        storage
            .seed(
                "facility-data",
                "input/c.json",
                serde_json::to_vec(&json!([facility_json("FAC002", &soon())])).unwrap().as_slice(),
            )
            .await;

        let pipeline = FacilityPipeline::new(storage, MockConfig);
        let extraction = pipeline.extract().await.unwrap();

        assert_eq!(extraction.files_listed, 3);
        assert_eq!(extraction.facilities.len(), 2);
    }

    #[tokio::test]
    async fn test_extract_skips_non_array_top_level() {
        let storage = MockStorage::new();
        storage
            .seed(
                "facility-data",
                "input/object.json",
                // Single object spread over lines: invalid as an array and
                // unparseable line by line, so it contributes nothing.
                b"{\n  \"facility_id\": \"FAC001\"\n}",
            )
            .await;
        storage
            .seed(
                "facility-data",
                "input/good.json",
                serde_json::to_vec(&json!([facility_json("FAC002", &soon())])).unwrap().as_slice(),
            )
            .await;

        let pipeline = FacilityPipeline::new(storage, MockConfig);
        let extraction = pipeline.extract().await.unwrap();

        assert_eq!(extraction.files_listed, 2);
        assert_eq!(extraction.facilities.len(), 1);
        assert_eq!(extraction.facilities[0].facility_id(), "FAC002");
    }

    #[tokio::test]
    async fn test_list_excludes_non_json_and_marker_keys() {
        let storage = MockStorage::new();
        storage.seed("facility-data", "input/", b"").await;
        storage.seed("facility-data", "input/readme.txt", b"hi").await;
        storage
            .seed(
                "facility-data",
                "input/a.json",
                serde_json::to_vec(&json!([])).unwrap().as_slice(),
            )
            .await;

        let pipeline = FacilityPipeline::new(storage, MockConfig);
        let extraction = pipeline.extract().await.unwrap();

        assert_eq!(extraction.files_listed, 1);
    }

    #[tokio::test]
    async fn test_full_run_writes_filtered_and_summary() {
        let storage = MockStorage::new();
        storage
            .seed(
                "facility-data",
                "input/facilities.json",
                serde_json::to_vec(&json!([
                    facility_json("FAC001", &soon()),
                    facility_json("FAC002", &distant()),
                ]))
                .unwrap()
                .as_slice(),
            )
            .await;

        let pipeline = FacilityPipeline::new(storage.clone(), MockConfig);
        let outcome = EtlEngine::new(pipeline).run().await.unwrap();

        let RunOutcome::Filtered {
            facilities_key,
            summary_key,
            facilities_found,
        } = outcome
        else {
            panic!("expected filtered outcome, got {:?}", outcome);
        };
        assert_eq!(facilities_found, 1);

        let filtered: Vec<serde_json::Value> = serde_json::from_slice(
            &storage.get("facility-data", &facilities_key).await.unwrap(),
        )
        .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0]["facility_id"], "FAC001");
        assert!(filtered[0]["_processing_metadata"].is_object());

        let summary: serde_json::Value =
            serde_json::from_slice(&storage.get("facility-data", &summary_key).await.unwrap())
                .unwrap();
        assert_eq!(summary["total_facilities_processed"], 1);
        assert_eq!(
            summary["output_location"],
            format!("s3://facility-data/{}", facilities_key)
        );
        assert_eq!(summary["facilities_summary"][0]["expiring_count"], 1);
    }

    #[tokio::test]
    async fn test_empty_aggregate_writes_placeholder_only() {
        let storage = MockStorage::new();
        storage
            .seed(
                "facility-data",
                "input/facilities.json",
                serde_json::to_vec(&json!([facility_json("FAC002", &distant())]))
                    .unwrap()
                    .as_slice(),
            )
            .await;

        let pipeline = FacilityPipeline::new(storage.clone(), MockConfig);
        let outcome = EtlEngine::new(pipeline).run().await.unwrap();

        let RunOutcome::Placeholder { key } = outcome else {
            panic!("expected placeholder outcome, got {:?}", outcome);
        };
        assert!(key.starts_with("filtered/no_expiring_facilities_"));

        let payload: Vec<serde_json::Value> =
            serde_json::from_slice(&storage.get("facility-data", &key).await.unwrap()).unwrap();
        assert_eq!(payload.len(), 1);
        assert_eq!(
            payload[0]["message"],
            "No facilities with expiring accreditations found"
        );

        // No summary for an empty aggregate.
        let outputs = storage.keys_with_prefix("facility-data", "filtered/").await;
        assert_eq!(outputs, vec![key]);
    }

    #[tokio::test]
    async fn test_no_input_files_writes_nothing() {
        let storage = MockStorage::new();

        let pipeline = FacilityPipeline::new(storage.clone(), MockConfig);
        let outcome = EtlEngine::new(pipeline).run().await.unwrap();

        assert_eq!(outcome, RunOutcome::NoInput);
        assert!(storage
            .keys_with_prefix("facility-data", "filtered/")
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_is_fatal() {
        #[derive(Clone)]
        struct ReadOnlyStorage(MockStorage);

        impl Storage for ReadOnlyStorage {
            async fn head_bucket(&self, bucket: &str) -> Result<()> {
                self.0.head_bucket(bucket).await
            }

            async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
                self.0.list_objects(bucket, prefix).await
            }

            async fn read_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
                self.0.read_object(bucket, key).await
            }

            async fn write_object(
                &self,
                bucket: &str,
                key: &str,
                _data: &[u8],
                _content_type: &str,
            ) -> Result<()> {
                Err(EtlError::StorageError {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                    message: "AccessDenied".to_string(),
                })
            }
        }

        let inner = MockStorage::new();
        inner
            .seed(
                "facility-data",
                "input/facilities.json",
                serde_json::to_vec(&json!([facility_json("FAC001", &soon())]))
                    .unwrap()
                    .as_slice(),
            )
            .await;

        let pipeline = FacilityPipeline::new(ReadOnlyStorage(inner), MockConfig);
        let result = EtlEngine::new(pipeline).run().await;

        assert!(matches!(result, Err(EtlError::StorageError { .. })));
    }
}
