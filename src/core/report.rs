use crate::domain::model::{FacilityRecord, FacilitySummary, ProcessingSummary};
use crate::utils::error::Result;
use chrono::Local;
use serde::Serialize;
use serde_json::json;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Timestamp stamped into every output key of one run.
pub fn run_timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

pub fn facilities_key(output_prefix: &str, timestamp: &str) -> String {
    format!("{}expiring_facilities_{}.json", output_prefix, timestamp)
}

pub fn summary_key(output_prefix: &str, timestamp: &str) -> String {
    format!("{}processing_summary_{}.json", output_prefix, timestamp)
}

pub fn placeholder_key(output_prefix: &str, timestamp: &str) -> String {
    format!("{}no_expiring_facilities_{}.json", output_prefix, timestamp)
}

pub fn build_summary(
    filtered: &[FacilityRecord],
    output_location: &str,
    threshold_months: u32,
) -> ProcessingSummary {
    ProcessingSummary {
        processing_date: iso_now(),
        total_facilities_processed: filtered.len(),
        output_location: output_location.to_string(),
        filter_criteria: format!("Accreditations expiring within {} months", threshold_months),
        facilities_summary: filtered
            .iter()
            .map(|facility| FacilitySummary {
                facility_id: facility.facility_id().to_string(),
                facility_name: facility.facility_name().to_string(),
                expiring_count: facility.expiring_count(),
            })
            .collect(),
    }
}

/// Placeholder written when no facility qualified anywhere in the batch: a
/// single-element array, not an empty one.
pub fn build_placeholder() -> serde_json::Value {
    json!([{
        "message": "No facilities with expiring accreditations found",
        "processing_date": iso_now(),
        "facilities": []
    }])
}

/// All output artifacts are UTF-8 pretty-printed JSON, 2-space indent.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_string_pretty(value)?.into_bytes())
}

fn iso_now() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}
