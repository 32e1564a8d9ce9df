use crate::core::expiry::is_expiring_soon;
use crate::domain::model::{ExpiringAccreditation, FacilityRecord, ProcessingMetadata};
use crate::utils::error::{EtlError, Result};
use chrono::Local;
use serde_json::Value;

/// Filter facilities with accreditations expiring within the threshold.
///
/// Facilities are independent: a structurally broken record is logged and
/// skipped without aborting the rest of the batch.
pub fn filter_expiring_facilities(
    facilities: &[FacilityRecord],
    threshold_months: u32,
) -> Vec<FacilityRecord> {
    let mut filtered = Vec::new();

    for facility in facilities {
        match annotate_facility(facility, threshold_months) {
            Ok(Some(annotated)) => {
                tracing::info!(
                    "Facility {} ({}) has {} expiring accreditation(s)",
                    annotated.facility_id(),
                    annotated.facility_name(),
                    annotated.expiring_count()
                );
                filtered.push(annotated);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!("Error processing facility {}: {}", facility.facility_id(), e);
            }
        }
    }

    tracing::info!(
        "Filtered {} facilities with expiring accreditations out of {} total",
        filtered.len(),
        facilities.len()
    );
    filtered
}

/// Evaluates one facility. Returns the annotated copy when at least one
/// accreditation qualifies, None when nothing does or the facility carries
/// no accreditations, Err on a malformed structure.
fn annotate_facility(
    facility: &FacilityRecord,
    threshold_months: u32,
) -> Result<Option<FacilityRecord>> {
    let accreditations = match facility.fields.get("accreditations") {
        None | Some(Value::Null) => {
            tracing::info!(
                "Facility {} has no accreditations, skipping",
                facility.facility_id()
            );
            return Ok(None);
        }
        Some(Value::Array(list)) => list,
        Some(other) => {
            return Err(EtlError::ProcessingError {
                message: format!(
                    "accreditations field is not an array (found {})",
                    type_of(other)
                ),
            })
        }
    };

    if accreditations.is_empty() {
        tracing::info!(
            "Facility {} has no accreditations, skipping",
            facility.facility_id()
        );
        return Ok(None);
    }

    let mut expiring = Vec::new();
    for accreditation in accreditations {
        let Value::Object(entry) = accreditation else {
            return Err(EtlError::ProcessingError {
                message: format!(
                    "accreditation entry is not an object (found {})",
                    type_of(accreditation)
                ),
            });
        };

        let expiry_date = entry.get("valid_until").and_then(|v| v.as_str()).unwrap_or("");
        if is_expiring_soon(expiry_date, threshold_months) {
            expiring.push(ExpiringAccreditation {
                body: entry
                    .get("accreditation_body")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string(),
                expiry: expiry_date.to_string(),
            });
        }
    }

    if expiring.is_empty() {
        return Ok(None);
    }

    let metadata = ProcessingMetadata {
        processed_date: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        expiring_accreditations: expiring,
        total_accreditations: accreditations.len(),
    };

    // Clone, never mutate the input record in place.
    let mut annotated = facility.clone();
    annotated
        .fields
        .insert("_processing_metadata".to_string(), serde_json::to_value(metadata)?);
    Ok(Some(annotated))
}

fn type_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
