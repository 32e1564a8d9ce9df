use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One facility record as read from storage. The map is kept opaque so
/// fields we never look at survive the round trip unmodified.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacilityRecord {
    pub fields: Map<String, Value>,
}

impl FacilityRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn facility_id(&self) -> &str {
        self.fields
            .get("facility_id")
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown")
    }

    pub fn facility_name(&self) -> &str {
        self.fields
            .get("facility_name")
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown")
    }

    /// Count of expiring accreditations recorded in `_processing_metadata`,
    /// zero when the record has not been annotated.
    pub fn expiring_count(&self) -> usize {
        self.fields
            .get("_processing_metadata")
            .and_then(|m| m.get("expiring_accreditations"))
            .and_then(|v| v.as_array())
            .map(|a| a.len())
            .unwrap_or(0)
    }
}

/// Accreditation that falls inside the expiry window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpiringAccreditation {
    pub body: String,
    pub expiry: String,
}

/// Metadata block appended to each filtered facility under
/// `_processing_metadata`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingMetadata {
    pub processed_date: String,
    pub expiring_accreditations: Vec<ExpiringAccreditation>,
    pub total_accreditations: usize,
}

/// Result of the extract phase.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Number of input objects listed, including ones that later failed to
    /// read or parse. Zero means the run writes nothing.
    pub files_listed: usize,
    pub facilities: Vec<FacilityRecord>,
}

/// Result of the transform phase.
#[derive(Debug, Clone)]
pub struct FilterResult {
    pub filtered: Vec<FacilityRecord>,
    pub total_input: usize,
}

/// Terminal state of one run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// No `.json` objects under the input prefix; nothing was written.
    NoInput,
    /// Nothing qualified; the placeholder artifact was written.
    Placeholder { key: String },
    /// Filtered facilities and the processing summary were written.
    Filtered {
        facilities_key: String,
        summary_key: String,
        facilities_found: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilitySummary {
    pub facility_id: String,
    pub facility_name: String,
    pub expiring_count: usize,
}

/// Summary artifact written alongside a non-empty filtered result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingSummary {
    pub processing_date: String,
    pub total_facilities_processed: usize,
    pub output_location: String,
    pub filter_criteria: String,
    pub facilities_summary: Vec<FacilitySummary>,
}
