//! Domain types: extracted records and the run outcome payload.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row of the reported-earthquakes table.
///
/// All four data fields are free text exactly as published; nothing is
/// parsed into numbers or timestamps. The serde names match the attribute
/// names used by the durable store and the response payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeismicRecord {
    /// Store key, generated fresh on every extraction. Not derived from
    /// content: two runs over the same page produce disjoint id sets.
    pub id: Uuid,

    /// Report/bulletin identifier as published (first column).
    #[serde(rename = "reporte_origen")]
    pub origin_report: String,

    /// Epicenter reference description (second column).
    #[serde(rename = "ubicacion")]
    pub location: String,

    /// Local date/time as published, unparsed (third column).
    #[serde(rename = "fecha_local")]
    pub local_datetime: String,

    /// Magnitude as published, unparsed (fourth column).
    #[serde(rename = "magnitud")]
    pub magnitude: String,
}

impl SeismicRecord {
    /// Build a record from the four column values, assigning a fresh id.
    pub fn new(
        origin_report: impl Into<String>,
        location: impl Into<String>,
        local_datetime: impl Into<String>,
        magnitude: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            origin_report: origin_report.into(),
            location: location.into(),
            local_datetime: local_datetime.into(),
            magnitude: magnitude.into(),
        }
    }
}

/// Final status of one ETL run.
#[derive(Debug, Serialize)]
pub struct RunOutcome {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: ResponseBody,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

/// Response body: an error description, or the success payload.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Error(String),
    Success(SuccessBody),
}

/// Success payload: message, record count and the records themselves.
#[derive(Debug, Serialize)]
pub struct SuccessBody {
    pub message: String,
    pub cantidad: usize,
    pub data: Vec<SeismicRecord>,
}
