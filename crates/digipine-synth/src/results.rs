use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::data::snapshot::Snapshot;
use crate::markers::MapView;
use crate::selection::SelectionKey;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunContext {
    pub schema_version: u32,
    pub label: String,
    pub created_at: DateTime<Utc>,
    /// Catalog path, or `builtin`.
    pub catalog_source: String,
    pub generator_version: String,
    /// Last day of the generated timeline.
    pub as_of: NaiveDate,
}

impl RunContext {
    pub fn new(label: &str, catalog_source: &str, as_of: NaiveDate) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            label: label.to_string(),
            created_at: Utc::now(),
            catalog_source: catalog_source.to_string(),
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            as_of,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SnapshotReport {
    pub schema_version: u32,
    pub context: RunContext,
    pub selection: SelectionKey,
    pub fingerprint: String,
    pub snapshot: Snapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<MapView>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IterationSample {
    pub elapsed_ms: f64,
    pub fingerprint: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CaseFailure {
    pub message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CaseResult {
    pub case: String,
    pub selection: SelectionKey,
    pub success: bool,
    pub samples: Vec<IterationSample>,
    pub failure: Option<CaseFailure>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SweepReport {
    pub schema_version: u32,
    pub context: RunContext,
    pub seed: u64,
    pub cases: Vec<CaseResult>,
}

impl SweepReport {
    pub fn failed_cases(&self) -> impl Iterator<Item = &CaseResult> {
        self.cases.iter().filter(|case| !case.success)
    }
}
