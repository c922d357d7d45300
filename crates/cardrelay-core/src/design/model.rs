//! Design submission domain model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome tag of a processed submission.
///
/// Only one outcome exists: a syntactically valid submission is always
/// reported as processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesignStatus {
    Processed,
}

/// Result record for one `POST /api/card/design` request.
///
/// The submitted card fields are carried through untouched and flattened
/// next to the relay-assigned `id`, `processedAt` and `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignSubmission {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    pub processed_at: String,
    pub status: DesignStatus,
}

/// Keys owned by the record itself; submitted values under these names are dropped.
pub const RESERVED_KEYS: [&str; 3] = ["id", "processedAt", "status"];
