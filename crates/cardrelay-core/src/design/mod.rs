//! Card design processing.
//!
//! Validates an incoming submission body and turns it into an immutable
//! [`DesignSubmission`] ready to be broadcast.

pub mod model;

use std::sync::atomic::{AtomicI64, Ordering};

use serde_json::Value;
use tracing::debug;

use crate::error::{RelayError, RelayResult};
use model::{DesignStatus, DesignSubmission, RESERVED_KEYS};

/// Prefix of every submission id.
pub const DESIGN_ID_PREFIX: &str = "design-";

/// Issues time-derived submission ids.
///
/// Ids are `design-<unix millis>`, bumped past the previous value when two
/// calls land in the same millisecond, so every id in a process is unique.
#[derive(Debug, Default)]
pub struct DesignIdGenerator {
    last: AtomicI64,
}

impl DesignIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next id.
    pub fn next_id(&self) -> String {
        let now = chrono::Utc::now().timestamp_millis();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return format!("{}{}", DESIGN_ID_PREFIX, candidate),
                Err(actual) => prev = actual,
            }
        }
    }
}

/// Build a submission record from a request body of the form `{"cardData": {...}}`.
///
/// `cardData` must be present, non-null, and a JSON object; its contents are
/// otherwise opaque.
pub fn process_design(body: &Value, ids: &DesignIdGenerator) -> RelayResult<DesignSubmission> {
    let card_data = match body.get("cardData") {
        None | Some(Value::Null) => return Err(RelayError::validation("cardData is required")),
        Some(Value::Object(map)) => map,
        Some(_) => return Err(RelayError::validation("cardData must be an object")),
    };

    let fields = card_data
        .iter()
        .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let design = DesignSubmission {
        id: ids.next_id(),
        fields,
        processed_at: crate::now_timestamp(),
        status: DesignStatus::Processed,
    };
    debug!(design_id = %design.id, field_count = design.fields.len(), "Design processed");

    Ok(design)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn test_missing_card_data() {
        let ids = DesignIdGenerator::new();
        let err = process_design(&json!({}), &ids).unwrap_err();
        assert!(matches!(err, RelayError::Validation(_)));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_null_card_data() {
        let ids = DesignIdGenerator::new();
        let err = process_design(&json!({ "cardData": null }), &ids).unwrap_err();
        assert!(matches!(err, RelayError::Validation(_)));
    }

    #[test]
    fn test_non_object_card_data() {
        let ids = DesignIdGenerator::new();
        let err = process_design(&json!({ "cardData": [1, 2] }), &ids).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: cardData must be an object");
    }

    #[test]
    fn test_processed_record() {
        let ids = DesignIdGenerator::new();
        let design = process_design(&json!({ "cardData": { "a": 1, "title": "Hi" } }), &ids).unwrap();
        assert!(design.id.starts_with(DESIGN_ID_PREFIX));
        assert_eq!(design.status, DesignStatus::Processed);
        assert_eq!(design.fields.get("a"), Some(&json!(1)));

        let value = serde_json::to_value(&design).unwrap();
        assert_eq!(value["status"], "processed");
        assert_eq!(value["title"], "Hi");
        assert!(value["processedAt"].is_string());
    }

    #[test]
    fn test_reserved_keys_are_not_overridden() {
        let ids = DesignIdGenerator::new();
        let body = json!({ "cardData": { "id": "mine", "status": "failed", "color": "red" } });
        let design = process_design(&body, &ids).unwrap();
        assert!(design.id.starts_with(DESIGN_ID_PREFIX));
        assert_eq!(design.fields.len(), 1);

        let value = serde_json::to_value(&design).unwrap();
        assert_eq!(value["status"], "processed");
        assert_eq!(value["color"], "red");
    }

    #[test]
    fn test_ids_are_unique_within_a_millisecond() {
        let ids = DesignIdGenerator::new();
        let issued: HashSet<String> = (0..1000).map(|_| ids.next_id()).collect();
        assert_eq!(issued.len(), 1000);
    }
}
