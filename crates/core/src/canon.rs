//! Canonical JSON serialization for model artifacts
//!
//! Artifacts are content-hashed, so their serialization must be
//! byte-stable: object keys sorted recursively, no whitespace.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::errors::Result;

/// Serialize a value to canonical JSON (sorted keys, compact).
pub fn to_canonical_json<T: Serialize>(value: &T) -> Result<String> {
    let value = serde_json::to_value(value)?;
    Ok(serde_json::to_string(&sort_keys(&value))?)
}

fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map
                .iter()
                .map(|(key, val)| (key.clone(), sort_keys(val)))
                .collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

/// Blake3 hash of the canonical JSON representation, as a hex string.
pub fn hash_canonical_hex<T: Serialize>(value: &T) -> Result<String> {
    let json = to_canonical_json(value)?;
    Ok(hex::encode(blake3::hash(json.as_bytes()).as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        zeta: i64,
        alpha: i64,
    }

    #[test]
    fn test_keys_sorted_and_compact() {
        let json = to_canonical_json(&Sample { zeta: 2, alpha: 1 }).unwrap();
        assert_eq!(json, r#"{"alpha":1,"zeta":2}"#);
    }

    #[test]
    fn test_hash_is_stable() {
        let a = hash_canonical_hex(&Sample { zeta: 2, alpha: 1 }).unwrap();
        let b = hash_canonical_hex(&Sample { zeta: 2, alpha: 1 }).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_hash_changes_with_content() {
        let a = hash_canonical_hex(&Sample { zeta: 2, alpha: 1 }).unwrap();
        let b = hash_canonical_hex(&Sample { zeta: 3, alpha: 1 }).unwrap();
        assert_ne!(a, b);
    }
}
