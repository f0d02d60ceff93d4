//! The layered decoder: JSON-text fields decoded in place and re-encoded
//! verbatim.
//!
//! A visual record stores a fixed set of fields (`config`, `query`,
//! `dataTransforms`, `filters`) as JSON-encoded text. Before editing they are
//! decoded into structured values in place; before persistence they are
//! serialized back to text. The two states are mutually exclusive per field:
//! a string value means "encoded", anything structured means "decoded".
//!
//! Key order survives the round trip (`serde_json` with `preserve_order`)
//! and non-ASCII stays literal, because the target format is consumed by a
//! strict external reader.

use serde_json::Value;

use crate::error::ModelError;

/// The fields of a visual record that hold JSON text.
pub const LAYERED_FIELDS: [&str; 4] = ["config", "query", "dataTransforms", "filters"];

/// Returns `true` if `name` is one of the layered field names.
pub fn is_layered_field(name: &str) -> bool {
    LAYERED_FIELDS.contains(&name)
}

/// Decode one layered field of `record` in place.
///
/// Returns `true` if the field was text and is now structured. An absent
/// field or an already-structured field is a no-op (decode is idempotent).
///
/// # Errors
///
/// Text that is not valid JSON is fatal for the record
/// ([`ModelError::MalformedLayer`]) - no partial recovery.
pub fn decode_field(record: &mut Value, field: &str) -> Result<bool, ModelError> {
    let map = record.as_object_mut().ok_or(ModelError::NotAnObject)?;
    let Some(current) = map.get(field) else {
        return Ok(false);
    };
    let Value::String(text) = current else {
        return Ok(false);
    };
    let parsed: Value = serde_json::from_str(text).map_err(|source| ModelError::MalformedLayer {
        field: field.to_string(),
        source,
    })?;
    map.insert(field.to_string(), parsed);
    Ok(true)
}

/// Decode every layered field present in `record`. Returns the names of the
/// fields that changed state.
pub fn decode_record(record: &mut Value) -> Result<Vec<&'static str>, ModelError> {
    let mut decoded = Vec::new();
    for field in LAYERED_FIELDS {
        if decode_field(record, field)? {
            decoded.push(field);
        }
    }
    Ok(decoded)
}

/// Encode one layered field of `record` back to text in place.
///
/// The inverse of [`decode_field`]; idempotent in the same way (a field that
/// is already text is left alone).
pub fn encode_field(record: &mut Value, field: &str) -> Result<bool, ModelError> {
    let map = record.as_object_mut().ok_or(ModelError::NotAnObject)?;
    let Some(current) = map.get(field) else {
        return Ok(false);
    };
    if current.is_string() {
        return Ok(false);
    }
    let text = serde_json::to_string(current).map_err(|source| ModelError::EncodeLayer {
        field: field.to_string(),
        source,
    })?;
    map.insert(field.to_string(), Value::String(text));
    Ok(true)
}

/// Encode every currently structured layered field of `record`.
pub fn encode_record(record: &mut Value) -> Result<Vec<&'static str>, ModelError> {
    let mut encoded = Vec::new();
    for field in LAYERED_FIELDS {
        if encode_field(record, field)? {
            encoded.push(field);
        }
    }
    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_replaces_text_with_structure() {
        let mut record = json!({
            "config": r#"{"name":"abc","layouts":[{"id":0}]}"#,
            "filters": "[]",
            "x": 10.0
        });
        let decoded = decode_record(&mut record).unwrap();
        assert_eq!(decoded, vec!["config", "filters"]);
        assert_eq!(record["config"]["name"], json!("abc"));
        assert_eq!(record["filters"], json!([]));
        // Non-layered fields are untouched.
        assert_eq!(record["x"], json!(10.0));
    }

    #[test]
    fn decode_is_idempotent() {
        let mut record = json!({"config": r#"{"a":1}"#});
        decode_record(&mut record).unwrap();
        let snapshot = record.clone();
        let second = decode_record(&mut record).unwrap();
        assert!(second.is_empty());
        assert_eq!(record, snapshot);
    }

    #[test]
    fn decode_rejects_malformed_text() {
        let mut record = json!({"query": "{not json"});
        let err = decode_record(&mut record).unwrap_err();
        assert!(matches!(err, ModelError::MalformedLayer { ref field, .. } if field == "query"));
    }

    #[test]
    fn encode_round_trips_byte_identical() {
        // Compact text with non-ASCII: both the spacing and the literal
        // characters must survive decode -> encode untouched.
        let text = r#"{"name":"x","From":[{"Entity":"Calendário"}],"flag":true}"#;
        let mut record = json!({"config": text});
        decode_record(&mut record).unwrap();
        encode_record(&mut record).unwrap();
        assert_eq!(record["config"], json!(text));
    }

    #[test]
    fn encode_skips_absent_and_textual_fields() {
        let mut record = json!({"filters": "[]"});
        let encoded = encode_record(&mut record).unwrap();
        assert!(encoded.is_empty());
    }

    #[test]
    fn scalar_record_is_rejected() {
        let mut record = json!(42);
        assert!(matches!(
            decode_record(&mut record),
            Err(ModelError::NotAnObject)
        ));
    }
}
