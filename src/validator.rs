//! Structural validation of compound documents.
//!
//! The resolver rejects malformed documents lazily, one collection at a time.
//! Validation checks the whole document up front and reports every problem
//! with a JSON Pointer to it.

use serde_json::{json, Value};

use crate::error::{SchemaError, ValidateError};

/// JSON Schema describing a compound document.
///
/// - `links`: type map, every descriptor has a string `type`
/// - `linked`: collections of records, every record has an `id`
/// - every other top-level key is a collection of records whose `links`
///   values are ids, arrays of ids, or `null`
pub fn document_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "$defs": {
            "id": { "type": ["string", "number"] },
            "links": {
                "type": ["object", "null"],
                "additionalProperties": {
                    "oneOf": [
                        { "$ref": "#/$defs/id" },
                        { "type": "null" },
                        { "type": "array", "items": { "$ref": "#/$defs/id" } }
                    ]
                }
            },
            "record": {
                "type": "object",
                "properties": {
                    "links": { "$ref": "#/$defs/links" }
                }
            },
            "linkedRecord": {
                "allOf": [{ "$ref": "#/$defs/record" }],
                "required": ["id"],
                "properties": {
                    "id": { "$ref": "#/$defs/id" }
                }
            }
        },
        "properties": {
            "links": {
                "type": "object",
                "additionalProperties": {
                    "type": "object",
                    "required": ["type"],
                    "properties": {
                        "type": { "type": "string", "minLength": 1 }
                    }
                }
            },
            "linked": {
                "type": "object",
                "additionalProperties": {
                    "type": "array",
                    "items": { "$ref": "#/$defs/linkedRecord" }
                }
            },
            "meta": { "type": "object" }
        },
        "additionalProperties": {
            "type": "array",
            "items": { "$ref": "#/$defs/record" }
        }
    })
}

/// Validate a compound document against [`document_schema`].
///
/// # Errors
///
/// Returns `ValidateError::Invalid` listing every violation.
pub fn validate_document(document: &Value) -> Result<(), ValidateError> {
    validate_against_schema(&document_schema(), document)
}

/// Validate a value against an arbitrary JSON Schema.
///
/// # Errors
///
/// Returns `ValidateError::InvalidSchema` if `schema` itself is not a valid
/// schema, or `ValidateError::Invalid` if `value` doesn't match it.
pub fn validate_against_schema(schema: &Value, value: &Value) -> Result<(), ValidateError> {
    let validator =
        jsonschema::validator_for(schema).map_err(|e| ValidateError::InvalidSchema {
            message: e.to_string(),
        })?;

    let errors: Vec<SchemaError> = validator
        .iter_errors(value)
        .map(|e| SchemaError {
            path: e.instance_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidateError::Invalid { errors })
    }
}
