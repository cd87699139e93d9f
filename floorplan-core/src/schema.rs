//! Project file format: a flat JSON array of shape records.
//!
//! Import is all-or-nothing. Every record is checked against the schema of
//! its variant, unknown fields are dropped, and ids must be unique across
//! the whole array. Any failure rejects the file without producing shapes.

use std::collections::HashSet;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::shape::{Shape, ShapeName};

/// Field holding the variant tag.
const TAG_FIELD: &str = "shapeName";

/// Tag field used by project files written before `shapeName` existed.
const LEGACY_TAG_FIELD: &str = "shape";

/// Variant tags that were renamed, with their current name.
const LEGACY_NAMES: [(&str, ShapeName); 1] = [("coldAppliance", ShapeName::ElectricAppliance)];

/// Reasons a project file is rejected.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The file is not valid JSON.
    #[error("malformed project file: invalid JSON: {0}")]
    InvalidJson(serde_json::Error),
    /// The top-level value is not an array.
    #[error("malformed project file: expected an array of shapes")]
    NotAnArray,
    /// A record is not an object or carries no string tag.
    #[error("malformed project file: shape #{index} has no shape name")]
    MissingShapeName {
        /// Position of the record in the array.
        index: usize,
    },
    /// A record names a variant that does not exist.
    #[error("malformed project file: shape #{index} has unknown shape name {name:?}")]
    UnknownShape {
        /// Position of the record in the array.
        index: usize,
        /// The unrecognized tag.
        name: String,
    },
    /// A record does not match the schema of its variant.
    #[error("malformed project file: shape #{index} is invalid: {reason}")]
    Validation {
        /// Position of the record in the array.
        index: usize,
        /// What is wrong with it.
        reason: String,
    },
    /// Two records share the same id.
    #[error("malformed project file: duplicate shape id {0:?}")]
    DuplicateId(String),
}

/// Parse and validate a project file.
///
/// With `check_wings`, L-shaped houses with wings wider than their exterior
/// are rejected too.
///
/// # Errors
///
/// Returns an [`ImportError`] describing the first problem found.
pub fn parse_project(json: &str, check_wings: bool) -> Result<Vec<Shape>, ImportError> {
    let data: Value = serde_json::from_str(json).map_err(ImportError::InvalidJson)?;
    validate_project(data, check_wings)
}

/// Validate an already parsed project value.
///
/// # Errors
///
/// Returns an [`ImportError`] describing the first problem found.
pub fn validate_project(data: Value, check_wings: bool) -> Result<Vec<Shape>, ImportError> {
    let Value::Array(records) = data else {
        return Err(ImportError::NotAnArray);
    };

    let mut shapes = Vec::with_capacity(records.len());
    let mut ids = HashSet::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let record = normalize_tag(index, record)?;
        let shape: Shape =
            serde_json::from_value(Value::Object(record)).map_err(|e| ImportError::Validation {
                index,
                reason: e.to_string(),
            })?;
        shape
            .validate(check_wings)
            .map_err(|reason| ImportError::Validation { index, reason })?;
        if !ids.insert(shape.id.clone()) {
            return Err(ImportError::DuplicateId(shape.id.to_string()));
        }
        shapes.push(shape);
    }

    tracing::debug!("Validated project with {} shapes", shapes.len());
    Ok(shapes)
}

/// Serialize shapes as a project file.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json(shapes: &[Shape]) -> Result<String, serde_json::Error> {
    serde_json::to_string(shapes)
}

/// Serialize shapes as an indented project file.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_pretty(shapes: &[Shape]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(shapes)
}

/// Resolve the variant tag of a record into the canonical `shapeName` field.
fn normalize_tag(index: usize, record: Value) -> Result<Map<String, Value>, ImportError> {
    let Value::Object(mut record) = record else {
        return Err(ImportError::MissingShapeName { index });
    };

    let raw = match record.get(TAG_FIELD).or_else(|| record.get(LEGACY_TAG_FIELD)) {
        Some(Value::String(name)) => name.clone(),
        _ => return Err(ImportError::MissingShapeName { index }),
    };
    let name = LEGACY_NAMES
        .iter()
        .find(|(legacy, _)| *legacy == raw)
        .map(|(_, name)| *name)
        .map_or_else(|| raw.parse::<ShapeName>(), Ok)
        .map_err(|_| ImportError::UnknownShape {
            index,
            name: raw.clone(),
        })?;

    record.remove(LEGACY_TAG_FIELD);
    record.insert(TAG_FIELD.to_string(), Value::String(name.as_str().to_string()));
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ShapeKind;
    use serde_json::json;

    fn house(id: &str) -> Value {
        json!({
            "id": id,
            "shapeName": "rectangleHouse",
            "x": 10,
            "y": 20,
            "rotation": 0,
            "exteriorWidth": 500,
            "exteriorHeight": 400,
            "wallThickness": 15,
            "draggable": true
        })
    }

    #[test]
    fn test_parse_valid_project() {
        let json = json!([house("a"), house("b")]).to_string();
        let shapes = parse_project(&json, false).expect("should parse");
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[0].id.as_str(), "a");
        assert_eq!(shapes[1].name(), ShapeName::RectangleHouse);
    }

    #[test]
    fn test_legacy_tag_and_names() {
        let data = json!([
            {
                "id": "fridge",
                "shape": "coldAppliance",
                "x": 0, "y": 0, "rotation": 0,
                "width": 30, "height": 35
            }
        ]);
        let shapes = validate_project(data, false).expect("should accept legacy file");
        assert_eq!(
            shapes[0].kind,
            ShapeKind::ElectricAppliance {
                width: 30.0,
                depth: 35.0
            }
        );
        // Missing draggable defaults to unlocked
        assert!(shapes[0].draggable);
    }

    #[test]
    fn test_unknown_fields_are_stripped() {
        let mut record = house("a");
        record["color"] = json!("red");
        let shapes = validate_project(json!([record]), false).expect("should parse");
        let out = serde_json::to_value(&shapes[0]).expect("serialize");
        assert!(out.get("color").is_none());
    }

    #[test]
    fn test_rejects_non_array() {
        let result = parse_project("{\"id\": \"a\"}", false);
        assert!(matches!(result, Err(ImportError::NotAnArray)));
    }

    #[test]
    fn test_rejects_invalid_json() {
        assert!(matches!(
            parse_project("[{", false),
            Err(ImportError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_shape() {
        let data = json!([house("a"), {"id": "b", "shapeName": "piano", "x": 0, "y": 0, "rotation": 0}]);
        let result = validate_project(data, false);
        assert!(matches!(
            result,
            Err(ImportError::UnknownShape { index: 1, .. })
        ));
    }

    #[test]
    fn test_rejects_missing_tag() {
        let data = json!([{"id": "a", "x": 0, "y": 0}]);
        assert!(matches!(
            validate_project(data, false),
            Err(ImportError::MissingShapeName { index: 0 })
        ));
    }

    #[test]
    fn test_rejects_schema_mismatch() {
        let mut record = house("a");
        record["exteriorWidth"] = json!(-5);
        let result = validate_project(json!([record]), false);
        assert!(matches!(result, Err(ImportError::Validation { index: 0, .. })));

        let mut record = house("a");
        record.as_object_mut().expect("object").remove("wallThickness");
        let result = validate_project(json!([record]), false);
        assert!(matches!(result, Err(ImportError::Validation { index: 0, .. })));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let result = validate_project(json!([house("a"), house("a")]), false);
        assert!(matches!(result, Err(ImportError::DuplicateId(id)) if id == "a"));
    }

    #[test]
    fn test_error_message_mentions_malformed_project() {
        let err = validate_project(json!(3), false).expect_err("should fail");
        assert!(err.to_string().starts_with("malformed project file"));
    }

    #[test]
    fn test_export_round_trip() {
        let data = json!([house("a"), house("b")]);
        let shapes = validate_project(data, false).expect("should parse");
        let exported = to_json(&shapes).expect("serialize");
        let reparsed = parse_project(&exported, false).expect("should parse again");
        assert_eq!(reparsed, shapes);

        let value: Value = serde_json::from_str(&exported).expect("json");
        assert_eq!(value[0]["exteriorWidth"], 500.0);
        assert_eq!(value[0]["shapeName"], "rectangleHouse");
    }
}
