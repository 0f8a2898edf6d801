//! Field collection
//!
//! Binds user input (or auto-populated client/property context) to template
//! field names and validates the result against the field descriptors.

use shared_types::{FieldType, TemplateField};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("Missing required field: {0}")]
    MissingRequired(String),

    #[error("Value '{value}' is not an option of field '{field}'")]
    InvalidOption { field: String, value: String },
}

/// Coerce a JSON scalar to its document text form. Null is the empty string.
pub fn coerce_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Collect the value map for a document from the provided inputs.
///
/// For each descriptor the provided value wins, then the field default;
/// fields with neither are absent from the output so their placeholders stay
/// visible in the preview. A required field that resolves to nothing (or to
/// an empty string) aborts with `MissingRequired`. Select fields must match
/// one of their declared options.
pub fn collect_values(
    fields: &[TemplateField],
    provided: &HashMap<String, serde_json::Value>,
) -> Result<HashMap<String, serde_json::Value>, FieldError> {
    let mut out = HashMap::new();

    for field in fields {
        let value = provided
            .get(&field.name)
            .cloned()
            .or_else(|| field.default.clone());

        let value = match value {
            Some(v) => v,
            None => {
                if field.required {
                    return Err(FieldError::MissingRequired(field.name.clone()));
                }
                continue;
            }
        };

        let text = coerce_to_string(&value);
        if field.required && text.is_empty() {
            return Err(FieldError::MissingRequired(field.name.clone()));
        }

        if field.field_type == FieldType::Select {
            if let Some(options) = &field.options {
                if !text.is_empty() && !options.iter().any(|o| o == &text) {
                    return Err(FieldError::InvalidOption {
                        field: field.name.clone(),
                        value: text,
                    });
                }
            }
        }

        out.insert(field.name.clone(), value);
    }

    Ok(out)
}

/// Auto-population: overlay client/property context values for keys the user
/// did not set. Explicit input always wins.
pub fn with_context(
    provided: &HashMap<String, serde_json::Value>,
    context: &HashMap<String, serde_json::Value>,
) -> HashMap<String, serde_json::Value> {
    let mut merged = context.clone();
    for (k, v) in provided {
        merged.insert(k.clone(), v.clone());
    }
    merged
}
