//! Placeholder substitution
//!
//! Replaces every literal `{{name}}` occurrence with the mapped value in a
//! single pass. Unresolved placeholders stay verbatim so missing data is
//! visually obvious in the preview.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashMap;

use crate::fields::coerce_to_string;

lazy_static! {
    // Identifiers are matched exactly: case-sensitive, no whitespace
    // tolerance inside the braces.
    static ref PLACEHOLDER: Regex = Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").unwrap();
}

/// Formatting mode of the shared substitution rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Editable preview: non-empty values are wrapped in `<strong>` for
    /// visual feedback only
    Preview,
    /// Final/print render: raw substitution, no extra emphasis
    Final,
}

/// Render a template against a field-value map.
///
/// Every `{{name}}` with a mapped value becomes that value coerced to a
/// string (null resolves to the empty string). Tokens with no mapping are
/// left untouched. Substituted values are never re-scanned, so a value that
/// itself looks like a placeholder survives the pass literally.
pub fn render(
    template: &str,
    values: &HashMap<String, serde_json::Value>,
    mode: RenderMode,
) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            match values.get(name) {
                Some(value) => {
                    let text = coerce_to_string(value);
                    if mode == RenderMode::Preview && !text.is_empty() {
                        format!("<strong>{}</strong>", text)
                    } else {
                        text
                    }
                }
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
