//! Category display configuration.
//!
//! The configuration is three independent fields: the ordered selection of
//! category IDs and two display flags. Input arriving from a form or from an
//! older deployment is coerced rather than rejected: a non-list order becomes
//! an empty selection and anything that is not clearly "on" becomes `false`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::id::CategoryId;
use super::sanitize::sanitize_text_field;

/// The persisted category display configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Selected categories, in display order.
    ///
    /// Entries may refer to categories that no longer exist; they are skipped
    /// when the selection is rendered.
    pub ordered_category_ids: Vec<CategoryId>,
    /// Skip categories with no products when rendering.
    pub hide_empty: bool,
    /// Render the product count next to each category name.
    pub show_count: bool,
}

impl DisplaySettings {
    /// Build settings from untrusted, loosely-typed values.
    ///
    /// Used both for submitted payloads and for values read back from the
    /// settings store; `None` stands for a missing field or key.
    #[must_use]
    pub fn coerce(order: Option<&Value>, hide_empty: Option<&Value>, show_count: Option<&Value>) -> Self {
        Self {
            ordered_category_ids: order.map(coerce_order).unwrap_or_default(),
            hide_empty: hide_empty.is_some_and(coerce_flag),
            show_count: show_count.is_some_and(coerce_flag),
        }
    }

    /// Whether no category is selected.
    #[must_use]
    pub fn is_selection_empty(&self) -> bool {
        self.ordered_category_ids.is_empty()
    }
}

/// Coerce a loosely-typed flag into a boolean.
///
/// `true`, non-zero numbers and the strings `"1"`, `"true"`, `"on"`, `"yes"`
/// (case-insensitive, after sanitization) are on; everything else is off.
///
/// ```
/// use category_display_core::coerce_flag;
/// use serde_json::json;
///
/// assert!(coerce_flag(&json!("1")));
/// assert!(!coerce_flag(&json!("0")));
/// assert!(!coerce_flag(&json!({"nested": true})));
/// ```
#[must_use]
pub fn coerce_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => {
            let clean = sanitize_text_field(s).to_ascii_lowercase();
            matches!(clean.as_str(), "1" | "true" | "on" | "yes")
        }
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

/// Coerce a loosely-typed ordered list of category IDs.
///
/// Strings are sanitized, numbers (numeric term IDs) are stringified, and any
/// element that sanitizes to nothing or is of another type is dropped. A value
/// that is not a list yields an empty selection.
#[must_use]
pub fn coerce_order(value: &Value) -> Vec<CategoryId> {
    let Value::Array(items) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => CategoryId::sanitize(s),
            Value::Number(n) => CategoryId::sanitize(&n.to_string()),
            _ => None,
        })
        .collect()
}
