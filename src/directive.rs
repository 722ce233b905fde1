//! Typed access to directive arguments attached to a field.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::schema::FieldConfig;

/// Fetch the arguments of the first `directive_name` instance on a field.
///
/// Returns `None` when the field carries no such directive, and also when the
/// first instance's payload is not a JSON object. Any object payload is handed
/// to `T` as-is; the arguments' values are not validated here. Absence is the
/// common case and never an error.
pub fn fetch_directive<T: DeserializeOwned>(field: &FieldConfig, directive_name: &str) -> Option<T> {
    let instance = field.directives_named(directive_name).next()?;

    let Value::Object(_) = &instance.arguments else {
        tracing::debug!(
            directive = directive_name,
            "ignoring directive with non-object arguments"
        );
        return None;
    };

    match serde_json::from_value(instance.arguments.clone()) {
        Ok(arguments) => Some(arguments),
        Err(e) => {
            tracing::debug!(
                directive = directive_name,
                error = %e,
                "ignoring directive with malformed arguments"
            );
            None
        }
    }
}

/// Returns true if the field carries at least one `directive_name` instance,
/// whether or not its payload is well-formed.
pub fn has_directive(field: &FieldConfig, directive_name: &str) -> bool {
    field.directives_named(directive_name).next().is_some()
}
