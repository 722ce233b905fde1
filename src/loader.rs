//! Loading schema metadata and root values from JSON.
//!
//! Schema metadata files list object types, their fields' declared types and
//! the directives applied to each field:
//!
//! ```json
//! {
//!   "types": {
//!     "User": {
//!       "fields": {
//!         "amount": {
//!           "type": "Float",
//!           "directives": [{ "name": "currency", "arguments": { "from": "GBP", "to": "USD" } }]
//!         }
//!       }
//!     }
//!   }
//! }
//! ```

use std::path::Path;

use serde_json::Value;

use crate::error::LoadError;
use crate::schema::Schema;

/// Load schema metadata from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// or `LoadError::InvalidJson` if the file isn't valid schema metadata.
pub fn load_schema(path: &Path) -> Result<Schema, LoadError> {
    let content = read_file(path)?;
    load_schema_str(&content)
}

/// Load schema metadata from a JSON string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the string isn't valid schema metadata,
/// including malformed field type references.
pub fn load_schema_str(content: &str) -> Result<Schema, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })
}

/// Load an arbitrary JSON value, e.g. the root value for execution.
///
/// # Errors
///
/// Same as [`load_schema`].
pub fn load_value(path: &Path) -> Result<Value, LoadError> {
    let content = read_file(path)?;
    serde_json::from_str(&content).map_err(|source| LoadError::InvalidJson { source })
}

fn read_file(path: &Path) -> Result<String, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })
}
