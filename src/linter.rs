//! Static checks over annotated fields.
//!
//! Reports, before any request is served, the problems the wrapped resolver
//! would otherwise only surface at resolution time:
//! - `E001` unrecognized currency codes
//! - `E002` directive on a field whose type is not `String` or `Float`
//! - `W001` directive payload that is not an object (the transformer ignores
//!   such fields)
//! - `W002` directive applied more than once (only the first is used)

use serde::Serialize;

use crate::directive::{fetch_directive, has_directive};
use crate::schema::Schema;
use crate::transformer::{check_return_type, validate_codes};
use crate::types::DirectiveArguments;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic for one field.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    /// Field coordinate, e.g. "User.amount".
    pub path: String,
    pub message: String,
}

/// Result of linting one schema.
#[derive(Debug, Clone, Serialize)]
pub struct LintResult {
    pub directive: String,
    /// Number of fields carrying the directive.
    pub fields_checked: usize,
    pub errors: usize,
    pub warnings: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl LintResult {
    /// Returns true if no errors were found.
    pub fn is_ok(&self) -> bool {
        self.errors == 0
    }
}

/// Lint every field annotated with `directive_name`.
pub fn lint(schema: &Schema, directive_name: &str) -> LintResult {
    let mut diagnostics = Vec::new();
    let mut fields_checked = 0;

    for (type_name, object) in &schema.types {
        for (field_name, field) in &object.fields {
            if !has_directive(field, directive_name) {
                continue;
            }
            fields_checked += 1;
            let path = format!("{}.{}", type_name, field_name);

            let instances = field.directives_named(directive_name).count();
            if instances > 1 {
                diagnostics.push(Diagnostic {
                    severity: Severity::Warning,
                    code: "W002".to_string(),
                    path: path.clone(),
                    message: format!(
                        "@{} applied {} times; only the first is used",
                        directive_name, instances
                    ),
                });
            }

            let Some(args) = fetch_directive::<DirectiveArguments>(field, directive_name) else {
                diagnostics.push(Diagnostic {
                    severity: Severity::Warning,
                    code: "W001".to_string(),
                    path,
                    message: format!(
                        "@{} arguments must be an object; the directive is ignored",
                        directive_name
                    ),
                });
                continue;
            };

            if let Err(e) = validate_codes(&args.from, &args.to) {
                diagnostics.push(Diagnostic {
                    severity: Severity::Error,
                    code: "E001".to_string(),
                    path: path.clone(),
                    message: e.to_string(),
                });
            }

            if let Err(e) = check_return_type(field_name, &field.ty, directive_name) {
                diagnostics.push(Diagnostic {
                    severity: Severity::Error,
                    code: "E002".to_string(),
                    path,
                    message: e.to_string(),
                });
            }
        }
    }

    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();

    LintResult {
        directive: directive_name.to_string(),
        fields_checked,
        errors,
        warnings: diagnostics.len() - errors,
        diagnostics,
    }
}
