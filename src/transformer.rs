//! The currency directive engine.
//!
//! Walks every object-type field of a schema, and for each field annotated
//! with the directive replaces its resolver with one that validates the
//! directive arguments, resolves the original value and returns the
//! converted amount as text.
//!
//! Per invocation the wrapped resolver runs, in order:
//!
//! | Step | Failure |
//! |------|---------|
//! | both codes are recognized | `FieldError::InvalidCode` |
//! | declared type is `String` or `Float` | `FieldError::UnsupportedType` |
//! | original resolver | its own error |
//! | value is numeric (`null` passes through) | `FieldError::NonNumeric` |
//! | one lookup call | `FieldError::Lookup` |
//!
//! Nothing after a failed step runs, so invalid arguments never reach the
//! original resolver or the lookup.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::codes::CurrencyCode;
use crate::directive::fetch_directive;
use crate::error::FieldError;
use crate::lookup::Lookup;
use crate::schema::{
    default_field_resolver, map_object_fields, FieldResolver, ResolveInfo, Schema, TypeRef,
};
use crate::typedefs::currency_type_defs;
use crate::types::{
    ConversionRequest, DirectiveArguments, DEFAULT_DIRECTIVE_NAME, SUPPORTED_RETURN_TYPES,
};

/// Schema-to-schema function applied by the host after merging type definitions.
pub type Transformer = Arc<dyn Fn(Schema) -> Schema + Send + Sync>;

/// What a host needs to install the directive.
pub struct DirectiveParts {
    /// Directive declaration and `CurrencyCode` enum.
    pub type_defs: String,
    pub transformer: Transformer,
}

/// Build the type definitions and transformer for `directive_name`.
pub fn build(directive_name: &str, lookup: Arc<dyn Lookup>) -> DirectiveParts {
    CurrencyDirective::from_shared(lookup)
        .with_name(directive_name)
        .into_parts()
}

/// Configured currency directive.
#[derive(Clone)]
pub struct CurrencyDirective {
    name: String,
    lookup: Arc<dyn Lookup>,
}

impl fmt::Debug for CurrencyDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurrencyDirective")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl CurrencyDirective {
    /// Directive named `currency` backed by `lookup`.
    pub fn new<L: Lookup + 'static>(lookup: L) -> Self {
        Self::from_shared(Arc::new(lookup))
    }

    pub fn from_shared(lookup: Arc<dyn Lookup>) -> Self {
        Self {
            name: DEFAULT_DIRECTIVE_NAME.to_string(),
            lookup,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_defs(&self) -> String {
        currency_type_defs(&self.name)
    }

    /// Wrap the resolver of every annotated field. Other fields are returned
    /// untouched.
    pub fn transform(&self, schema: Schema) -> Schema {
        map_object_fields(schema, |type_name, field_name, field| {
            let args = fetch_directive::<DirectiveArguments>(field, &self.name)?;
            tracing::debug!(
                type_name,
                field_name,
                directive = %self.name,
                from = %args.from,
                to = %args.to,
                "wrapping field resolver"
            );

            let original = field
                .resolve
                .clone()
                .unwrap_or_else(default_field_resolver);
            let resolver = wrap_resolver(original, args, &self.name, Arc::clone(&self.lookup));
            Some(field.clone().resolver(resolver))
        })
    }

    pub fn into_parts(self) -> DirectiveParts {
        let type_defs = self.type_defs();
        let transformer: Transformer = Arc::new(move |schema: Schema| self.transform(schema));
        DirectiveParts {
            type_defs,
            transformer,
        }
    }
}

/// Decorate `original` with validation and conversion.
pub fn wrap_resolver(
    original: FieldResolver,
    args: DirectiveArguments,
    directive_name: &str,
    lookup: Arc<dyn Lookup>,
) -> FieldResolver {
    let directive: Arc<str> = Arc::from(directive_name);
    FieldResolver::new(move |info: ResolveInfo| {
        convert_field(
            original.clone(),
            args.clone(),
            Arc::clone(&directive),
            Arc::clone(&lookup),
            info,
        )
    })
}

async fn convert_field(
    original: FieldResolver,
    args: DirectiveArguments,
    directive: Arc<str>,
    lookup: Arc<dyn Lookup>,
    info: ResolveInfo,
) -> Result<Value, FieldError> {
    let (from, to) = validate_codes(&args.from, &args.to)?;
    check_return_type(&info.field_name, &info.return_type, &directive)?;

    let field_name = info.field_name.clone();
    let value = original.resolve(info).await?;
    let Some(amount) = coerce_amount(&value, &field_name)? else {
        return Ok(Value::Null);
    };

    let request = ConversionRequest::new(amount, from, to);
    match lookup.convert(&request).await {
        Ok(converted) => {
            tracing::debug!(field = %field_name, %amount, %from, %to, %converted, "converted amount");
            Ok(Value::String(converted))
        }
        Err(source) => {
            tracing::warn!(field = %field_name, %amount, %from, %to, error = %source, "currency lookup failed");
            Err(FieldError::Lookup {
                amount,
                from: from.to_string(),
                to: to.to_string(),
                source,
            })
        }
    }
}

/// Check both codes against the recognized set.
///
/// # Errors
///
/// `FieldError::InvalidCode` listing every unrecognized code, `from` first.
pub fn validate_codes(from: &str, to: &str) -> Result<(CurrencyCode, CurrencyCode), FieldError> {
    match (CurrencyCode::parse(from), CurrencyCode::parse(to)) {
        (Some(from), Some(to)) => Ok((from, to)),
        (from_code, to_code) => {
            let codes = [(from, from_code), (to, to_code)]
                .into_iter()
                .filter(|(_, parsed)| parsed.is_none())
                .map(|(raw, _)| raw.to_string())
                .collect();
            Err(FieldError::InvalidCode { codes })
        }
    }
}

/// Check a field's declared type, ignoring a non-null wrapper.
///
/// # Errors
///
/// `FieldError::UnsupportedType` unless the type is `String` or `Float`.
pub fn check_return_type(
    field_name: &str,
    return_type: &TypeRef,
    directive_name: &str,
) -> Result<(), FieldError> {
    match return_type.nullable() {
        TypeRef::Named(name) if SUPPORTED_RETURN_TYPES.contains(&name.as_str()) => Ok(()),
        _ => Err(FieldError::UnsupportedType {
            field: field_name.to_string(),
            type_name: return_type.to_string(),
            directive: directive_name.to_string(),
        }),
    }
}

/// Numeric amount of a resolved value; `None` for `null`.
fn coerce_amount(value: &Value, field: &str) -> Result<Option<f64>, FieldError> {
    let amount = match value {
        Value::Null => return Ok(None),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    amount
        .filter(|a| a.is_finite())
        .map(Some)
        .ok_or_else(|| FieldError::NonNumeric {
            field: field.to_string(),
            actual: value.to_string(),
        })
}
