//! Core types for the currency directive.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::codes::CurrencyCode;

/// Directive name used when none is configured.
pub const DEFAULT_DIRECTIVE_NAME: &str = "currency";

/// Name of the generated enum type.
pub const CURRENCY_ENUM_NAME: &str = "CurrencyCode";

/// Scalar return types the directive may be attached to.
pub const SUPPORTED_RETURN_TYPES: &[&str] = &["String", "Float"];

/// Arguments of one `@currency(from: .., to: ..)` annotation.
///
/// Codes are kept as raw strings here. Membership in the recognized set is
/// checked when the field resolves, not when the schema is built, so any
/// object payload deserializes: a missing code becomes an empty string and a
/// non-string code keeps its JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveArguments {
    #[serde(default, deserialize_with = "code_text")]
    pub from: String,
    #[serde(default, deserialize_with = "code_text")]
    pub to: String,
}

fn code_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(code) => code,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

impl DirectiveArguments {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// One conversion to perform, built per field resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionRequest {
    pub amount: f64,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
}

impl ConversionRequest {
    pub fn new(amount: f64, from: CurrencyCode, to: CurrencyCode) -> Self {
        Self { amount, from, to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn directive_arguments_from_json() {
        let args: DirectiveArguments =
            serde_json::from_value(json!({ "from": "GBP", "to": "USD" })).unwrap();
        assert_eq!(args, DirectiveArguments::new("GBP", "USD"));
    }

    #[test]
    fn directive_arguments_are_lenient() {
        let args: DirectiveArguments = serde_json::from_value(json!({ "from": "GBP" })).unwrap();
        assert_eq!(args, DirectiveArguments::new("GBP", ""));

        let args: DirectiveArguments =
            serde_json::from_value(json!({ "from": null, "to": 7 })).unwrap();
        assert_eq!(args, DirectiveArguments::new("", "7"));

        let args: DirectiveArguments = serde_json::from_value(json!({})).unwrap();
        assert_eq!(args, DirectiveArguments::new("", ""));
    }

    #[test]
    fn amount_displays_in_shortest_form() {
        let gbp = CurrencyCode::parse("GBP").unwrap();
        let usd = CurrencyCode::parse("USD").unwrap();
        let request = ConversionRequest::new(100.0, gbp, usd);
        assert_eq!(request.amount.to_string(), "100");

        let request = ConversionRequest::new(12.5, gbp, usd);
        assert_eq!(request.amount.to_string(), "12.5");
    }
}
