//! Schema-language fragments generated from the static code table.

use crate::codes::CurrencyCode;
use crate::types::CURRENCY_ENUM_NAME;

/// Render an enum declaration with one member per line, in input order.
pub fn generate_enum<'a>(name: &str, members: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = format!("enum {} {{\n", name);
    for member in members {
        out.push_str("  ");
        out.push_str(member);
        out.push('\n');
    }
    out.push('}');
    out
}

/// Declaration of the directive itself, restricted to field definitions.
pub fn directive_definition(directive_name: &str) -> String {
    format!(
        "directive @{}(from: String!, to: String!) on FIELD_DEFINITION",
        directive_name
    )
}

/// Full fragment: the directive declaration followed by the `CurrencyCode` enum.
pub fn currency_type_defs(directive_name: &str) -> String {
    format!(
        "{}\n\n{}\n",
        directive_definition(directive_name),
        generate_enum(CURRENCY_ENUM_NAME, CurrencyCode::all().map(|c| c.as_str()))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::CURRENCY_CODES;

    fn enum_members(type_defs: &str) -> Vec<&str> {
        let body = type_defs
            .split_once("enum CurrencyCode {\n")
            .map(|(_, rest)| rest)
            .unwrap();
        body.lines()
            .take_while(|line| *line != "}")
            .map(str::trim)
            .collect()
    }

    #[test]
    fn generate_enum_layout() {
        assert_eq!(
            generate_enum("Color", ["RED", "GREEN"]),
            "enum Color {\n  RED\n  GREEN\n}"
        );
    }

    #[test]
    fn generate_enum_empty() {
        assert_eq!(generate_enum("Empty", Vec::<&str>::new()), "enum Empty {\n}");
    }

    #[test]
    fn directive_definition_uses_name() {
        assert_eq!(
            directive_definition("money"),
            "directive @money(from: String!, to: String!) on FIELD_DEFINITION"
        );
    }

    #[test]
    fn enum_contains_every_code_once_in_order() {
        let type_defs = currency_type_defs("currency");
        let members = enum_members(&type_defs);
        let expected: Vec<&str> = CURRENCY_CODES.iter().map(|(c, _)| *c).collect();
        assert_eq!(members, expected);
    }

    #[test]
    fn type_defs_start_with_directive() {
        let type_defs = currency_type_defs("currency");
        assert!(type_defs.starts_with(
            "directive @currency(from: String!, to: String!) on FIELD_DEFINITION\n"
        ));
    }

    #[test]
    fn type_defs_are_deterministic() {
        assert_eq!(currency_type_defs("currency"), currency_type_defs("currency"));
    }
}
