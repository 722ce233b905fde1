//! Currency Directive
//!
//! Field-level `@currency(from: "GBP", to: "USD")` annotation for API schemas.
//!
//! The directive transformer rewrites the resolver of every annotated field so
//! that the resolved amount is converted through an external [`Lookup`] and
//! returned as text. Fields without the annotation are left untouched.
//!
//! # Example
//!
//! ```
//! use currency_directive::lookup::mock::MockLookup;
//! use currency_directive::{execute, CurrencyDirective, FieldConfig, ObjectType, Schema, TypeRef};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let schema = Schema::new()
//!     .with_type(
//!         "Query",
//!         ObjectType::new().field("user", FieldConfig::new(TypeRef::named("User"))),
//!     )
//!     .with_type(
//!         "User",
//!         ObjectType::new().field(
//!             "amount",
//!             FieldConfig::new(TypeRef::named("String"))
//!                 .directive("currency", json!({ "from": "GBP", "to": "USD" })),
//!         ),
//!     );
//!
//! let lookup = MockLookup::with_reply("127.10");
//! let directive = CurrencyDirective::new(lookup.clone());
//! let schema = directive.transform(schema);
//!
//! let result = execute(&schema, "Query", json!({ "user": { "amount": 100 } })).await;
//! assert_eq!(result.data["user"]["amount"], "127.10");
//! assert_eq!(lookup.call_count(), 1);
//! # });
//! ```
//!
//! # Type definitions
//!
//! [`CurrencyDirective::type_defs`] returns the fragment a host merges with
//! its own type definitions:
//!
//! ```text
//! directive @currency(from: String!, to: String!) on FIELD_DEFINITION
//!
//! enum CurrencyCode {
//!   AED
//!   ...
//!   ZMW
//! }
//! ```
//!
//! # Resolution errors
//!
//! | Error | Raised when |
//! |-------|-------------|
//! | [`FieldError::InvalidCode`] | `from` or `to` is not a recognized code |
//! | [`FieldError::UnsupportedType`] | the field is not `String` or `Float` |
//! | [`FieldError::Lookup`] | the conversion source failed |

mod codes;
mod directive;
mod error;
mod execute;
mod linter;
mod loader;
pub mod lookup;
mod schema;
mod transformer;
mod typedefs;
mod types;

pub use codes::{CurrencyCode, CURRENCY_CODES};
pub use directive::{fetch_directive, has_directive};
pub use error::{ExecutionError, FieldError, LoadError, LookupError};
pub use execute::{execute, ExecutionResult};
pub use linter::{lint, Diagnostic, LintResult, Severity};
pub use loader::{load_schema, load_schema_str, load_value};
pub use lookup::{Lookup, ScrapeConfig};
pub use schema::{
    default_field_resolver, map_object_fields, DirectiveInstance, FieldConfig, FieldResolver,
    ObjectType, ResolveFuture, ResolveInfo, Schema, TypeRef,
};
pub use transformer::{
    build, check_return_type, validate_codes, wrap_resolver, CurrencyDirective, DirectiveParts,
    Transformer,
};
pub use typedefs::{currency_type_defs, directive_definition, generate_enum};
pub use types::{
    ConversionRequest, DirectiveArguments, CURRENCY_ENUM_NAME, DEFAULT_DIRECTIVE_NAME,
    SUPPORTED_RETURN_TYPES,
};

#[cfg(feature = "remote")]
pub use lookup::ScrapeLookup;
