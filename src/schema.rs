//! Schema model consumed by the directive transformer.
//!
//! This is the host boundary: object types, their field configurations and
//! the directive instances attached to each field. Field configurations also
//! carry the runtime resolver, which the transformer may replace.

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{FieldError, LoadError};

/// Future returned by a field resolver.
pub type ResolveFuture = BoxFuture<'static, Result<Value, FieldError>>;

/// Everything a resolver sees about the field being resolved.
#[derive(Debug, Clone)]
pub struct ResolveInfo {
    pub parent_type: String,
    pub field_name: String,
    pub return_type: TypeRef,
    /// Value of the parent object.
    pub source: Value,
    pub args: Map<String, Value>,
}

/// Shared, possibly asynchronous field resolution function.
#[derive(Clone)]
pub struct FieldResolver(Arc<dyn Fn(ResolveInfo) -> ResolveFuture + Send + Sync>);

impl FieldResolver {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(ResolveInfo) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, FieldError>> + Send + 'static,
    {
        FieldResolver(Arc::new(move |info| f(info).boxed()))
    }

    /// Resolver that always returns the given value.
    pub fn constant(value: Value) -> Self {
        FieldResolver::new(move |_| {
            let value = value.clone();
            async move { Ok::<_, FieldError>(value) }
        })
    }

    pub fn resolve(&self, info: ResolveInfo) -> ResolveFuture {
        (self.0)(info)
    }

    /// True if both handles share the same resolver allocation.
    pub fn ptr_eq(&self, other: &FieldResolver) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for FieldResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FieldResolver(..)")
    }
}

/// Resolver used for fields without an explicit one: reads the property of
/// the parent value named after the field, or `null`.
pub fn default_field_resolver() -> FieldResolver {
    FieldResolver::new(|info: ResolveInfo| {
        let value = info
            .source
            .get(&info.field_name)
            .cloned()
            .unwrap_or(Value::Null);
        async move { Ok::<_, FieldError>(value) }
    })
}

/// Declared type of a field, e.g. `Float`, `String!` or `[User]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeRef {
    Named(String),
    NonNull(Box<TypeRef>),
    List(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn non_null(inner: TypeRef) -> Self {
        TypeRef::NonNull(Box::new(inner))
    }

    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    /// Innermost named type, ignoring list and non-null wrappers.
    pub fn named_type(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::NonNull(inner) | TypeRef::List(inner) => inner.named_type(),
        }
    }

    /// The type with an outer non-null wrapper removed.
    pub fn nullable(&self) -> &TypeRef {
        match self {
            TypeRef::NonNull(inner) => inner,
            other => other,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::NonNull(inner) => write!(f, "{}!", inner),
            TypeRef::List(inner) => write!(f, "[{}]", inner),
        }
    }
}

impl FromStr for TypeRef {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| LoadError::InvalidTypeRef {
            value: s.to_string(),
            message: message.to_string(),
        };
        let s = s.trim();

        if let Some(inner) = s.strip_suffix('!') {
            if inner.ends_with('!') {
                return Err(invalid("repeated non-null marker"));
            }
            return Ok(TypeRef::non_null(inner.parse()?));
        }

        if let Some(rest) = s.strip_prefix('[') {
            let inner = rest
                .strip_suffix(']')
                .ok_or_else(|| invalid("unclosed list"))?;
            return Ok(TypeRef::list(inner.parse()?));
        }

        let mut chars = s.chars();
        match chars.next() {
            None => Err(invalid("empty type name")),
            Some(c) if c.is_ascii_digit() => Err(invalid("type name starts with a digit")),
            Some(_) if s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') => {
                Ok(TypeRef::named(s))
            }
            Some(_) => Err(invalid("unexpected character")),
        }
    }
}

impl TryFrom<String> for TypeRef {
    type Error = LoadError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

/// One directive applied to a field, with its raw argument payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectiveInstance {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Configuration of a single object field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<DirectiveInstance>,
    /// Runtime resolver. `None` means the default property resolver.
    #[serde(skip)]
    pub resolve: Option<FieldResolver>,
}

impl FieldConfig {
    pub fn new(ty: TypeRef) -> Self {
        Self {
            ty,
            directives: Vec::new(),
            resolve: None,
        }
    }

    pub fn directive(mut self, name: impl Into<String>, arguments: Value) -> Self {
        self.directives.push(DirectiveInstance {
            name: name.into(),
            arguments,
        });
        self
    }

    pub fn resolver(mut self, resolver: FieldResolver) -> Self {
        self.resolve = Some(resolver);
        self
    }

    /// All directive instances with the given name, in declaration order.
    pub fn directives_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a DirectiveInstance> + 'a {
        self.directives.iter().filter(move |d| d.name == name)
    }
}

/// An object type and its fields, in declaration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectType {
    #[serde(default)]
    pub fields: IndexMap<String, FieldConfig>,
}

impl ObjectType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, config: FieldConfig) -> Self {
        self.fields.insert(name.into(), config);
        self
    }
}

/// Object types of a schema keyed by type name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub types: IndexMap<String, ObjectType>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, name: impl Into<String>, object: ObjectType) -> Self {
        self.types.insert(name.into(), object);
        self
    }

    pub fn object_type(&self, name: &str) -> Option<&ObjectType> {
        self.types.get(name)
    }

    pub fn field(&self, type_name: &str, field_name: &str) -> Option<&FieldConfig> {
        self.types.get(type_name)?.fields.get(field_name)
    }
}

/// Visit every object-type field, replacing those for which `mapper`
/// returns a new configuration. Fields mapped to `None` are left as-is.
pub fn map_object_fields<F>(mut schema: Schema, mut mapper: F) -> Schema
where
    F: FnMut(&str, &str, &FieldConfig) -> Option<FieldConfig>,
{
    for (type_name, object) in schema.types.iter_mut() {
        for (field_name, field) in object.fields.iter_mut() {
            if let Some(replacement) = mapper(type_name, field_name, field) {
                *field = replacement;
            }
        }
    }
    schema
}
