//! Minimal executor for transformed schemas.
//!
//! Resolves every field of an object type against a root value, recursing
//! into object-typed results. There is no query language: all fields are
//! selected. A failing field becomes `null` with an error recorded at its
//! path; sibling fields are resolved independently and concurrently.

use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ExecutionError;
use crate::schema::{default_field_resolver, FieldConfig, ResolveInfo, Schema, TypeRef};

/// Response data plus per-field errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionResult {
    pub data: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ExecutionError>,
}

impl ExecutionResult {
    /// Returns true if no field failed.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Value at a response path, e.g. `["user", "amount"]`.
    pub fn value_at(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(&self.data, |value, key| value.get(*key))
    }

    /// First error recorded for a response path.
    pub fn error_at(&self, path: &[&str]) -> Option<&ExecutionError> {
        self.errors
            .iter()
            .find(|e| e.path.iter().map(String::as_str).eq(path.iter().copied()))
    }
}

/// Resolve all fields of `type_name` with `root` as the parent value.
pub async fn execute(schema: &Schema, type_name: &str, root: Value) -> ExecutionResult {
    if schema.object_type(type_name).is_none() {
        return ExecutionResult {
            data: Value::Null,
            errors: vec![ExecutionError {
                path: Vec::new(),
                message: format!("unknown object type \"{}\"", type_name),
            }],
        };
    }

    let (data, errors) = resolve_object(schema, type_name, root, Vec::new()).await;
    ExecutionResult { data, errors }
}

type Completed = (Value, Vec<ExecutionError>);

fn resolve_object<'a>(
    schema: &'a Schema,
    type_name: &'a str,
    source: Value,
    path: Vec<String>,
) -> BoxFuture<'a, Completed> {
    async move {
        let Some(object) = schema.object_type(type_name) else {
            return (source, Vec::new());
        };

        let pending = object.fields.iter().map(|(name, field)| {
            let mut field_path = path.clone();
            field_path.push(name.clone());
            resolve_field(schema, type_name, name, field, source.clone(), field_path)
        });
        let results = join_all(pending).await;

        let mut data = Map::new();
        let mut errors = Vec::new();
        for (name, (value, mut field_errors)) in object.fields.keys().zip(results) {
            data.insert(name.clone(), value);
            errors.append(&mut field_errors);
        }
        (Value::Object(data), errors)
    }
    .boxed()
}

async fn resolve_field(
    schema: &Schema,
    type_name: &str,
    field_name: &str,
    field: &FieldConfig,
    source: Value,
    path: Vec<String>,
) -> Completed {
    let info = ResolveInfo {
        parent_type: type_name.to_string(),
        field_name: field_name.to_string(),
        return_type: field.ty.clone(),
        source,
        args: Map::new(),
    };
    let resolver = field
        .resolve
        .clone()
        .unwrap_or_else(default_field_resolver);

    match resolver.resolve(info).await {
        Ok(value) => complete_value(schema, &field.ty, value, path).await,
        Err(e) => {
            tracing::debug!(path = %path.join("."), error = %e, "field resolution failed");
            (
                Value::Null,
                vec![ExecutionError {
                    path,
                    message: e.to_string(),
                }],
            )
        }
    }
}

fn complete_value<'a>(
    schema: &'a Schema,
    ty: &'a TypeRef,
    value: Value,
    path: Vec<String>,
) -> BoxFuture<'a, Completed> {
    async move {
        match (ty.nullable(), value) {
            (_, Value::Null) => (Value::Null, Vec::new()),
            (TypeRef::List(inner), Value::Array(items)) => {
                let pending = items.into_iter().enumerate().map(|(i, item)| {
                    let mut item_path = path.clone();
                    item_path.push(i.to_string());
                    complete_value(schema, inner, item, item_path)
                });
                let mut errors = Vec::new();
                let values = join_all(pending)
                    .await
                    .into_iter()
                    .map(|(value, mut item_errors)| {
                        errors.append(&mut item_errors);
                        value
                    })
                    .collect();
                (Value::Array(values), errors)
            }
            (TypeRef::Named(name), value @ Value::Object(_))
                if schema.object_type(name).is_some() =>
            {
                resolve_object(schema, name, value, path).await
            }
            (_, value) => (value, Vec::new()),
        }
    }
    .boxed()
}
