//! Validator/serializer pairs that turn untyped JSON into typed config and back.

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Failure reported by either half of a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SchemaError {
    message: String,
}

impl SchemaError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string())
    }
}

type ValidateFn<T> = dyn Fn(&Value) -> Result<T, SchemaError> + Send + Sync;
type SerializeFn<T> = dyn Fn(&T) -> Result<Value, SchemaError> + Send + Sync;

/// A bidirectional transform between untyped JSON and a typed config value.
///
/// `validate` coerces arbitrary input into `T` (or explains why it cannot);
/// `serialize` produces the canonical JSON form written back to disk. The pair
/// must be stable: `validate(serialize(v))` yields `v` for any `v` that
/// `validate` produced.
pub struct Schema<T> {
    validate: Box<ValidateFn<T>>,
    serialize: Box<SerializeFn<T>>,
}

impl<T> Schema<T> {
    /// Bundle an arbitrary validator and serializer.
    pub fn new<V, S>(validate: V, serialize: S) -> Self
    where
        V: Fn(&Value) -> Result<T, SchemaError> + Send + Sync + 'static,
        S: Fn(&T) -> Result<Value, SchemaError> + Send + Sync + 'static,
    {
        Self {
            validate: Box::new(validate),
            serialize: Box::new(serialize),
        }
    }

    pub fn validate(&self, raw: &Value) -> Result<T, SchemaError> {
        (self.validate)(raw)
    }

    pub fn serialize(&self, value: &T) -> Result<Value, SchemaError> {
        (self.serialize)(value)
    }
}

impl<T> Schema<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    /// Schema derived from `T`'s serde impls.
    ///
    /// Defaults come from `#[serde(default)]`, so a type whose fields all have
    /// defaults validates `{}` into its default value.
    pub fn serde() -> Self {
        Self::new(
            |raw| serde_json::from_value(raw.clone()).map_err(SchemaError::from),
            |value| serde_json::to_value(value).map_err(SchemaError::from),
        )
    }

    /// Schema that checks input against a JSON Schema document before the serde
    /// conversion.
    ///
    /// Every violation is reported, joined into a single message.
    pub fn with_json_schema(document: &Value) -> Result<Self, SchemaError> {
        let compiled = jsonschema::validator_for(document)
            .map_err(|err| SchemaError::new(format!("invalid json schema: {err}")))?;
        Ok(Self::new(
            move |raw| {
                let messages = compiled
                    .iter_errors(raw)
                    .map(|err| err.to_string())
                    .collect::<Vec<_>>();
                if !messages.is_empty() {
                    return Err(SchemaError::new(format!(
                        "schema validation failed:\n- {}",
                        messages.join("\n- ")
                    )));
                }
                serde_json::from_value(raw.clone()).map_err(SchemaError::from)
            },
            |value| serde_json::to_value(value).map_err(SchemaError::from),
        ))
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Settings {
        port: u16,
        host: String,
        tags: Vec<String>,
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                port: 8080,
                host: "localhost".to_string(),
                tags: Vec::new(),
            }
        }
    }

    #[test]
    fn serde_schema_fills_defaults_from_empty_object() {
        let schema = Schema::<Settings>::serde();
        let settings = schema.validate(&json!({})).expect("validate");
        assert_eq!(settings, Settings::default());
    }

    /// Verifies validate(serialize(v)) == v for values the validator produced.
    #[test]
    fn serde_schema_round_trip_is_stable() {
        let schema = Schema::<Settings>::serde();
        for raw in [
            json!({}),
            json!({ "port": 1 }),
            json!({ "host": "example.org", "tags": ["a", "b"] }),
        ] {
            let value = schema.validate(&raw).expect("validate");
            let canonical = schema.serialize(&value).expect("serialize");
            let again = schema.validate(&canonical).expect("revalidate");
            assert_eq!(again, value);
        }
    }

    #[test]
    fn serde_schema_reports_type_errors() {
        let schema = Schema::<Settings>::serde();
        let err = schema
            .validate(&json!({ "port": "eighty" }))
            .expect_err("should reject string port");
        assert!(err.message().contains("invalid type"));
    }

    #[test]
    fn json_schema_rejects_missing_required_field() {
        let document = json!({
            "type": "object",
            "required": ["host"],
            "properties": { "host": { "type": "string" } }
        });
        let schema = Schema::<Settings>::with_json_schema(&document).expect("compile");
        let err = schema.validate(&json!({})).expect_err("host is required");
        assert!(err.message().starts_with("schema validation failed"));
        assert!(err.message().contains("host"));

        let settings = schema
            .validate(&json!({ "host": "db" }))
            .expect("validate");
        assert_eq!(settings.host, "db");
        assert_eq!(settings.port, 8080);
    }

    #[test]
    fn json_schema_rejects_invalid_document() {
        let document = json!({ "type": 12 });
        let err = Schema::<Settings>::with_json_schema(&document).expect_err("bad schema");
        assert!(err.message().contains("invalid json schema"));
    }

    #[test]
    fn custom_pair_is_applied_as_given() {
        let schema = Schema::new(
            |raw: &Value| {
                raw.get("level")
                    .and_then(Value::as_u64)
                    .ok_or_else(|| SchemaError::new("level must be a number"))
            },
            |level: &u64| Ok(json!({ "level": level })),
        );
        assert_eq!(schema.validate(&json!({ "level": 3 })).expect("validate"), 3);
        assert_eq!(
            schema.validate(&json!({})).expect_err("missing").message(),
            "level must be a number"
        );
        assert_eq!(schema.serialize(&7).expect("serialize"), json!({ "level": 7 }));
    }
}
