//! Response envelope shared by every API endpoint

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::request::Payload;

/// Message returned when no response could be obtained
pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error. Please check your connection and the console.";

/// `{success, message?, ...}` as returned by the API
///
/// The body object is kept as received, so a 2xx response serialises back
/// unchanged even when `success` or `message` are not the usual `bool` and
/// string. Anything that is not a JSON object fails to deserialise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Envelope {
    body: Payload,
}

impl Envelope {
    pub fn ok() -> Self {
        Self::default().with_field("success", true)
    }

    /// Failure envelope carrying a message for the user
    pub fn failure(message: impl Into<String>) -> Self {
        Self::default()
            .with_field("success", false)
            .with_field("message", message.into())
    }

    /// Add a passthrough field
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.insert(key.into(), value.into());
        self
    }

    /// Truthiness of `success`; a missing field reads as failure
    pub fn is_success(&self) -> bool {
        self.body.get("success").is_some_and(is_truthy)
    }

    /// `message` when it is a string
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }

    /// Raw field such as `data` or `warehouses`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }

    /// Deserialize a field
    ///
    /// # Errors
    ///
    /// Returns an error if the field is present but does not match `T`
    pub fn field<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, serde_json::Error> {
        self.body
            .get(key)
            .map(|value| T::deserialize(value))
            .transpose()
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
