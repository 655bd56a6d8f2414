//! Shared warehouse context
//!
//! The selected warehouse is read by the request client on every call and
//! written by whichever part of the application lets the user pick one.
//! Clones of [`WarehouseContext`] share the same slot.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Identifier of the selected warehouse
///
/// The API accepts either form; the JSON type is preserved when the
/// identifier is merged into a request body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextId {
    Number(i64),
    Text(String),
}

impl ContextId {
    /// JSON representation used when merging into a request body
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Number(n) => serde_json::Value::from(*n),
            Self::Text(s) => serde_json::Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ContextId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<String> for ContextId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for ContextId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Parses user input (CLI flags, config values). Input is kept as text.
impl FromStr for ContextId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidContextId(s.to_string()));
        }
        Ok(Self::Text(trimmed.to_string()))
    }
}

/// Handle to the currently selected warehouse
#[derive(Debug, Clone, Default)]
pub struct WarehouseContext {
    current: Arc<ArcSwapOption<ContextId>>,
}

impl WarehouseContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a warehouse
    pub fn set(&self, id: impl Into<ContextId>) {
        let id = id.into();
        tracing::debug!(context_id = %id, "warehouse context selected");
        self.current.store(Some(Arc::new(id)));
    }

    /// Forget the selected warehouse
    pub fn clear(&self) {
        tracing::debug!("warehouse context cleared");
        self.current.store(None);
    }

    /// Snapshot of the selected warehouse
    pub fn current(&self) -> Option<Arc<ContextId>> {
        self.current.load_full()
    }

    pub fn is_set(&self) -> bool {
        self.current.load().is_some()
    }
}
