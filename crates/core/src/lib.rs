//! Depot core types: configuration, validation and the shared warehouse context

pub mod config;
pub mod context;
pub mod error;
pub mod validation;

pub use config::ClientConfig;
pub use context::{ContextId, WarehouseContext};
pub use error::{CoreError, CoreResult};
pub use validation::ValidateConfig;
