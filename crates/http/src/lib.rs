//! Depot HTTP request client
//!
//! Every call to the warehouse JSON API goes through [`DepotClient`]. The
//! client attaches the selected warehouse, serialises request bodies and
//! normalises every outcome into an [`Envelope`], so callers only ever look
//! at `success` and `message`.

pub mod client;
pub mod envelope;
pub mod request;

pub use client::error::ClientError;
pub use client::resources::{Resource, UnknownResource};
pub use client::{DepotClient, DepotClientBuilder, UnauthorizedHandler};
pub use envelope::{Envelope, NETWORK_ERROR_MESSAGE};
pub use request::{CallOptions, Method, Payload, RequestEnvelope, UnsupportedMethod};

pub use depot_core::{ContextId, WarehouseContext};
