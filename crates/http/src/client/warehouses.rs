//! Warehouse selection

use std::sync::Arc;

use depot_core::ContextId;
use depot_core::config::WAREHOUSE_LIST_ENDPOINT;

use super::DepotClient;
use crate::envelope::Envelope;
use crate::request::{CallOptions, Method};

impl DepotClient {
    /// Warehouses available to the logged-in user
    pub async fn list_warehouses(&self) -> Envelope {
        self.call_with(
            WAREHOUSE_LIST_ENDPOINT,
            Method::Get,
            None,
            CallOptions::without_context(),
        )
        .await
    }

    /// Select the warehouse attached to subsequent calls
    pub fn select_warehouse(&self, id: impl Into<ContextId>) {
        self.context().set(id);
    }

    pub fn current_warehouse(&self) -> Option<Arc<ContextId>> {
        self.context().current()
    }
}
