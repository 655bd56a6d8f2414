//! Per-page API resources
//!
//! Each page of the application talks to one endpoint. Listing and lookups
//! use GET with query parameters; writes send a JSON body.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use super::DepotClient;
use crate::envelope::Envelope;
use crate::request::{self, Method, Payload};

/// API resource backing one page of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Dashboard,
    Products,
    Suppliers,
    Warehouses,
    Reports,
    Translations,
    UserActivity,
    Batches,
    Deliveries,
    Orders,
}

impl Resource {
    pub const ALL: [Self; 10] = [
        Self::Dashboard,
        Self::Products,
        Self::Suppliers,
        Self::Warehouses,
        Self::Reports,
        Self::Translations,
        Self::UserActivity,
        Self::Batches,
        Self::Deliveries,
        Self::Orders,
    ];

    /// Endpoint path relative to the base URL
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Dashboard => "api/dashboard_api.php",
            Self::Products => "api/products_api.php",
            Self::Suppliers => "api/suppliers_api.php",
            Self::Warehouses => "api/warehouses_api.php",
            Self::Reports => "api/reports_api.php",
            Self::Translations => "api/translations_api.php",
            Self::UserActivity => "api/user_activity_api.php",
            Self::Batches => "api/batches_api.php",
            Self::Deliveries => "api/deliveries_api.php",
            Self::Orders => "api/orders_api.php",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Products => "products",
            Self::Suppliers => "suppliers",
            Self::Warehouses => "warehouses",
            Self::Reports => "reports",
            Self::Translations => "translations",
            Self::UserActivity => "user-activity",
            Self::Batches => "batches",
            Self::Deliveries => "deliveries",
            Self::Orders => "orders",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource: {0}")]
pub struct UnknownResource(pub String);

impl FromStr for Resource {
    type Err = UnknownResource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|resource| resource.name() == name)
            .ok_or_else(|| UnknownResource(s.to_string()))
    }
}

impl DepotClient {
    /// List every record of a resource
    pub async fn list(&self, resource: Resource) -> Envelope {
        self.get(resource.endpoint()).await
    }

    /// Fetch one record by id
    pub async fn fetch(&self, resource: Resource, id: &str) -> Envelope {
        let url = request::with_query(resource.endpoint(), [("id", id)]);
        self.get(&url).await
    }

    /// GET a resource with query parameters (search, filters, paging)
    pub async fn query<I, K, V>(&self, resource: Resource, params: I) -> Envelope
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let url = request::with_query(resource.endpoint(), params);
        self.get(&url).await
    }

    pub async fn create(&self, resource: Resource, data: Payload) -> Envelope {
        self.call(resource.endpoint(), Method::Post, Some(data))
            .await
    }

    /// Update a record; `id` is merged into the body
    pub async fn update(&self, resource: Resource, id: &str, mut data: Payload) -> Envelope {
        data.insert("id".to_string(), Value::from(id));
        self.call(resource.endpoint(), Method::Put, Some(data))
            .await
    }

    pub async fn remove(&self, resource: Resource, id: &str) -> Envelope {
        let mut data = Payload::new();
        data.insert("id".to_string(), Value::from(id));
        self.call(resource.endpoint(), Method::Delete, Some(data))
            .await
    }

    /// Run a report of the given kind
    pub async fn report<'a, I>(&self, kind: &'a str, params: I) -> Envelope
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let params = std::iter::once(("type", kind)).chain(params);
        self.query(Resource::Reports, params).await
    }
}
