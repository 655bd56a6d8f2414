//! Depot API client

pub mod auth;
pub mod error;
pub mod resources;
pub mod warehouses;

use std::sync::Arc;
use std::time::Duration;

use depot_core::config::{AUTH_ENDPOINT, WAREHOUSE_LIST_ENDPOINT};
use depot_core::{ClientConfig, ContextId, WarehouseContext};
use error::ClientError;
use reqwest::{Client, ClientBuilder};
use serde::Serialize;
use tracing::Instrument;

use crate::envelope::Envelope;
use crate::request::{self, CallOptions, Method, Payload, RequestEnvelope};

/// Default delay before the unauthorized hook fires
pub const DEFAULT_UNAUTHORIZED_DELAY: Duration = Duration::from_millis(2000);

/// Default login entry point handed to the unauthorized hook
pub const DEFAULT_LOGIN_PATH: &str = "login.html";

/// Callback invoked after a 401, with the login entry point
pub type UnauthorizedHandler = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Clone)]
struct UnauthorizedHook {
    handler: UnauthorizedHandler,
    delay: Duration,
    login_path: Arc<str>,
}

/// Depot API client
///
/// Cheap to clone; clones share the connection pool, cookie store and
/// warehouse context.
#[derive(Clone)]
pub struct DepotClient {
    client: Client,
    base_url: String,
    context: WarehouseContext,
    exempt_endpoints: Arc<[String]>,
    unauthorized: Option<UnauthorizedHook>,
}

impl DepotClient {
    /// Create a new client with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> DepotClientBuilder {
        DepotClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Warehouse context read on every call
    pub const fn context(&self) -> &WarehouseContext {
        &self.context
    }

    /// Whether a call to `url` with `options` gets the warehouse context
    pub fn injects_context(&self, url: &str, options: CallOptions) -> bool {
        options.inject_context && !request::is_exempt(url, &self.exempt_endpoints[..])
    }

    /// Build the request envelope for a call, reading the context once
    pub fn prepare(
        &self,
        url: &str,
        method: Method,
        data: Option<Payload>,
        options: CallOptions,
    ) -> RequestEnvelope {
        let context = if self.injects_context(url, options) {
            self.context.current()
        } else {
            None
        };
        RequestEnvelope::build(url, method, data, context.as_deref())
    }

    /// Call the API; every failure is folded into the returned envelope
    pub async fn call(&self, url: &str, method: Method, data: Option<Payload>) -> Envelope {
        self.call_with(url, method, data, CallOptions::default())
            .await
    }

    /// [`DepotClient::call`] with explicit per-call options
    pub async fn call_with(
        &self,
        url: &str,
        method: Method,
        data: Option<Payload>,
        options: CallOptions,
    ) -> Envelope {
        self.try_call_with(url, method, data, options)
            .await
            .unwrap_or_else(ClientError::into_envelope)
    }

    /// Call the API without normalising errors
    ///
    /// A 2xx response with `success: false` is still `Ok`.
    ///
    /// # Errors
    ///
    /// See [`ClientError`]; a 401 also schedules the unauthorized hook.
    pub async fn try_call(
        &self,
        url: &str,
        method: Method,
        data: Option<Payload>,
    ) -> Result<Envelope, ClientError> {
        self.try_call_with(url, method, data, CallOptions::default())
            .await
    }

    /// [`DepotClient::try_call`] with explicit per-call options
    ///
    /// # Errors
    ///
    /// See [`DepotClient::try_call`]
    pub async fn try_call_with(
        &self,
        url: &str,
        method: Method,
        data: Option<Payload>,
        options: CallOptions,
    ) -> Result<Envelope, ClientError> {
        let request = self.prepare(url, method, data, options);
        let span = tracing::debug_span!("api_call", method = %request.method, url = %request.url);
        self.execute(request).instrument(span).await
    }

    /// Serialise `payload` and send it as the request body
    pub async fn send<T: Serialize + ?Sized>(
        &self,
        url: &str,
        method: Method,
        payload: &T,
        options: CallOptions,
    ) -> Envelope {
        match to_payload(payload) {
            Ok(body) => self.call_with(url, method, Some(body), options).await,
            Err(err) => {
                tracing::error!(%url, error = %err, "could not serialise request payload");
                err.into_envelope()
            }
        }
    }

    pub async fn get(&self, url: &str) -> Envelope {
        self.call(url, Method::Get, None).await
    }

    pub async fn post(&self, url: &str, data: Payload) -> Envelope {
        self.call(url, Method::Post, Some(data)).await
    }

    pub async fn put(&self, url: &str, data: Payload) -> Envelope {
        self.call(url, Method::Put, Some(data)).await
    }

    pub async fn delete(&self, url: &str, data: Option<Payload>) -> Envelope {
        self.call(url, Method::Delete, data).await
    }

    /// Dispatch a prepared request and handle common errors
    async fn execute(&self, request: RequestEnvelope) -> Result<Envelope, ClientError> {
        let target = request::resolve_url(&self.base_url, &request.url);
        let mut builder = self.client.request(request.method.as_reqwest(), target);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.inspect_err(|err| {
            tracing::error!(error = %err, "network error");
        })?;
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await.inspect_err(|err| {
                tracing::error!(error = %err, "failed to read response body");
            })?;
            serde_json::from_slice(&bytes).map_err(|source| {
                tracing::error!(status = status.as_u16(), error = %source, "response is not a JSON envelope");
                ClientError::MalformedResponse {
                    status: status.as_u16(),
                    source,
                }
            })
        } else {
            let body = response.text().await.unwrap_or_default();
            let err = ClientError::from_status(status, &body);
            if err.is_unauthorized() {
                tracing::warn!(reason = %err.user_message(), "unauthorized, redirecting to login");
                self.schedule_unauthorized();
            } else {
                tracing::error!(status = status.as_u16(), reason = %err.user_message(), "API error");
            }
            Err(err)
        }
    }

    fn schedule_unauthorized(&self) {
        let Some(hook) = self.unauthorized.clone() else {
            return;
        };
        tokio::spawn(async move {
            tokio::time::sleep(hook.delay).await;
            (hook.handler)(&hook.login_path);
        });
    }
}

/// Serialise a value into a request body object
///
/// # Errors
///
/// Returns [`ClientError::Payload`] if `value` fails to serialise or is not a
/// JSON object
pub fn to_payload<T: Serialize + ?Sized>(value: &T) -> Result<Payload, ClientError> {
    match serde_json::to_value(value).map_err(ClientError::Payload)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(ClientError::Payload(
            <serde_json::Error as serde::ser::Error>::custom(format!(
                "expected a JSON object, got {other}"
            )),
        )),
    }
}

/// Builder for DepotClient
#[derive(Default)]
pub struct DepotClientBuilder {
    base_url: Option<String>,
    context: Option<WarehouseContext>,
    warehouse_id: Option<ContextId>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    exempt_endpoints: Option<Vec<String>>,
    on_unauthorized: Option<UnauthorizedHandler>,
    unauthorized_delay: Option<Duration>,
    login_path: Option<String>,
}

impl DepotClientBuilder {
    /// Start from loaded configuration
    pub fn from_config(config: &ClientConfig) -> Self {
        let mut builder = Self::default()
            .base_url(&config.base_url)
            .user_agent(&config.user_agent)
            .unauthorized_delay(Duration::from_millis(config.unauthorized_delay_ms))
            .login_path(&config.login_path)
            .exempt_endpoints(config.exempt_endpoints.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(warehouse) = &config.warehouse_id {
            builder = builder.warehouse_id(warehouse.trim());
        }
        builder
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Share an existing warehouse context
    pub fn context(mut self, context: WarehouseContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Select a warehouse when the client is built
    pub fn warehouse_id(mut self, id: impl Into<ContextId>) -> Self {
        self.warehouse_id = Some(id.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Replace the URL fragments that never receive the warehouse context
    pub fn exempt_endpoints<I, S>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exempt_endpoints = Some(endpoints.into_iter().map(Into::into).collect());
        self
    }

    /// Register the callback run after a 401
    pub fn on_unauthorized<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_unauthorized = Some(Arc::new(handler));
        self
    }

    pub fn unauthorized_delay(mut self, delay: Duration) -> Self {
        self.unauthorized_delay = Some(delay);
        self
    }

    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = Some(path.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<DepotClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();
        url::Url::parse(&base_url)
            .map_err(|e| ClientError::Configuration(format!("base_url: invalid URL - {e}")))?;

        let mut client_builder = ClientBuilder::new().cookie_store(true);

        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        if let Some(user_agent) = self.user_agent {
            client_builder = client_builder.user_agent(user_agent);
        } else {
            client_builder =
                client_builder.user_agent(concat!("depot-client/", env!("CARGO_PKG_VERSION")));
        }

        let client = client_builder
            .build()
            .map_err(|e| ClientError::Configuration(format!("http client: {e}")))?;

        let context = self.context.unwrap_or_default();
        if let Some(id) = self.warehouse_id {
            context.set(id);
        }

        let exempt_endpoints = self.exempt_endpoints.unwrap_or_else(|| {
            vec![
                AUTH_ENDPOINT.to_string(),
                WAREHOUSE_LIST_ENDPOINT.to_string(),
            ]
        });

        let unauthorized = self.on_unauthorized.map(|handler| UnauthorizedHook {
            handler,
            delay: self.unauthorized_delay.unwrap_or(DEFAULT_UNAUTHORIZED_DELAY),
            login_path: self
                .login_path
                .unwrap_or_else(|| DEFAULT_LOGIN_PATH.to_string())
                .into(),
        });

        Ok(DepotClient {
            client,
            base_url,
            context,
            exempt_endpoints: exempt_endpoints.into(),
            unauthorized,
        })
    }
}
