//! CLI commands

use anyhow::{Context, Result};
use clap::Subcommand;
use depot_http::{CallOptions, DepotClient, Envelope, Method, Payload, Resource};
use tracing::info;

#[derive(Subcommand)]
pub enum Commands {
    /// Call an endpoint directly
    Call {
        /// HTTP method (GET, POST, PUT, DELETE)
        method: Method,

        /// Endpoint path relative to the base URL, may include a query string
        url: String,

        /// JSON object sent as the request body
        #[arg(long)]
        data: Option<String>,

        /// Do not attach the selected warehouse
        #[arg(long)]
        no_context: bool,
    },

    /// Log in and print the session details
    Login,

    /// List the warehouses available to the user
    Warehouses,

    /// List every record of a resource
    List {
        /// Resource name, e.g. products, suppliers, user-activity
        resource: Resource,
    },

    /// Fetch one record of a resource
    Get {
        resource: Resource,
        id: String,
    },

    /// Run a report
    Report {
        /// Report type
        kind: String,

        /// Report parameters as key=value
        #[arg(value_parser = parse_key_value)]
        params: Vec<(String, String)>,
    },
}

impl Commands {
    /// Run the command, logging in first when credentials are given
    pub async fn execute(
        self,
        client: &DepotClient,
        credentials: Option<Credentials>,
    ) -> Result<Envelope> {
        if let Some(credentials) = &credentials {
            let login = client
                .login(&credentials.username, &credentials.password)
                .await;
            if !login.is_success() || matches!(self, Self::Login) {
                return Ok(login);
            }
            info!(username = %credentials.username, "logged in");
        }

        let envelope = match self {
            Self::Call {
                method,
                url,
                data,
                no_context,
            } => {
                let data = data.as_deref().map(parse_payload).transpose()?;
                let options = if no_context {
                    CallOptions::without_context()
                } else {
                    CallOptions::default()
                };
                client.call_with(&url, method, data, options).await
            }
            Self::Login => anyhow::bail!("login requires --user and --password"),
            Self::Warehouses => client.list_warehouses().await,
            Self::List { resource } => client.list(resource).await,
            Self::Get { resource, id } => client.fetch(resource, &id).await,
            Self::Report { kind, params } => {
                client
                    .report(
                        &kind,
                        params.iter().map(|(k, v)| (k.as_str(), v.as_str())),
                    )
                    .await
            }
        };
        Ok(envelope)
    }
}

/// Username and password used to open a session before the command runs
pub struct Credentials {
    pub username: String,
    pub password: String,
}

fn parse_payload(raw: &str) -> Result<Payload> {
    serde_json::from_str(raw).context("--data must be a JSON object")
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))?;
    if key.is_empty() {
        return Err(format!("empty key in `{raw}`"));
    }
    Ok((key.to_string(), value.to_string()))
}
