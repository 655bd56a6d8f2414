//! Outgoing request envelope and the context injection rules

use std::fmt;
use std::str::FromStr;

use depot_core::ContextId;
use serde_json::Value;
use url::form_urlencoded;

/// JSON object sent as a request body
pub type Payload = serde_json::Map<String, Value>;

/// Name under which the warehouse context travels
pub const CONTEXT_PARAM: &str = "contextId";

/// HTTP verbs understood by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Whether requests with this verb carry a JSON body
    pub const fn has_body(self) -> bool {
        !matches!(self, Self::Get)
    }

    pub(crate) fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown verb
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported HTTP method: {0}")]
pub struct UnsupportedMethod(pub String);

impl FromStr for Method {
    type Err = UnsupportedMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            _ => Err(UnsupportedMethod(s.to_string())),
        }
    }
}

/// Per-call options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallOptions {
    /// Attach the selected warehouse to this call
    pub inject_context: bool,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            inject_context: true,
        }
    }
}

impl CallOptions {
    /// Options for endpoints that must not see the warehouse context
    pub const fn without_context() -> Self {
        Self {
            inject_context: false,
        }
    }
}

/// A request ready to be dispatched
#[derive(Debug, Clone, PartialEq)]
pub struct RequestEnvelope {
    pub url: String,
    pub method: Method,
    pub body: Option<Payload>,
}

impl RequestEnvelope {
    /// Build the outgoing request, merging `context` into exactly one place:
    /// the query string for GET, the body for every other verb.
    ///
    /// `data` is dropped for GET.
    pub fn build(
        url: &str,
        method: Method,
        data: Option<Payload>,
        context: Option<&ContextId>,
    ) -> Self {
        let mut url = url.to_string();
        let mut body = if method.has_body() {
            data
        } else {
            if data.is_some() {
                tracing::debug!(%url, "ignoring request body for GET");
            }
            None
        };

        if let Some(id) = context {
            if method.has_body() {
                body.get_or_insert_with(Payload::new)
                    .insert(CONTEXT_PARAM.to_string(), id.to_json());
            } else {
                append_query_pair(&mut url, CONTEXT_PARAM, &id.to_string());
            }
        }

        Self { url, method, body }
    }
}

/// Whether `url` targets one of the context-exempt endpoints
pub fn is_exempt<S: AsRef<str>>(url: &str, exempt_endpoints: &[S]) -> bool {
    exempt_endpoints
        .iter()
        .map(AsRef::as_ref)
        .any(|pattern| !pattern.is_empty() && url.contains(pattern))
}

/// Append `key=value` to `url`, choosing `&` or `?` by whether a query string exists
pub fn append_query_pair(url: &mut String, key: &str, value: &str) {
    url.push(if url.contains('?') { '&' } else { '?' });
    url.extend(form_urlencoded::byte_serialize(key.as_bytes()));
    url.push('=');
    url.extend(form_urlencoded::byte_serialize(value.as_bytes()));
}

/// `path` with the given pairs appended as a form-encoded query string
pub fn with_query<I, K, V>(path: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut url = path.to_string();
    for (key, value) in params {
        append_query_pair(&mut url, key.as_ref(), value.as_ref());
    }
    url
}

/// Join a relative endpoint path onto the base URL; absolute URLs pass through
pub fn resolve_url(base_url: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        url.trim_start_matches('/')
    )
}
