//! Authentication API client methods
//!
//! The auth endpoint never receives the warehouse context.

use depot_core::config::AUTH_ENDPOINT;
use serde::Serialize;

use super::DepotClient;
use crate::envelope::Envelope;
use crate::request::{self, CallOptions, Method};

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    action: &'static str,
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct ActionRequest {
    action: &'static str,
}

impl DepotClient {
    /// Log in; the session cookie is kept for later calls
    pub async fn login(&self, username: &str, password: &str) -> Envelope {
        let body = LoginRequest {
            action: "login",
            username,
            password,
        };
        self.send(AUTH_ENDPOINT, Method::Post, &body, CallOptions::without_context())
            .await
    }

    /// Log out and forget the selected warehouse
    pub async fn logout(&self) -> Envelope {
        let body = ActionRequest { action: "logout" };
        let envelope = self
            .send(AUTH_ENDPOINT, Method::Post, &body, CallOptions::without_context())
            .await;
        if envelope.is_success() {
            self.context().clear();
        }
        envelope
    }

    /// Ask whether the current session is still valid
    pub async fn check_session(&self) -> Envelope {
        let url = request::with_query(AUTH_ENDPOINT, [("action", "check_session")]);
        self.call_with(&url, Method::Get, None, CallOptions::without_context())
            .await
    }
}
