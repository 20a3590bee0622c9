//! # API Envelope
//!
//! Every backend response is a JSON object with a `success` flag, an optional
//! human-readable `message`, and action-specific payload fields:
//!
//! ```json
//! { "success": true, "message": "Welcome back Asha", "user": { ... } }
//! { "success": false, "message": "Incorrect email or password" }
//! { "success": true, "orders": [ ... ] }
//! { "success": true, "session": { "url": "https://checkout.stripe.com/..." } }
//! ```
//!
//! A missing `success` reads as `false`. The payload is only decoded once the
//! envelope is known to be successful, so a rejection never fails on a
//! malformed payload.

use platter_core::{Order, User};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ClientError, ClientResult};

#[derive(Debug, Deserialize)]
struct Head {
    #[serde(default)]
    success: bool,

    #[serde(default)]
    message: Option<String>,
}

/// A successful response: the server's message plus the decoded payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<P> {
    pub message: Option<String>,
    pub payload: P,
}

impl<P: DeserializeOwned> Envelope<P> {
    /// Checks the success flag, then decodes the payload.
    ///
    /// ## Errors
    /// - `Rejected` with the server message, or `fallback` when it has none
    /// - `Decode` when the body or payload has the wrong shape
    pub fn accept(body: Value, fallback: &str) -> ClientResult<Self> {
        let head = Head::deserialize(&body)?;
        let message = head.message.filter(|m| !m.trim().is_empty());

        if !head.success {
            return Err(ClientError::Rejected {
                message: message.unwrap_or_else(|| fallback.to_string()),
            });
        }

        let payload = P::deserialize(body)?;
        Ok(Envelope { message, payload })
    }
}

impl<P> Envelope<P> {
    /// The server message, or `fallback`.
    pub fn message_or(&self, fallback: &str) -> String {
        self.message.clone().unwrap_or_else(|| fallback.to_string())
    }
}

// =============================================================================
// Payloads
// =============================================================================

/// Responses carrying the current user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPayload {
    #[serde(default)]
    pub user: Option<User>,
}

/// `GET order`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrdersPayload {
    #[serde(default)]
    pub orders: Vec<Order>,
}

/// Payment session returned by checkout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutSession {
    pub url: String,
}

/// `POST order/checkout/create-checkout-session`.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionPayload {
    pub session: CheckoutSession,
}

/// Responses with nothing beyond `success` and `message`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Empty {}
