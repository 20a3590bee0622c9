//! # Domain Types
//!
//! Core domain types shared by the stores and the wire protocol.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │    MenuItem     │   │      Order      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  fullname       │   │  _id            │   │  _id            │       │
//! │  │  email          │   │  name           │   │  status         │       │
//! │  │  contact        │   │  price          │   │  createdAt      │       │
//! │  │  isVerified     │   │  image          │   │  cartItems[]    │       │
//! │  └─────────────────┘   └────────┬────────┘   └─────────────────┘       │
//! │                                 │ add to cart                           │
//! │                                 ▼                                       │
//! │                        CartItem (cart.rs) ──► CheckoutLine ──► Order    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names follow the backend's JSON (`camelCase`, Mongo-style `_id`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::lenient;
use crate::money::Money;

// =============================================================================
// User
// =============================================================================

/// The signed-in account as returned by the user endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Server-side identifier, when the backend includes it.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub fullname: String,

    #[serde(default)]
    pub email: String,

    /// Phone number. The backend stores it as a number.
    #[serde(default, deserialize_with = "lenient::opt_contact")]
    pub contact: Option<u64>,

    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub city: String,

    #[serde(default)]
    pub country: String,

    /// URL of the uploaded avatar (empty when none).
    #[serde(default)]
    pub profile_picture: String,

    #[serde(default)]
    pub admin: bool,

    #[serde(default)]
    pub is_verified: bool,
}

// =============================================================================
// Menu Item
// =============================================================================

/// A dish offered by a restaurant; the unit that gets added to a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    #[serde(rename = "_id")]
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(deserialize_with = "lenient::money")]
    pub price: Money,

    #[serde(default)]
    pub image: String,
}

impl MenuItem {
    /// Creates a menu item with an empty description and image.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Money) -> Self {
        MenuItem {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            image: String::new(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the image URL.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Order lifecycle status as reported by the backend.
///
/// Statuses this client does not know are kept verbatim in `Other` so that
/// they still display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    OutForDelivery,
    Delivered,
    Other(String),
}

impl OrderStatus {
    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::OutForDelivery => "outfordelivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Other(s) => s,
        }
    }
}

impl From<String> for OrderStatus {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "pending" => OrderStatus::Pending,
            "confirmed" => OrderStatus::Confirmed,
            "preparing" => OrderStatus::Preparing,
            "outfordelivery" => OrderStatus::OutForDelivery,
            "delivered" => OrderStatus::Delivered,
            _ => OrderStatus::Other(s),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cart line frozen into a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub menu_id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub image: String,

    #[serde(deserialize_with = "lenient::money")]
    pub price: Money,

    #[serde(deserialize_with = "lenient::quantity")]
    pub quantity: u32,
}

impl OrderLine {
    /// Price × quantity for this line.
    pub fn line_total(&self) -> Money {
        self.price * self.quantity
    }
}

/// Where an order is delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDetails {
    pub name: String,
    pub email: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub contact: String,
    pub address: String,
    pub city: String,
    #[serde(default)]
    pub country: String,
}

impl DeliveryDetails {
    /// Builds delivery details from the signed-in user's profile.
    pub fn from_user(user: &User) -> Self {
        DeliveryDetails {
            name: user.fullname.clone(),
            email: user.email.clone(),
            contact: user.contact.map(|c| c.to_string()).unwrap_or_default(),
            address: user.address.clone(),
            city: user.city.clone(),
            country: user.country.clone(),
        }
    }
}

/// A placed order. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default)]
    pub status: OrderStatus,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub cart_items: Vec<OrderLine>,

    #[serde(default)]
    pub delivery_details: Option<DeliveryDetails>,

    /// Total as recorded by the server, when present.
    #[serde(default, deserialize_with = "lenient::opt_money")]
    pub total_amount: Option<Money>,
}

impl Order {
    /// Sum of the order's lines.
    pub fn items_total(&self) -> Money {
        self.cart_items.iter().map(OrderLine::line_total).sum()
    }
}

// =============================================================================
// Inputs
// =============================================================================

/// Body of the signup request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupInput {
    pub fullname: String,
    pub email: String,
    pub password: String,
    pub contact: String,
}

/// Body of the login request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Body of the profile update request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub fullname: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub country: String,

    /// Image reference or data URI; omitted to keep the current picture.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

impl ProfileUpdate {
    /// Starts an update pre-filled from the current user.
    pub fn from_user(user: &User) -> Self {
        ProfileUpdate {
            fullname: user.fullname.clone(),
            email: user.email.clone(),
            address: user.address.clone(),
            city: user.city.clone(),
            country: user.country.clone(),
            profile_picture: None,
        }
    }
}

/// One cart line as the checkout endpoint expects it.
///
/// Price and quantity travel as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLine {
    pub menu_id: String,
    pub name: String,
    pub image: String,
    pub price: String,
    pub quantity: String,
}

/// Body of the create-checkout-session request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionRequest {
    pub cart_items: Vec<CheckoutLine>,
    pub delivery_details: DeliveryDetails,
    pub restaurant_id: String,
}

impl CheckoutSessionRequest {
    /// Snapshots a cart into a checkout request.
    ///
    /// ## Errors
    /// - `CoreError::EmptyCart` when the cart has no lines
    pub fn from_cart(
        cart: &Cart,
        delivery_details: DeliveryDetails,
        restaurant_id: impl Into<String>,
    ) -> CoreResult<Self> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let cart_items = cart
            .items()
            .iter()
            .map(|item| CheckoutLine {
                menu_id: item.id.clone(),
                name: item.name.clone(),
                image: item.image.clone(),
                price: item.price.to_string(),
                quantity: item.quantity.to_string(),
            })
            .collect();

        Ok(CheckoutSessionRequest {
            cart_items,
            delivery_details,
            restaurant_id: restaurant_id.into(),
        })
    }
}
