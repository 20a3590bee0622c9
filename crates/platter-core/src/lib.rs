//! # platter-core: Pure Domain Logic for Platter
//!
//! This crate holds the domain model of the Platter food-ordering client
//! as plain data and pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Platter Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Front-end (CLI / UI)                         │   │
//! │  │    Login ──► Menu ──► Cart ──► Checkout ──► Order status        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    platter-client (stores)                      │   │
//! │  │    AuthStore, CartStore, OrderStore, HTTP transport             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ platter-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │   User    │  │   Money   │  │   Cart    │  │   rules   │  │   │
//! │  │   │   Order   │  │           │  │ CartItem  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, MenuItem, Order, inputs)
//! - [`money`] - Integer money type
//! - [`cart`] - Cart line items and cart math
//! - [`error`] - Domain error types
//! - [`validation`] - Client-side input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use platter_core::{Cart, MenuItem, Money};
//!
//! let mut cart = Cart::new();
//! let pizza = MenuItem::new("a", "Margherita", Money::from_units(10));
//!
//! cart.add_item(&pizza);
//! cart.add_item(&pizza);
//!
//! assert_eq!(cart.quantity_of("a"), Some(2));
//! assert_eq!(cart.total(), Money::from_units(20));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

mod lenient;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartItem};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum password length accepted on signup, login and reset.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Number of digits in a contact phone number.
pub const CONTACT_DIGITS: usize = 10;
