//! # Stores
//!
//! Independent state containers, one per concern.
//!
//! - [`auth`] - Signed-in user and the requests that change it
//! - [`cart`] - Cart lines and totals (local only)
//! - [`order`] - Placed orders and checkout

pub mod auth;
pub mod cart;
pub mod order;

pub use auth::{AuthState, AuthStore, USER_STORE_KEY};
pub use cart::{CartStore, CART_STORE_KEY};
pub use order::{OrderState, OrderStore};
