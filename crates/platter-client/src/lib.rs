//! # platter-client: REST Client and State Stores for Platter
//!
//! Client-side state for the Platter food-ordering service: who is signed
//! in, what is in the cart, which orders were placed.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Platter Client Layer                               │
//! │                                                                         │
//! │  ┌───────────────────────────────────────────────────────────────────┐  │
//! │  │                 platter-client (THIS CRATE)                       │  │
//! │  │                                                                   │  │
//! │  │  ┌─────────────┐  ┌─────────────┐  ┌─────────────┐                │  │
//! │  │  │ AuthStore   │  │ CartStore   │  │ OrderStore  │                │  │
//! │  │  │ signup,     │  │ add, inc,   │  │ fetch list, │                │  │
//! │  │  │ login, ...  │  │ dec, remove │  │ checkout    │                │  │
//! │  │  └──────┬──────┘  └──────┬──────┘  └──────┬──────┘                │  │
//! │  │         │                │                │                       │  │
//! │  │  ┌──────▼──────┐  ┌──────▼──────┐  ┌──────▼──────┐                │  │
//! │  │  │ Transport   │  │ PersistSlot │  │ Notifier    │                │  │
//! │  │  │ (reqwest +  │  │ (save after │  │ (one notice │                │  │
//! │  │  │  cookies)   │  │  mutate)    │  │  per action)│                │  │
//! │  │  └─────────────┘  └─────────────┘  └─────────────┘                │  │
//! │  │                                                                   │  │
//! │  │  AppContext: owns all of the above, built from ClientConfig       │  │
//! │  └───────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  DEPENDENCIES:                                                          │
//! │  • platter-core: Money, Cart, User, Order, validation                   │
//! │  • platter-storage: StateStorage backends                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - TOML + environment configuration
//! - [`error`] - Client error types
//! - [`transport`] - HTTP request sender
//! - [`api`] - Response envelope and payloads
//! - [`notify`] - User-facing notices
//! - [`state`] - Observable state cells, flag guards, request tickets
//! - [`persist`] - Save-after-mutate snapshots
//! - [`stores`] - Auth, cart and order stores
//! - [`context`] - The application container
//!
//! ## Usage
//!
//! ```rust,ignore
//! use platter_client::{AppContext, ClientConfig, TracingNotifier};
//!
//! let config = ClientConfig::load(None)?;
//! let ctx = AppContext::from_config(config, Arc::new(TracingNotifier)).await?;
//! ctx.start().await;
//!
//! ctx.cart().add_to_cart(&item).await?;
//! println!("{}", ctx.config().format_money(ctx.cart().total()));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod notify;
pub mod persist;
pub mod state;
pub mod stores;
pub mod transport;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ClientConfig, StorageBackend};
pub use context::{open_storage, AppContext};
pub use error::{ClientError, ClientResult};
pub use notify::{BroadcastNotifier, MemoryNotifier, Notice, NoticeLevel, Notifier, TracingNotifier};
pub use stores::{AuthState, AuthStore, CartStore, OrderState, OrderStore};
pub use transport::{ApiRequest, HttpTransport, SessionJar, Transport};
