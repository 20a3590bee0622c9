//! # Application Context
//!
//! The one container an application holds: the three stores and the
//! dependencies they share. Built explicitly and passed around; there are no
//! global stores.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ClientConfig::load(..)                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AppContext::from_config(config, notifier).await                        │
//! │       ├── HttpTransport (base URL, cookie jar)                          │
//! │       ├── open_storage (memory | file | sqlite)                         │
//! │       ├── AuthStore / CartStore / OrderStore                            │
//! │       └── restore persisted user + cart                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ctx.start().await  ← one session check                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use platter_core::{CheckoutSessionRequest, DeliveryDetails, ValidationError};
use platter_storage::{FileStorage, MemoryStorage, SqliteConfig, SqliteStorage, StateStorage};
use tracing::{info, warn};

use crate::config::{ClientConfig, StorageBackend};
use crate::error::{ClientError, ClientResult};
use crate::notify::Notifier;
use crate::stores::{AuthStore, CartStore, OrderStore};
use crate::transport::{HttpTransport, SessionJar, Transport};

/// File name of the SQLite state database inside the data directory.
pub const STATE_DB_FILE: &str = "platter.db";

/// Stores plus their shared dependencies.
pub struct AppContext {
    config: ClientConfig,
    notifier: Arc<dyn Notifier>,
    auth: AuthStore,
    cart: CartStore,
    orders: OrderStore,
}

impl AppContext {
    /// Builds a context talking to the configured API and restores
    /// persisted state.
    pub async fn from_config(
        config: ClientConfig,
        notifier: Arc<dyn Notifier>,
    ) -> ClientResult<Self> {
        config.validate()?;

        let transport = Arc::new(HttpTransport::new(config.api_url()?)?);
        let storage = open_storage(&config).await?;

        info!(
            api = %config.api.base_url,
            storage = %config.storage.backend,
            "Building app context"
        );

        let session: Arc<dyn SessionJar> = transport.clone();
        let ctx = Self::with_parts(config, transport, Some(session), notifier, storage);
        ctx.restore().await;
        Ok(ctx)
    }

    /// Builds a context from ready-made parts. Nothing is restored.
    pub fn with_parts(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        session: Option<Arc<dyn SessionJar>>,
        notifier: Arc<dyn Notifier>,
        storage: Arc<dyn StateStorage>,
    ) -> Self {
        let mut auth = AuthStore::new(transport.clone(), notifier.clone(), storage.clone());
        if let Some(jar) = session {
            auth = auth.with_session_jar(jar);
        }

        AppContext {
            cart: CartStore::new(storage),
            orders: OrderStore::new(transport, notifier.clone()),
            auth,
            notifier,
            config,
        }
    }

    /// Rehydrates persisted stores. Unreadable state is logged and skipped.
    pub async fn restore(&self) {
        if let Err(e) = self.auth.restore().await {
            warn!(error = %e, "Could not restore auth state");
        }
        if let Err(e) = self.cart.restore().await {
            warn!(error = %e, "Could not restore cart");
        }
    }

    /// Runs the start-up session check. Returns whether the session is live.
    pub async fn start(&self) -> bool {
        let authenticated = self.auth.check_authentication().await;
        info!(authenticated, "Session checked");
        authenticated
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn orders(&self) -> &OrderStore {
        &self.orders
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Snapshots the cart into a checkout request. Delivery details default
    /// to the signed-in user's.
    pub fn checkout_request(
        &self,
        restaurant_id: &str,
        delivery: Option<DeliveryDetails>,
    ) -> ClientResult<CheckoutSessionRequest> {
        let delivery = match delivery {
            Some(details) => details,
            None => self
                .auth
                .user()
                .map(|user| DeliveryDetails::from_user(&user))
                .ok_or_else(|| ValidationError::required("deliveryDetails"))?,
        };

        Ok(CheckoutSessionRequest::from_cart(
            &self.cart.snapshot(),
            delivery,
            restaurant_id,
        )?)
    }
}

/// Opens the configured storage backend.
pub async fn open_storage(config: &ClientConfig) -> ClientResult<Arc<dyn StateStorage>> {
    let backend = config.storage.backend;
    if backend == StorageBackend::Memory {
        return Ok(Arc::new(MemoryStorage::new()));
    }

    let dir = config
        .data_dir()
        .ok_or_else(|| ClientError::InvalidConfig("no data directory available".into()))?;

    let storage: Arc<dyn StateStorage> = match backend {
        StorageBackend::Sqlite => {
            tokio::fs::create_dir_all(&dir)
                .await
                .map_err(platter_storage::StorageError::from)?;
            Arc::new(SqliteStorage::open(SqliteConfig::new(dir.join(STATE_DB_FILE))).await?)
        }
        _ => Arc::new(FileStorage::new(dir)),
    };

    Ok(storage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::MemoryNotifier;
    use crate::transport::MockTransport;
    use platter_core::{MenuItem, Money};
    use serde_json::json;

    fn user_json() -> serde_json::Value {
        json!({
            "fullname": "Asha",
            "email": "asha@example.com",
            "contact": 9876543210u64,
            "address": "12 MG Road",
            "city": "Pune",
            "country": "India"
        })
    }

    fn context(transport: MockTransport, storage: Arc<dyn StateStorage>) -> AppContext {
        AppContext::with_parts(
            ClientConfig::default(),
            Arc::new(transport),
            None,
            Arc::new(MemoryNotifier::new()),
            storage,
        )
    }

    #[tokio::test]
    async fn test_start_checks_session_once() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| req.path() == "user/check-auth")
            .times(1)
            .returning(|_| Ok(json!({ "success": true, "user": user_json() })));

        let ctx = context(transport, Arc::new(MemoryStorage::new()));
        assert!(ctx.auth().is_checking_auth());
        assert!(ctx.start().await);
        assert!(ctx.auth().is_authenticated());
        assert!(!ctx.auth().is_checking_auth());
    }

    #[tokio::test]
    async fn test_restore_rehydrates_cart() {
        let storage: Arc<dyn StateStorage> = Arc::new(MemoryStorage::new());

        let first = context(MockTransport::new(), storage.clone());
        first
            .cart()
            .add_to_cart(&MenuItem::new("a", "Idli", Money::from_units(40)))
            .await
            .unwrap();

        let second = context(MockTransport::new(), storage);
        second.restore().await;
        assert_eq!(second.cart().total(), Money::from_units(40));
    }

    #[tokio::test]
    async fn test_checkout_request_uses_user_details() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Ok(json!({ "success": true, "user": user_json() })));

        let ctx = context(transport, Arc::new(MemoryStorage::new()));

        // Nothing to deliver to yet.
        assert!(ctx.checkout_request("r1", None).is_err());

        ctx.start().await;
        ctx.cart()
            .add_to_cart(&MenuItem::new("a", "Idli", Money::from_units(40)))
            .await
            .unwrap();

        let request = ctx.checkout_request("r1", None).unwrap();
        assert_eq!(request.delivery_details.city, "Pune");
        assert_eq!(request.cart_items.len(), 1);
        assert_eq!(request.restaurant_id, "r1");
    }

    #[tokio::test]
    async fn test_open_storage_backends() {
        let dir = std::env::temp_dir().join(format!("platter-test-{}", uuid::Uuid::new_v4()));

        let mut config = ClientConfig::default();
        config.storage.data_dir = Some(dir.clone());

        config.storage.backend = StorageBackend::Memory;
        open_storage(&config).await.unwrap();

        config.storage.backend = StorageBackend::File;
        let file = open_storage(&config).await.unwrap();
        file.set_item("cart-store", "{}").await.unwrap();
        assert!(dir.join("cart-store.json").exists());

        config.storage.backend = StorageBackend::Sqlite;
        let sqlite = open_storage(&config).await.unwrap();
        sqlite.set_item("cart-store", "{}").await.unwrap();
        assert!(dir.join(STATE_DB_FILE).exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
