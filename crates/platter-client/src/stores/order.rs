//! # Order Store
//!
//! Placed orders, fetched wholesale, and the checkout hand-off that creates
//! them.
//!
//! ```text
//! CartStore::snapshot ──► CheckoutSessionRequest::from_cart
//!                               │
//!                               ▼
//!            create_checkout_session ──► payment URL (order created server-side)
//!                                                │
//!                                                ▼
//!                              get_order_details ──► orders replaced wholesale
//! ```

use std::sync::Arc;

use platter_core::validation::validate_delivery_details;
use platter_core::{CheckoutSessionRequest, CoreError, Order};
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::api::{Envelope, OrdersPayload, SessionPayload};
use crate::error::ClientResult;
use crate::notify::{Notice, Notifier};
use crate::state::{FlagGuard, RequestTracker, StateCell};
use crate::transport::{ApiRequest, Transport};

const ORDERS_FAILED: &str = "Failed to fetch orders";
const CHECKOUT_FAILED: &str = "Checkout failed";

/// Observable order state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderState {
    pub orders: Vec<Order>,
    pub loading: bool,
    in_flight: u32,
}

impl OrderState {
    fn begin_loading(&mut self) {
        self.in_flight += 1;
        self.loading = true;
    }

    fn end_loading(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.loading = self.in_flight > 0;
    }
}

/// Order store.
pub struct OrderStore {
    state: StateCell<OrderState>,
    transport: Arc<dyn Transport>,
    notifier: Arc<dyn Notifier>,
    requests: RequestTracker,
}

impl OrderStore {
    pub fn new(transport: Arc<dyn Transport>, notifier: Arc<dyn Notifier>) -> Self {
        OrderStore {
            state: StateCell::default(),
            transport,
            notifier,
            requests: RequestTracker::new(),
        }
    }

    pub fn orders(&self) -> Vec<Order> {
        self.state.read(|s| s.orders.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.state.read(|s| s.loading)
    }

    pub fn state(&self) -> OrderState {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<OrderState> {
        self.state.subscribe()
    }

    /// Fetches the signed-in user's orders, replacing the held list.
    ///
    /// On failure the held list is left as it was. Only failures are
    /// announced; a refreshed list speaks for itself.
    pub async fn get_order_details(&self) -> ClientResult<Vec<Order>> {
        let ticket = self.requests.issue();
        let _loading = self.loading();

        let outcome = self
            .call::<OrdersPayload>(ApiRequest::get("order"), ORDERS_FAILED)
            .await;

        match outcome {
            Ok(envelope) => {
                let orders = envelope.payload.orders;
                let applied = self.state.update_if(|s| {
                    if !self.requests.is_latest(ticket) {
                        return false;
                    }
                    s.orders = orders.clone();
                    true
                });
                debug!(count = orders.len(), applied, "Orders fetched");
                Ok(orders)
            }
            Err(e) => {
                debug!(error = %e, "Order fetch failed");
                self.notifier.notify(Notice::error(e.notice_text()));
                Err(e)
            }
        }
    }

    /// Starts a payment session for a cart and returns its URL.
    pub async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> ClientResult<String> {
        let outcome: ClientResult<String> = async {
            if request.cart_items.is_empty() {
                return Err(CoreError::EmptyCart.into());
            }
            validate_delivery_details(&request.delivery_details)?;
            let _loading = self.loading();

            let api_request =
                ApiRequest::post("order/checkout/create-checkout-session").json(request)?;
            let envelope = self.call::<SessionPayload>(api_request, CHECKOUT_FAILED).await?;

            info!(lines = request.cart_items.len(), "Checkout session created");
            Ok(envelope.payload.session.url)
        }
        .await;

        match outcome {
            Ok(url) => {
                self.notifier.notify(Notice::success("Redirecting to payment"));
                Ok(url)
            }
            Err(e) => {
                debug!(error = %e, "Checkout failed");
                self.notifier.notify(Notice::error(e.notice_text()));
                Err(e)
            }
        }
    }

    fn loading(&self) -> FlagGuard<'_, OrderState> {
        FlagGuard::raise(&self.state, OrderState::begin_loading, OrderState::end_loading)
    }

    async fn call<P: DeserializeOwned>(
        &self,
        request: ApiRequest,
        fallback: &str,
    ) -> ClientResult<Envelope<P>> {
        let body = self.transport.send(request).await?;
        Envelope::accept(body, fallback)
    }
}
