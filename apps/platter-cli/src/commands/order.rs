//! # Order Commands
//!
//! Listing placed orders and starting checkout for the current cart.

use clap::Args;
use platter_client::{AppContext, ClientConfig};
use platter_core::{DeliveryDetails, Order};
use serde_json::json;
use tracing::info;

use super::auth::require_session;
use super::Report;
use crate::error::{CliError, CliResult};

/// Delivery fields default to the signed-in user's profile.
#[derive(Debug, Default, Args)]
pub struct CheckoutArgs {
    /// Restaurant the cart is ordered from
    #[arg(long)]
    pub restaurant: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub contact: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub country: Option<String>,
}

impl CheckoutArgs {
    fn apply_to(&self, mut details: DeliveryDetails) -> DeliveryDetails {
        let overrides = [
            (&mut details.name, &self.name),
            (&mut details.email, &self.email),
            (&mut details.contact, &self.contact),
            (&mut details.address, &self.address),
            (&mut details.city, &self.city),
            (&mut details.country, &self.country),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                *field = value.clone();
            }
        }
        details
    }
}

pub async fn list(ctx: &AppContext) -> CliResult<Report> {
    require_session(ctx).await?;
    let orders = ctx.orders().get_order_details().await?;
    Report::new(render_orders(&orders, ctx.config()), &orders)
}

pub async fn checkout(ctx: &AppContext, args: CheckoutArgs) -> CliResult<Report> {
    if ctx.cart().is_empty() {
        return Err(CliError::invalid_input("Cart is empty"));
    }

    let user = require_session(ctx).await?;
    let delivery = args.apply_to(DeliveryDetails::from_user(&user));
    let request = ctx.checkout_request(&args.restaurant, Some(delivery))?;

    let url = ctx.orders().create_checkout_session(&request).await?;
    info!(restaurant = %args.restaurant, "Checkout started");

    Report::new(
        format!(
            "Pay {} at:\n{url}",
            ctx.config().format_money(ctx.cart().total())
        ),
        &json!({ "url": url, "total": ctx.cart().total() }),
    )
}

fn render_orders(orders: &[Order], config: &ClientConfig) -> String {
    if orders.is_empty() {
        return "No orders yet".to_string();
    }

    orders
        .iter()
        .map(|order| {
            let placed = order
                .created_at
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string());
            let total = order.total_amount.unwrap_or_else(|| order.items_total());
            let dishes: Vec<String> = order
                .cart_items
                .iter()
                .map(|line| format!("{} × {}", line.quantity, line.name))
                .collect();

            format!(
                "{}  {:<16}  {}  {:>10}\n    {}",
                order.id,
                order.status.as_str(),
                placed,
                config.format_money(total),
                dishes.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
