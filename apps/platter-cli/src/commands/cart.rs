//! # Cart Commands
//!
//! The cart lives on this machine only; none of these commands touch the
//! network.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌──────────┐  cart add   ┌──────────┐  checkout   ┌──────────────┐
//! │  Empty   │───────────► │ In Cart  │───────────► │ Payment page │
//! │  Cart    │             │          │  (order.rs) │              │
//! └──────────┘             └──────────┘             └──────────────┘
//!      ▲                     │  cart inc / dec / remove
//!      │     cart clear      │
//!      └─────────────────────┘
//! ```

use clap::Subcommand;
use platter_client::{AppContext, ClientConfig, ClientError};
use platter_core::{Cart, CartItem, CoreError, MenuItem, Money};
use serde::Serialize;

use super::Report;
use crate::error::{CliError, CliResult};

#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// List cart lines and the total
    Show,

    /// Add one of a menu item
    Add {
        /// Menu item id
        #[arg(long)]
        id: String,

        #[arg(long)]
        name: String,

        /// Price in whole units
        #[arg(long, allow_negative_numbers = true)]
        price: i64,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long, default_value = "")]
        image: String,
    },

    /// Add one to a line
    Inc { id: String },

    /// Take one from a line (stops at 1)
    Dec { id: String },

    /// Drop a line
    Remove { id: String },

    /// Empty the cart
    Clear,
}

/// Cart as printed with `--json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub total: Money,
    pub total_quantity: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        CartView {
            items: cart.items().to_vec(),
            total: cart.total(),
            total_quantity: cart.total_quantity(),
        }
    }
}

pub async fn execute(ctx: &AppContext, command: CartCommand) -> CliResult<Report> {
    let cart = ctx.cart();

    match command {
        CartCommand::Show => show(ctx),
        CartCommand::Add {
            id,
            name,
            price,
            description,
            image,
        } => {
            let item = MenuItem::new(id, name, Money::from_units(price))
                .with_description(description)
                .with_image(image);
            let quantity = cart.add_to_cart(&item).await?;
            line_report(ctx, &item.name, quantity)
        }
        CartCommand::Inc { id } => {
            let quantity = cart.increment_quantity(&id).await.ok_or_else(|| not_in_cart(&id))?;
            line_report(ctx, &id, quantity)
        }
        CartCommand::Dec { id } => {
            let quantity = cart.decrement_quantity(&id).await.ok_or_else(|| not_in_cart(&id))?;
            line_report(ctx, &id, quantity)
        }
        CartCommand::Remove { id } => {
            let removed = cart.remove_from_cart(&id).await.ok_or_else(|| not_in_cart(&id))?;
            Report::new(format!("Removed {}", removed.name), &removed)
        }
        CartCommand::Clear => {
            cart.clear_cart().await;
            Ok(Report::message("Cart cleared"))
        }
    }
}

fn show(ctx: &AppContext) -> CliResult<Report> {
    let cart = ctx.cart().snapshot();
    Report::new(render_cart(&cart, ctx.config()), &CartView::from(&cart))
}

fn line_report(ctx: &AppContext, label: &str, quantity: u32) -> CliResult<Report> {
    let cart = ctx.cart().snapshot();
    Report::new(
        format!(
            "{label} × {quantity} (cart total {})",
            ctx.config().format_money(cart.total())
        ),
        &CartView::from(&cart),
    )
}

fn not_in_cart(id: &str) -> CliError {
    ClientError::from(CoreError::ItemNotInCart(id.to_string())).into()
}

/// Renders the cart as an aligned table.
pub fn render_cart(cart: &Cart, config: &ClientConfig) -> String {
    if cart.is_empty() {
        return "Cart is empty".to_string();
    }

    let width = cart
        .items()
        .iter()
        .map(|item| item.name.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines: Vec<String> = cart
        .items()
        .iter()
        .map(|item| {
            format!(
                "{:>3} × {:<width$}  {:>10}   [{}]",
                item.quantity,
                item.name,
                config.format_money(item.line_total()),
                item.id,
            )
        })
        .collect();

    lines.push(format!(
        "{:>3}   {:<width$}  {:>10}",
        cart.total_quantity(),
        "Total",
        config.format_money(cart.total()),
    ));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::commands::testing::{context, ScriptedTransport};
    use crate::error::ErrorCode;

    fn add(id: &str, name: &str, price: i64) -> CartCommand {
        CartCommand::Add {
            id: id.into(),
            name: name.into(),
            price,
            description: String::new(),
            image: String::new(),
        }
    }

    #[tokio::test]
    async fn test_add_and_show() {
        let transport = Arc::new(ScriptedTransport::new());
        let (ctx, _) = context(transport.clone());

        execute(&ctx, add("m1", "Dosa", 80)).await.unwrap();
        let report = execute(&ctx, add("m1", "Dosa", 80)).await.unwrap();
        assert_eq!(report.text, "Dosa × 2 (cart total ₹160)");

        execute(&ctx, add("m2", "Filter coffee", 30)).await.unwrap();
        let report = execute(&ctx, CartCommand::Show).await.unwrap();

        assert!(report.text.contains("Filter coffee"));
        assert!(report.text.lines().last().unwrap().contains("₹190"));
        assert_eq!(report.data["total"], 190);
        assert_eq!(report.data["totalQuantity"], 3);
        assert!(transport.sent_paths().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_line_is_an_error() {
        let (ctx, _) = context(Arc::new(ScriptedTransport::new()));

        for command in [
            CartCommand::Inc { id: "x".into() },
            CartCommand::Dec { id: "x".into() },
            CartCommand::Remove { id: "x".into() },
        ] {
            let err = execute(&ctx, command).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidInput);
            assert_eq!(err.message, "Item not in cart: x");
        }
    }

    #[tokio::test]
    async fn test_negative_price_rejected() {
        let (ctx, _) = context(Arc::new(ScriptedTransport::new()));
        let err = execute(&ctx, add("m1", "Dosa", -1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert!(ctx.cart().is_empty());
    }

    #[tokio::test]
    async fn test_dec_stops_at_one_and_clear() {
        let (ctx, _) = context(Arc::new(ScriptedTransport::new()));
        execute(&ctx, add("m1", "Dosa", 80)).await.unwrap();

        let report = execute(&ctx, CartCommand::Dec { id: "m1".into() }).await.unwrap();
        assert_eq!(report.text, "m1 × 1 (cart total ₹80)");

        execute(&ctx, CartCommand::Clear).await.unwrap();
        let report = execute(&ctx, CartCommand::Show).await.unwrap();
        assert_eq!(report.text, "Cart is empty");
    }
}
