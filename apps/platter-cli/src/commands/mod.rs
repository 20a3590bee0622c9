//! # CLI Commands
//!
//! One handler per subcommand. Handlers take the [`AppContext`], run a
//! store action and return a [`Report`]; they never print.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (Report, dispatch)
//! ├── auth.rs     ◄─── signup, login, verify, status, logout, passwords, profile
//! ├── cart.rs     ◄─── cart show/add/inc/dec/remove/clear
//! ├── order.rs    ◄─── orders, checkout
//! └── config.rs   ◄─── config show/path/init
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  platter cart add --id m1 --name Dosa --price 80                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  clap ──► Command::Cart(CartCommand::Add { .. })                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  execute(&ctx, command) ──► cart::execute ──► ctx.cart().add_to_cart    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Report { text, data } ──► stdout (text, or data with --json)           │
//! │                                                                         │
//! │  Notices from the stores go to stderr as they happen.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod cart;
pub mod config;
pub mod order;

use clap::Subcommand;
use platter_client::AppContext;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::CliResult;

/// What a command produced: a line or two for people and a JSON value for
/// scripts.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub text: String,
    pub data: Value,
}

impl Report {
    pub fn new<T: Serialize + ?Sized>(text: impl Into<String>, data: &T) -> CliResult<Self> {
        Ok(Report {
            text: text.into(),
            data: serde_json::to_value(data)?,
        })
    }

    /// A report that is only a message.
    pub fn message(text: impl Into<String>) -> Self {
        let text = text.into();
        Report {
            data: json!({ "message": text }),
            text,
        }
    }

    pub fn render(&self, as_json: bool) -> CliResult<String> {
        if as_json {
            Ok(serde_json::to_string_pretty(&self.data)?)
        } else {
            Ok(self.text.clone())
        }
    }
}

/// Subcommands that need an [`AppContext`].
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an account
    Signup(auth::SignupArgs),

    /// Sign in with email and password
    Login(auth::LoginArgs),

    /// Confirm the email address with the emailed code
    Verify {
        /// Verification code from the email
        code: String,
    },

    /// Show whether the saved session is still signed in
    Status,

    /// End the session
    Logout,

    /// Email a password reset link
    ForgotPassword {
        email: String,
    },

    /// Set a new password with the token from the reset link
    ResetPassword(auth::ResetPasswordArgs),

    /// Update profile details
    Profile(auth::ProfileArgs),

    /// Inspect or change the cart
    #[command(subcommand)]
    Cart(cart::CartCommand),

    /// List placed orders
    Orders,

    /// Start payment for the current cart
    Checkout(order::CheckoutArgs),
}

/// Runs one command against the context.
pub async fn execute(ctx: &AppContext, command: Command) -> CliResult<Report> {
    match command {
        Command::Signup(args) => auth::signup(ctx, args).await,
        Command::Login(args) => auth::login(ctx, args).await,
        Command::Verify { code } => auth::verify(ctx, &code).await,
        Command::Status => auth::status(ctx).await,
        Command::Logout => auth::logout(ctx).await,
        Command::ForgotPassword { email } => auth::forgot_password(ctx, &email).await,
        Command::ResetPassword(args) => auth::reset_password(ctx, args).await,
        Command::Profile(args) => auth::update_profile(ctx, args).await,
        Command::Cart(command) => cart::execute(ctx, command).await,
        Command::Orders => order::list(ctx).await,
        Command::Checkout(args) => order::checkout(ctx, args).await,
    }
}
