//! # Account Commands
//!
//! Sign-up, sign-in and profile management on top of [`AuthStore`].
//!
//! ```text
//! ┌──────────┐  signup   ┌──────────────┐  verify   ┌──────────┐
//! │ No       │─────────► │ Signed in,   │─────────► │ Verified │
//! │ account  │           │ unverified   │           │          │
//! └──────────┘           └──────────────┘           └────┬─────┘
//!                                ▲                       │
//!                          login │                logout │
//!                                │                       ▼
//!                         ┌──────┴──────────────────────────┐
//!                         │ Signed out (cookie dropped)     │
//!                         └─────────────────────────────────┘
//! ```
//!
//! Passwords come from `PLATTER_PASSWORD` / `PLATTER_NEW_PASSWORD` when not
//! given as flags, so they need not appear in shell history.
//!
//! [`AuthStore`]: platter_client::AuthStore

use clap::Args;
use platter_client::AppContext;
use platter_core::{LoginInput, ProfileUpdate, SignupInput, User};
use serde_json::json;
use tracing::debug;

use super::Report;
use crate::error::{CliError, CliResult};

#[derive(Debug, Args)]
pub struct SignupArgs {
    #[arg(long)]
    pub fullname: String,

    #[arg(long)]
    pub email: String,

    /// Phone number, 10 digits
    #[arg(long)]
    pub contact: String,

    #[arg(long, env = "PLATTER_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long, env = "PLATTER_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Debug, Args)]
pub struct ResetPasswordArgs {
    /// Token from the reset link
    pub token: String,

    #[arg(long, env = "PLATTER_NEW_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Profile fields to change. Anything left out keeps its current value.
#[derive(Debug, Default, Args)]
pub struct ProfileArgs {
    #[arg(long)]
    pub fullname: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub country: Option<String>,

    /// Image URL or data URI
    #[arg(long)]
    pub picture: Option<String>,
}

impl ProfileArgs {
    fn is_empty(&self) -> bool {
        self.fullname.is_none()
            && self.email.is_none()
            && self.address.is_none()
            && self.city.is_none()
            && self.country.is_none()
            && self.picture.is_none()
    }

    fn apply_to(self, mut update: ProfileUpdate) -> ProfileUpdate {
        if let Some(fullname) = self.fullname {
            update.fullname = fullname;
        }
        if let Some(email) = self.email {
            update.email = email;
        }
        if let Some(address) = self.address {
            update.address = address;
        }
        if let Some(city) = self.city {
            update.city = city;
        }
        if let Some(country) = self.country {
            update.country = country;
        }
        update.profile_picture = self.picture;
        update
    }
}

pub async fn signup(ctx: &AppContext, args: SignupArgs) -> CliResult<Report> {
    let input = SignupInput {
        fullname: args.fullname,
        email: args.email,
        password: args.password,
        contact: args.contact,
    };

    let user = ctx.auth().sign_up(&input).await?;
    Report::new(
        format!(
            "Signed up as {}. Check {} for a verification code.",
            user.fullname, user.email
        ),
        &user,
    )
}

pub async fn login(ctx: &AppContext, args: LoginArgs) -> CliResult<Report> {
    let input = LoginInput {
        email: args.email,
        password: args.password,
    };

    let user = ctx.auth().login(&input).await?;
    Report::new(format!("Signed in as {}", user_line(&user)), &user)
}

pub async fn verify(ctx: &AppContext, code: &str) -> CliResult<Report> {
    let user = ctx.auth().verify_email(code).await?;
    Report::new(format!("{} is verified", user.email), &user)
}

pub async fn status(ctx: &AppContext) -> CliResult<Report> {
    let authenticated = ctx.start().await;
    let user = ctx.auth().user().filter(|_| authenticated);

    let text = match &user {
        Some(user) => describe_user(user),
        None => "Not signed in".to_string(),
    };

    Report::new(text, &json!({ "authenticated": authenticated, "user": user }))
}

pub async fn logout(ctx: &AppContext) -> CliResult<Report> {
    ctx.auth().logout().await?;
    Ok(Report::message("Signed out"))
}

pub async fn forgot_password(ctx: &AppContext, email: &str) -> CliResult<Report> {
    ctx.auth().forgot_password(email).await?;
    Ok(Report::message(format!("If {email} has an account, a reset link is on its way")))
}

pub async fn reset_password(ctx: &AppContext, args: ResetPasswordArgs) -> CliResult<Report> {
    ctx.auth().reset_password(&args.token, &args.password).await?;
    Ok(Report::message("Password changed. Sign in with the new password."))
}

pub async fn update_profile(ctx: &AppContext, args: ProfileArgs) -> CliResult<Report> {
    if args.is_empty() {
        return Err(CliError::invalid_input("Nothing to update"));
    }

    let current = require_session(ctx).await?;
    let update = args.apply_to(ProfileUpdate::from_user(&current));
    debug!(email = %update.email, "Updating profile");

    let user = ctx.auth().update_profile(&update).await?;
    Report::new(describe_user(&user), &user)
}

/// Confirms the saved session with the server and returns its user.
pub async fn require_session(ctx: &AppContext) -> CliResult<User> {
    if !ctx.start().await {
        return Err(CliError::not_authenticated());
    }
    ctx.auth().user().ok_or_else(CliError::not_authenticated)
}

fn user_line(user: &User) -> String {
    format!("{} <{}>", user.fullname, user.email)
}

fn describe_user(user: &User) -> String {
    let mut lines = vec![format!("Signed in as {}", user_line(user))];
    if !user.is_verified {
        lines.push("  email not verified".to_string());
    }
    if let Some(contact) = user.contact {
        lines.push(format!("  contact: {contact}"));
    }
    let place: Vec<&str> = [&user.address, &user.city, &user.country]
        .into_iter()
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .collect();
    if !place.is_empty() {
        lines.push(format!("  address: {}", place.join(", ")));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::commands::testing::{context, signed_in, user_json, ScriptedTransport};
    use crate::error::ErrorCode;
    use platter_client::Notice;

    #[tokio::test]
    async fn test_login_reports_user() {
        let transport = Arc::new(
            ScriptedTransport::new().reply(
                "user/login",
                json!({ "success": true, "message": "Welcome back Asha Rao", "user": user_json() }),
            ),
        );
        let (ctx, notices) = context(transport.clone());

        let report = login(
            &ctx,
            LoginArgs {
                email: "asha@example.com".into(),
                password: "secret1".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(report.text, "Signed in as Asha Rao <asha@example.com>");
        assert_eq!(report.data["email"], "asha@example.com");
        assert_eq!(notices.take(), vec![Notice::success("Welcome back Asha Rao")]);
        assert_eq!(transport.last_body().unwrap()["password"], "secret1");
    }

    #[tokio::test]
    async fn test_login_validation_sends_nothing() {
        let transport = Arc::new(ScriptedTransport::new());
        let (ctx, _) = context(transport.clone());

        let err = login(
            &ctx,
            LoginArgs {
                email: "not-an-email".into(),
                password: "secret1".into(),
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert!(transport.sent_paths().is_empty());
    }

    #[tokio::test]
    async fn test_status_signed_out() {
        let transport = Arc::new(ScriptedTransport::new().reply(
            "user/check-auth",
            json!({ "success": false, "message": "User not authenticated" }),
        ));
        let (ctx, notices) = context(transport);

        let report = status(&ctx).await.unwrap();
        assert_eq!(report.text, "Not signed in");
        assert_eq!(report.data["authenticated"], false);
        assert!(notices.take().is_empty());
    }

    #[tokio::test]
    async fn test_status_signed_in() {
        let (ctx, _) = context(Arc::new(signed_in()));

        let report = status(&ctx).await.unwrap();
        assert!(report.text.starts_with("Signed in as Asha Rao"));
        assert!(report.text.contains("Pune"));
        assert_eq!(report.data["authenticated"], true);
    }

    #[tokio::test]
    async fn test_profile_keeps_unchanged_fields() {
        let mut updated = user_json();
        updated["city"] = json!("Mumbai");
        let transport = Arc::new(
            signed_in().reply("user/profile/update", json!({ "success": true, "user": updated })),
        );
        let (ctx, _) = context(transport.clone());

        let args = ProfileArgs {
            city: Some("Mumbai".into()),
            ..Default::default()
        };
        let report = update_profile(&ctx, args).await.unwrap();

        let sent = transport.last_body().unwrap();
        assert_eq!(sent["city"], "Mumbai");
        assert_eq!(sent["fullname"], "Asha Rao");
        assert!(sent.get("profilePicture").is_none());
        assert_eq!(report.data["city"], "Mumbai");
    }

    #[tokio::test]
    async fn test_profile_requires_session() {
        let transport = Arc::new(ScriptedTransport::new());
        let (ctx, _) = context(transport.clone());

        let args = ProfileArgs {
            city: Some("Mumbai".into()),
            ..Default::default()
        };
        let err = update_profile(&ctx, args).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);
        assert_eq!(transport.sent_paths(), vec!["user/check-auth"]);
    }

    #[tokio::test]
    async fn test_empty_profile_update_rejected() {
        let (ctx, _) = context(Arc::new(ScriptedTransport::new()));
        let err = update_profile(&ctx, ProfileArgs::default()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }

    #[tokio::test]
    async fn test_reset_password_puts_token_in_path() {
        let transport = Arc::new(ScriptedTransport::new().reply(
            "user/reset-password/abc123",
            json!({ "success": true, "message": "Password reset successfully." }),
        ));
        let (ctx, notices) = context(transport.clone());

        reset_password(
            &ctx,
            ResetPasswordArgs {
                token: "abc123".into(),
                password: "newsecret".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(transport.last_body().unwrap()["newPassword"], "newsecret");
        assert_eq!(notices.take(), vec![Notice::success("Password reset successfully.")]);
    }
}
