//! # Auth Store
//!
//! Who is signed in, and the requests that change it.
//!
//! ## Action Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  action(input)                                                          │
//! │     │                                                                   │
//! │     ├── validate ──── invalid ─────────────────────────┐                │
//! │     │                                                  │                │
//! │     ▼                                                  │                │
//! │  loading += 1   (FlagGuard; lowered on every exit)     │                │
//! │     │                                                  │                │
//! │     ▼                                                  │                │
//! │  Transport::send (exactly one request)                 │                │
//! │     │                                                  │                │
//! │     ├── success: true ──► apply (if still the newest   │                │
//! │     │                     request) ─► persist          │                │
//! │     │                         │                        │                │
//! │     │                         ▼                        ▼                │
//! │     │                  Notice::success           Notice::error          │
//! │     │                         │                        ▲                │
//! │     └── success: false / transport failure ────────────┘                │
//! │                               │                        │                │
//! │                               ▼                        ▼                │
//! │                             Ok(..)                   Err(..)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Machine
//! ```text
//!   unauthenticated ── login / signup / verify / check ok ──► authenticated
//!   authenticated   ── logout ok ─────────────────────────► unauthenticated
//!   any             ── check failed ──────────────────────► unauthenticated
//! ```
//!
//! `check_authentication` is the exception to the protocol: it raises
//! `is_checking_auth` instead of `loading`, never notifies and never errors.

use std::sync::Arc;

use platter_core::validation::{
    validate_email, validate_login, validate_password, validate_profile_update, validate_required,
    validate_signup, validate_verification_code,
};
use platter_core::{LoginInput, ProfileUpdate, SignupInput, User};
use platter_storage::StateStorage;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::api::{Empty, Envelope, UserPayload};
use crate::error::{ClientError, ClientResult};
use crate::notify::{Notice, Notifier};
use crate::persist::PersistSlot;
use crate::state::{FlagGuard, RequestTracker, StateCell, Ticket};
use crate::transport::{ApiRequest, SessionJar, Transport};

/// Storage key of the persisted user.
pub const USER_STORE_KEY: &str = "user-store";

const USER_STORE_VERSION: u32 = 0;

// Failure fallbacks, used when the server sends no message.
const SIGNUP_FAILED: &str = "Sign-up failed";
const LOGIN_FAILED: &str = "Login failed";
const VERIFY_FAILED: &str = "Verification failed";
const CHECK_FAILED: &str = "Not authenticated";
const LOGOUT_FAILED: &str = "Logout failed";
const FORGOT_FAILED: &str = "Password reset request failed";
const RESET_FAILED: &str = "Password reset failed";
const PROFILE_FAILED: &str = "Profile update failed";

// =============================================================================
// State
// =============================================================================

/// Observable auth state.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,

    /// True until the first session check finishes, and during later ones.
    pub is_checking_auth: bool,

    /// True while any loading-flagged action is in flight.
    pub loading: bool,

    in_flight: u32,
    checks_in_flight: u32,
}

impl Default for AuthState {
    fn default() -> Self {
        AuthState {
            user: None,
            is_authenticated: false,
            is_checking_auth: true,
            loading: false,
            in_flight: 0,
            checks_in_flight: 0,
        }
    }
}

impl AuthState {
    fn begin_loading(&mut self) {
        self.in_flight += 1;
        self.loading = true;
    }

    fn end_loading(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.loading = self.in_flight > 0;
    }

    fn begin_check(&mut self) {
        self.checks_in_flight += 1;
        self.is_checking_auth = true;
    }

    fn end_check(&mut self) {
        self.checks_in_flight = self.checks_in_flight.saturating_sub(1);
        self.is_checking_auth = self.checks_in_flight > 0;
    }
}

/// What survives a restart. Flags never do.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedAuth {
    #[serde(default)]
    user: Option<User>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    session: Option<String>,
}

// =============================================================================
// AuthStore
// =============================================================================

/// Authentication store.
pub struct AuthStore {
    state: StateCell<AuthState>,
    transport: Arc<dyn Transport>,
    notifier: Arc<dyn Notifier>,
    persist: PersistSlot,
    session: Option<Arc<dyn SessionJar>>,
    requests: RequestTracker,
}

impl AuthStore {
    pub fn new(
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn Notifier>,
        storage: Arc<dyn StateStorage>,
    ) -> Self {
        AuthStore {
            state: StateCell::default(),
            transport,
            notifier,
            persist: PersistSlot::new(storage, USER_STORE_KEY, USER_STORE_VERSION),
            session: None,
            requests: RequestTracker::new(),
        }
    }

    /// Persists and restores the transport's session cookie with the user.
    pub fn with_session_jar(mut self, jar: Arc<dyn SessionJar>) -> Self {
        self.session = Some(jar);
        self
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn state(&self) -> AuthState {
        self.state.snapshot()
    }

    pub fn user(&self) -> Option<User> {
        self.state.read(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read(|s| s.is_authenticated)
    }

    pub fn is_checking_auth(&self) -> bool {
        self.state.read(|s| s.is_checking_auth)
    }

    pub fn is_loading(&self) -> bool {
        self.state.read(|s| s.loading)
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Creates an account and signs it in.
    pub async fn sign_up(&self, input: &SignupInput) -> ClientResult<User> {
        let outcome = async {
            validate_signup(input)?;
            let ticket = self.requests.issue();
            let _loading = self.loading();

            let request = ApiRequest::post("user/signup").json(input)?;
            let envelope = self.call::<UserPayload>(request, SIGNUP_FAILED).await?;
            let user = require_user(&envelope)?;

            self.apply(ticket, |s| {
                s.user = Some(user.clone());
                s.is_authenticated = true;
            })
            .await;

            info!(email = %user.email, "Signed up");
            Ok((user, envelope.message_or("Account created successfully")))
        }
        .await;

        self.settle(outcome)
    }

    /// Signs in with email and password.
    pub async fn login(&self, input: &LoginInput) -> ClientResult<User> {
        let outcome = async {
            validate_login(input)?;
            let ticket = self.requests.issue();
            let _loading = self.loading();

            let request = ApiRequest::post("user/login").json(input)?;
            let envelope = self.call::<UserPayload>(request, LOGIN_FAILED).await?;
            let user = require_user(&envelope)?;

            self.apply(ticket, |s| {
                s.user = Some(user.clone());
                s.is_authenticated = true;
            })
            .await;

            info!(email = %user.email, "Logged in");
            Ok((user, envelope.message_or("Logged in successfully")))
        }
        .await;

        self.settle(outcome)
    }

    /// Confirms the emailed verification code.
    pub async fn verify_email(&self, verification_code: &str) -> ClientResult<User> {
        let outcome = async {
            validate_verification_code(verification_code)?;
            let ticket = self.requests.issue();
            let _loading = self.loading();

            let request = ApiRequest::post("user/verify-email")
                .json(&json!({ "verificationCode": verification_code.trim() }))?;
            let envelope = self.call::<UserPayload>(request, VERIFY_FAILED).await?;
            let user = require_user(&envelope)?;

            self.apply(ticket, |s| {
                s.user = Some(user.clone());
                s.is_authenticated = true;
            })
            .await;

            Ok((user, envelope.message_or("Email verified successfully")))
        }
        .await;

        self.settle(outcome)
    }

    /// Asks the server whether the session cookie is still good.
    ///
    /// Never fails: any rejection or transport error just means "not
    /// authenticated". Emits no notice.
    pub async fn check_authentication(&self) -> bool {
        let ticket = self.requests.issue();
        let _checking = FlagGuard::raise(&self.state, AuthState::begin_check, AuthState::end_check);

        let outcome = match self.transport.send(ApiRequest::get("user/check-auth")).await {
            Ok(body) => Envelope::<UserPayload>::accept(body, CHECK_FAILED)
                .and_then(|envelope| require_user(&envelope)),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(user) => {
                self.apply(ticket, |s| {
                    s.user = Some(user);
                    s.is_authenticated = true;
                })
                .await;
                true
            }
            Err(e) => {
                debug!(error = %e, "Session check failed");
                self.apply(ticket, |s| s.is_authenticated = false).await;
                false
            }
        }
    }

    /// Ends the session.
    pub async fn logout(&self) -> ClientResult<()> {
        let outcome = async {
            let ticket = self.requests.issue();
            let _loading = self.loading();

            let envelope = self
                .call::<Empty>(ApiRequest::post("user/logout"), LOGOUT_FAILED)
                .await?;

            self.apply(ticket, |s| {
                s.user = None;
                s.is_authenticated = false;
            })
            .await;

            info!("Logged out");
            Ok(((), envelope.message_or("Logged out successfully")))
        }
        .await;

        self.settle(outcome)
    }

    /// Requests a password reset email.
    pub async fn forgot_password(&self, email: &str) -> ClientResult<()> {
        let outcome = async {
            validate_email(email)?;
            let _loading = self.loading();

            let request =
                ApiRequest::post("user/forgot-password").json(&json!({ "email": email.trim() }))?;
            let envelope = self.call::<Empty>(request, FORGOT_FAILED).await?;

            Ok(((), envelope.message_or("Password reset link sent to your email")))
        }
        .await;

        self.settle(outcome)
    }

    /// Sets a new password using the token from the reset email.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> ClientResult<()> {
        let outcome = async {
            validate_required("token", token)?;
            validate_password(new_password)?;
            let _loading = self.loading();

            let request = ApiRequest::post("user/reset-password")
                .segment(token.trim())
                .json(&json!({ "newPassword": new_password }))?;
            let envelope = self.call::<Empty>(request, RESET_FAILED).await?;

            Ok(((), envelope.message_or("Password reset successfully")))
        }
        .await;

        self.settle(outcome)
    }

    /// Saves profile changes and takes the server's copy of the user.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<User> {
        let outcome = async {
            validate_profile_update(update)?;
            let ticket = self.requests.issue();
            let _loading = self.loading();

            let request = ApiRequest::put("user/profile/update").json(update)?;
            let envelope = self.call::<UserPayload>(request, PROFILE_FAILED).await?;
            let user = require_user(&envelope)?;

            self.apply(ticket, |s| {
                s.user = Some(user.clone());
                s.is_authenticated = true;
            })
            .await;

            Ok((user, envelope.message_or("Profile updated successfully")))
        }
        .await;

        self.settle(outcome)
    }

    /// Loads the persisted user and session cookie.
    ///
    /// Does not mark the session authenticated; only a successful
    /// [`check_authentication`](Self::check_authentication) does that.
    pub async fn restore(&self) -> ClientResult<()> {
        let Some(saved) = self.persist.load::<PersistedAuth>().await? else {
            return Ok(());
        };

        if let (Some(jar), Some(cookies)) = (&self.session, saved.session.as_deref()) {
            jar.restore_session(cookies);
        }

        let restored = saved.user.is_some();
        self.state.update(|s| s.user = saved.user);
        debug!(restored, "Auth state restored");
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn loading(&self) -> FlagGuard<'_, AuthState> {
        FlagGuard::raise(&self.state, AuthState::begin_loading, AuthState::end_loading)
    }

    async fn call<P: DeserializeOwned>(
        &self,
        request: ApiRequest,
        fallback: &str,
    ) -> ClientResult<Envelope<P>> {
        let body = self.transport.send(request).await?;
        Envelope::accept(body, fallback)
    }

    /// Applies `f` unless a newer request has been issued since `ticket`,
    /// then persists.
    async fn apply<F>(&self, ticket: Ticket, f: F)
    where
        F: FnOnce(&mut AuthState),
    {
        let applied = self.state.update_if(|s| {
            if !self.requests.is_latest(ticket) {
                return false;
            }
            f(s);
            true
        });

        if applied {
            self.save().await;
        } else {
            debug!("Discarding response superseded by a newer request");
        }
    }

    async fn save(&self) {
        let persisted = PersistedAuth {
            user: self.user(),
            session: self.session.as_ref().and_then(|jar| jar.session_cookies()),
        };
        self.persist.save_or_warn(&persisted).await;
    }

    /// Emits the single notice for an action and hands back its result.
    fn settle<T>(&self, outcome: ClientResult<(T, String)>) -> ClientResult<T> {
        match outcome {
            Ok((value, message)) => {
                self.notifier.notify(Notice::success(message));
                Ok(value)
            }
            Err(e) => {
                debug!(error = %e, "Auth action failed");
                self.notifier.notify(Notice::error(e.notice_text()));
                Err(e)
            }
        }
    }
}

fn require_user(envelope: &Envelope<UserPayload>) -> ClientResult<User> {
    envelope
        .payload
        .user
        .clone()
        .ok_or_else(|| ClientError::Decode("response has no user".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{MemoryNotifier, NoticeLevel};
    use crate::transport::{Method, MockTransport};
    use platter_storage::MemoryStorage;
    use std::sync::Mutex;

    fn user_json(name: &str) -> serde_json::Value {
        json!({
            "fullname": name,
            "email": "asha@example.com",
            "contact": 9876543210u64,
            "address": "12 MG Road",
            "city": "Pune",
            "country": "India",
            "profilePicture": "",
            "admin": false,
            "isVerified": true
        })
    }

    fn login_input() -> LoginInput {
        LoginInput {
            email: "asha@example.com".into(),
            password: "hunter22".into(),
        }
    }

    struct Harness {
        store: AuthStore,
        notices: Arc<MemoryNotifier>,
    }

    fn harness(transport: MockTransport) -> Harness {
        let notices = Arc::new(MemoryNotifier::new());
        let store = AuthStore::new(
            Arc::new(transport),
            notices.clone(),
            Arc::new(MemoryStorage::new()),
        );
        Harness { store, notices }
    }

    #[derive(Default)]
    struct FakeJar {
        cookies: Mutex<Option<String>>,
    }

    impl SessionJar for FakeJar {
        fn session_cookies(&self) -> Option<String> {
            self.cookies.lock().unwrap().clone()
        }

        fn restore_session(&self, cookies: &str) {
            *self.cookies.lock().unwrap() = Some(cookies.to_string());
        }
    }

    #[test]
    fn test_initial_state() {
        let state = AuthState::default();
        assert!(state.user.is_none());
        assert!(!state.is_authenticated);
        assert!(state.is_checking_auth);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| req.method == Method::Post && req.path() == "user/login")
            .times(1)
            .returning(|_| {
                Ok(json!({ "success": true, "message": "Welcome back Asha", "user": user_json("Asha") }))
            });

        let h = harness(transport);
        assert!(!h.store.is_authenticated());

        let user = h.store.login(&login_input()).await.unwrap();

        assert_eq!(user.fullname, "Asha");
        assert!(h.store.is_authenticated());
        assert!(!h.store.is_loading());
        assert_eq!(h.notices.take(), vec![Notice::success("Welcome back Asha")]);
    }

    #[tokio::test]
    async fn test_sign_up_signs_in() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                req.path() == "user/signup"
                    && req.body.as_ref().map(|b| b["contact"] == "9876543210") == Some(true)
            })
            .times(1)
            .returning(|_| {
                let mut user = user_json("Asha");
                user["isVerified"] = json!(false);
                Ok(json!({ "success": true, "message": "Account created successfully", "user": user }))
            });

        let h = harness(transport);
        let input = SignupInput {
            fullname: "Asha".into(),
            email: "asha@example.com".into(),
            password: "hunter22".into(),
            contact: "9876543210".into(),
        };

        let user = h.store.sign_up(&input).await.unwrap();

        assert!(!user.is_verified);
        assert!(h.store.is_authenticated());
        assert!(!h.store.is_loading());
        assert_eq!(h.notices.take(), vec![Notice::success("Account created successfully")]);
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let mut transport = MockTransport::new();
        transport.expect_send().times(1).returning(|_| {
            Ok(json!({ "success": false, "message": "Incorrect email or password" }))
        });

        let h = harness(transport);
        let err = h.store.login(&login_input()).await.unwrap_err();

        assert!(matches!(err, ClientError::Rejected { .. }));
        assert!(!h.store.is_authenticated());
        assert!(!h.store.is_loading());
        assert_eq!(h.notices.take(), vec![Notice::error("Incorrect email or password")]);
    }

    #[tokio::test]
    async fn test_login_rejected_without_message_uses_fallback() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Ok(json!({ "success": false })));

        let h = harness(transport);
        assert!(h.store.login(&login_input()).await.is_err());
        assert_eq!(h.notices.take(), vec![Notice::error(LOGIN_FAILED)]);
    }

    #[tokio::test]
    async fn test_transport_failure_uses_generic_notice() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Err(ClientError::Transport("connection refused".into())));

        let h = harness(transport);
        let err = h.store.login(&login_input()).await.unwrap_err();

        assert!(err.is_transport());
        assert!(!h.store.is_loading());
        assert_eq!(h.notices.take(), vec![Notice::error("An error occurred")]);
    }

    #[tokio::test]
    async fn test_invalid_input_sends_nothing() {
        let mut transport = MockTransport::new();
        transport.expect_send().never();

        let h = harness(transport);
        let input = LoginInput {
            email: "not-an-email".into(),
            password: "hunter22".into(),
        };

        let err = h.store.login(&input).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(!h.store.is_loading());

        let notices = h.notices.take();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn test_loading_visible_while_in_flight() {
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();
        let release_rx = Mutex::new(Some(release_rx));

        struct Gated(Mutex<Option<tokio::sync::oneshot::Receiver<()>>>);

        #[async_trait::async_trait]
        impl Transport for Gated {
            async fn send(&self, _request: ApiRequest) -> ClientResult<serde_json::Value> {
                let rx = self.0.lock().unwrap().take().unwrap();
                let _ = rx.await;
                Ok(json!({ "success": true, "user": user_json("Asha") }))
            }
        }

        let store = Arc::new(AuthStore::new(
            Arc::new(Gated(release_rx)),
            Arc::new(MemoryNotifier::new()),
            Arc::new(MemoryStorage::new()),
        ));
        let mut rx = store.subscribe();

        let task = {
            let store = store.clone();
            tokio::spawn(async move { store.login(&login_input()).await })
        };

        rx.wait_for(|s| s.loading).await.unwrap();
        assert!(!store.is_authenticated());

        release_tx.send(()).unwrap();
        task.await.unwrap().unwrap();

        assert!(store.is_authenticated());
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_check_authentication_failure_never_errors() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| req.method == Method::Get && req.path() == "user/check-auth")
            .returning(|_| Err(ClientError::Status { status: 401 }));

        let h = harness(transport);
        assert!(h.store.is_checking_auth());

        assert!(!h.store.check_authentication().await);
        assert!(!h.store.is_authenticated());
        assert!(!h.store.is_checking_auth());
        assert!(h.notices.take().is_empty());
    }

    #[tokio::test]
    async fn test_check_authentication_success() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Ok(json!({ "success": true, "user": user_json("Asha") })));

        let h = harness(transport);
        assert!(h.store.check_authentication().await);
        assert!(h.store.is_authenticated());
        assert!(!h.store.is_checking_auth());
        assert!(!h.store.is_loading());
        assert!(h.notices.take().is_empty());
    }

    #[tokio::test]
    async fn test_logout_clears_user() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| req.path() == "user/login")
            .returning(|_| Ok(json!({ "success": true, "user": user_json("Asha") })));
        transport
            .expect_send()
            .withf(|req| req.method == Method::Post && req.path() == "user/logout")
            .times(1)
            .returning(|_| Ok(json!({ "success": true, "message": "Logged out successfully." })));

        let h = harness(transport);
        h.store.login(&login_input()).await.unwrap();
        h.store.logout().await.unwrap();

        assert!(h.store.user().is_none());
        assert!(!h.store.is_authenticated());
        assert_eq!(h.notices.take().len(), 2);
    }

    #[tokio::test]
    async fn test_logout_failure_is_reported() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Ok(json!({ "success": false })));

        let h = harness(transport);
        assert!(h.store.logout().await.is_err());
        assert_eq!(h.notices.take(), vec![Notice::error(LOGOUT_FAILED)]);
    }

    #[tokio::test]
    async fn test_verify_email_sends_code() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                req.path() == "user/verify-email"
                    && req.body.as_ref().map(|b| b["verificationCode"] == "123456") == Some(true)
            })
            .times(1)
            .returning(|_| Ok(json!({ "success": true, "user": user_json("Asha") })));

        let h = harness(transport);
        h.store.verify_email(" 123456 ").await.unwrap();
        assert!(h.store.is_authenticated());
    }

    #[tokio::test]
    async fn test_verify_email_requires_code() {
        let mut transport = MockTransport::new();
        transport.expect_send().never();

        let h = harness(transport);
        assert!(h.store.verify_email("  ").await.is_err());
    }

    #[tokio::test]
    async fn test_reset_password_escapes_token() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                req.segments == vec!["user", "reset-password", "tok/en"]
                    && req.body.as_ref().map(|b| b["newPassword"] == "newsecret") == Some(true)
            })
            .times(1)
            .returning(|_| Ok(json!({ "success": true, "message": "Password reset successfully." })));

        let h = harness(transport);
        h.store.reset_password("tok/en", "newsecret").await.unwrap();
        assert_eq!(
            h.notices.take(),
            vec![Notice::success("Password reset successfully.")]
        );
    }

    #[tokio::test]
    async fn test_forgot_password_failure() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| req.path() == "user/forgot-password")
            .returning(|_| Ok(json!({ "success": false, "message": "User doesn't exist" })));

        let h = harness(transport);
        let err = h.store.forgot_password("asha@example.com").await.unwrap_err();
        assert_eq!(err.notice_text(), "User doesn't exist");
        assert!(!h.store.is_loading());
    }

    #[tokio::test]
    async fn test_update_profile_replaces_user() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| req.method == Method::Put && req.path() == "user/profile/update")
            .times(1)
            .returning(|_| Ok(json!({ "success": true, "user": user_json("Asha Rao") })));

        let h = harness(transport);
        let update = ProfileUpdate {
            fullname: "Asha Rao".into(),
            email: "asha@example.com".into(),
            address: "12 MG Road".into(),
            city: "Pune".into(),
            country: "India".into(),
            profile_picture: None,
        };

        let user = h.store.update_profile(&update).await.unwrap();
        assert_eq!(user.fullname, "Asha Rao");
        assert_eq!(h.store.user().unwrap().fullname, "Asha Rao");
        assert!(!h.store.is_loading());
    }

    #[tokio::test]
    async fn test_superseded_response_not_applied() {
        let (first_tx, first_rx) = tokio::sync::oneshot::channel::<()>();

        struct Ordered(Mutex<Option<tokio::sync::oneshot::Receiver<()>>>);

        #[async_trait::async_trait]
        impl Transport for Ordered {
            async fn send(&self, request: ApiRequest) -> ClientResult<serde_json::Value> {
                match request.path().as_str() {
                    "user/login" => {
                        let rx = self.0.lock().unwrap().take().unwrap();
                        let _ = rx.await;
                        Ok(json!({ "success": true, "user": user_json("Asha") }))
                    }
                    _ => Ok(json!({ "success": true })),
                }
            }
        }

        let store = Arc::new(AuthStore::new(
            Arc::new(Ordered(Mutex::new(Some(first_rx)))),
            Arc::new(MemoryNotifier::new()),
            Arc::new(MemoryStorage::new()),
        ));
        let mut rx = store.subscribe();

        let login = {
            let store = store.clone();
            tokio::spawn(async move { store.login(&login_input()).await })
        };
        rx.wait_for(|s| s.loading).await.unwrap();

        // Logout is issued after login and completes first.
        store.logout().await.unwrap();
        first_tx.send(()).unwrap();

        // The caller still gets the login result...
        assert!(login.await.unwrap().is_ok());
        // ...but the stale response does not resurrect the session.
        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_persisted_user_survives_rebuild() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Ok(json!({ "success": true, "user": user_json("Asha") })));

        let storage = Arc::new(MemoryStorage::new());
        let jar = Arc::new(FakeJar::default());
        jar.restore_session("token=abc");

        let store = AuthStore::new(
            Arc::new(transport),
            Arc::new(MemoryNotifier::new()),
            storage.clone(),
        )
        .with_session_jar(jar);
        store.login(&login_input()).await.unwrap();

        let raw = storage.get_item(USER_STORE_KEY).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["state"]["user"]["fullname"], "Asha");
        assert_eq!(value["state"]["session"], "token=abc");
        assert!(value["state"].get("isAuthenticated").is_none());
        assert!(value["state"].get("loading").is_none());

        let fresh_jar = Arc::new(FakeJar::default());
        let rebuilt = AuthStore::new(
            Arc::new(MockTransport::new()),
            Arc::new(MemoryNotifier::new()),
            storage,
        )
        .with_session_jar(fresh_jar.clone());
        rebuilt.restore().await.unwrap();

        assert_eq!(rebuilt.user().unwrap().fullname, "Asha");
        assert!(!rebuilt.is_authenticated());
        assert_eq!(fresh_jar.session_cookies().as_deref(), Some("token=abc"));
    }
}
