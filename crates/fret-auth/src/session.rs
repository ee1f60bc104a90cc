//! Session Manager.
//!
//! [`SessionManager`] is the only writer of the token pair and the owner of
//! the cached [`User`]. Everything else reads through it: the gateway pulls
//! the access token at send time, the realtime hub reads it when opening a
//! socket, guards read the user.
//!
//! Login, refresh and revoke talk to the auth endpoints directly. Profile
//! fetches and the registration/OTP calls go through the
//! [`RequestGateway`] like any other API call.

use std::sync::Arc;
use std::time::Duration;

use fret_core::{User, UserRole};
use fret_settings::FretSettings;
use serde_json::json;
use tokio::sync::{Mutex as AsyncMutex, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::endpoints::AuthEndpoints;
use crate::errors::{AuthError, GatewayError};
use crate::gateway::RequestGateway;
use crate::navigation::{LogNavigator, Navigator, Route};
use crate::storage::{FileTokenStore, StoredTokens, TokenStore};
use crate::types::{AuthResult, MessageResponse, RegisterRequest, RegisterResponse, TokenRefresh};

/// Session construction options.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// REST API base URL.
    pub api_base_url: String,
    /// Serialize refreshes and let callers with an already-replaced token
    /// reuse the new one.
    pub coalesce_refresh: bool,
}

impl SessionConfig {
    /// Options for `api_base_url` with refresh coalescing off.
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            coalesce_refresh: false,
        }
    }

    /// Options taken from loaded settings.
    pub fn from_settings(settings: &FretSettings) -> Self {
        Self {
            api_base_url: settings.api.base_url.clone(),
            coalesce_refresh: settings.auth.coalesce_refresh,
        }
    }
}

/// Authentication state of the client. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    http: reqwest::Client,
    endpoints: AuthEndpoints,
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    user: watch::Sender<Option<User>>,
    refresh_gate: Option<AsyncMutex<()>>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("api", &self.inner.endpoints.base())
            .field("logged_in", &self.is_logged_in())
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Create an unauthenticated session. Call [`initialize`](Self::initialize)
    /// to restore persisted tokens.
    pub fn new(
        http: reqwest::Client,
        config: SessionConfig,
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (user, _) = watch::channel(None);
        Self {
            inner: Arc::new(SessionInner {
                http,
                endpoints: AuthEndpoints::new(&config.api_base_url),
                store,
                navigator,
                user,
                refresh_gate: config.coalesce_refresh.then(|| AsyncMutex::new(())),
            }),
        }
    }

    /// Session wired from settings: file token store, logging navigator and
    /// an HTTP client honoring the configured request timeout.
    pub fn from_settings(settings: &FretSettings) -> Result<Self, AuthError> {
        let mut builder = reqwest::Client::builder();
        if let Some(ms) = settings.api.request_timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let http = builder.build()?;
        let store = Arc::new(FileTokenStore::new(settings.auth.token_file_path()));
        Ok(Self::new(
            http,
            SessionConfig::from_settings(settings),
            store,
            Arc::new(LogNavigator),
        ))
    }

    /// Gateway that authenticates requests with this session.
    pub fn gateway(&self) -> RequestGateway {
        RequestGateway::new(self.inner.http.clone(), self.clone())
    }

    /// Auth endpoint URLs.
    pub fn endpoints(&self) -> &AuthEndpoints {
        &self.inner.endpoints
    }

    // ── State accessors ──────────────────────────────────────────────────

    /// Cached account, `None` when unauthenticated.
    pub fn current_user(&self) -> Option<User> {
        self.inner.user.borrow().clone()
    }

    /// Whether an account is cached.
    pub fn is_logged_in(&self) -> bool {
        self.inner.user.borrow().is_some()
    }

    /// Role of the cached account.
    pub fn role(&self) -> Option<UserRole> {
        self.inner.user.borrow().as_ref().map(|u| u.role)
    }

    /// Whether the cached account holds any of `roles`. False when
    /// unauthenticated.
    pub fn has_role(&self, roles: &[UserRole]) -> bool {
        self.inner
            .user
            .borrow()
            .as_ref()
            .is_some_and(|u| u.has_any_role(roles))
    }

    /// Stored access token, read at the moment of the call.
    pub fn access_token(&self) -> Option<String> {
        self.inner.store.load().access
    }

    /// Stored refresh token, read at the moment of the call.
    pub fn refresh_token(&self) -> Option<String> {
        self.inner.store.load().refresh
    }

    /// Watch the cached account. The receiver sees every login, logout and
    /// profile update.
    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.inner.user.subscribe()
    }

    /// Replace the cached account after a profile edit.
    pub fn update_profile(&self, user: User) {
        self.set_user(Some(user));
    }

    /// Ask the embedder to show `route`.
    pub fn navigate(&self, route: Route) {
        self.inner.navigator.navigate(route);
    }

    fn set_user(&self, user: Option<User>) {
        let _ = self.inner.user.send_replace(user);
    }

    fn clear_tokens(&self) {
        if let Err(e) = self.inner.store.clear() {
            warn!(error = %e, "failed to clear stored tokens");
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────────

    /// Restore the session from persisted tokens.
    ///
    /// With no stored token this resolves immediately without touching the
    /// network. Otherwise the profile is fetched through the gateway, so an
    /// expired access token is refreshed once on the way. Any failure clears
    /// the stored tokens and leaves the session unauthenticated.
    #[tracing::instrument(skip_all)]
    pub async fn initialize(&self) -> Option<User> {
        if self.inner.store.load().is_empty() {
            debug!("no stored tokens, starting unauthenticated");
            return None;
        }

        match self
            .gateway()
            .get_json::<User>(&self.inner.endpoints.me())
            .await
        {
            Ok(user) => {
                info!(user_id = %user.id, role = %user.role, "session restored");
                self.set_user(Some(user.clone()));
                Some(user)
            }
            Err(e) => {
                warn!(error = %e, "session restore failed, clearing stored tokens");
                self.clear_tokens();
                self.set_user(None);
                None
            }
        }
    }

    /// Exchange credentials for a token pair.
    ///
    /// On success both tokens are persisted and the returned account becomes
    /// the cached user. On failure nothing changes.
    #[tracing::instrument(skip_all)]
    pub async fn login(&self, phone_number: &str, password: &str) -> Result<AuthResult, AuthError> {
        let response = self
            .inner
            .http
            .post(self.inner.endpoints.login())
            .json(&json!({ "phone_number": phone_number, "password": password }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            let status = status.as_u16();
            warn!(status, "login rejected");
            return Err(if status == 400 || status == 401 {
                AuthError::InvalidCredentials { status, message }
            } else {
                AuthError::Rejected { status, message }
            });
        }

        let result: AuthResult = response.json().await?;
        self.inner
            .store
            .save(&StoredTokens::pair(&result.access, &result.refresh))?;
        info!(user_id = %result.user.id, role = %result.user.role, "logged in");
        self.set_user(Some(result.user.clone()));
        Ok(result)
    }

    /// Trade the stored refresh token for a new access token.
    ///
    /// Only the access token is persisted. If the session was cleared while
    /// the request was in flight the new token is discarded and
    /// [`AuthError::SessionEnded`] is returned.
    #[tracing::instrument(skip_all)]
    pub async fn refresh_access_token(&self) -> Result<TokenRefresh, AuthError> {
        let refresh = self.refresh_token().ok_or(AuthError::NoRefreshToken)?;

        let response = self
            .inner
            .http
            .post(self.inner.endpoints.refresh())
            .json(&json!({ "refresh": refresh }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "token refresh rejected");
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let data: TokenRefresh = response.json().await?;
        if !self.inner.store.replace_access(&refresh, &data.access)? {
            debug!("session changed during refresh, discarding new access token");
            return Err(AuthError::SessionEnded);
        }
        debug!("access token refreshed");
        Ok(data)
    }

    /// Refresh on behalf of a request that was rejected while carrying
    /// `stale`. Returns the access token to retry with.
    pub(crate) async fn refresh_for_retry(&self, stale: Option<&str>) -> Result<String, AuthError> {
        let Some(gate) = &self.inner.refresh_gate else {
            return self.refresh_access_token().await.map(|r| r.access);
        };

        let _turn = gate.lock().await;
        if let Some(current) = self.access_token() {
            if Some(current.as_str()) != stale {
                debug!("access token already replaced, reusing it");
                return Ok(current);
            }
        }
        self.refresh_access_token().await.map(|r| r.access)
    }

    /// End the session.
    ///
    /// Clears both tokens, drops the cached user and navigates to the login
    /// screen. When a refresh token was stored, a revoke request is spawned
    /// on the current runtime; its outcome is ignored. The returned handle
    /// lets short-lived processes wait for it. Safe to call repeatedly or
    /// without a session.
    pub fn logout(&self) -> Option<JoinHandle<()>> {
        let tokens = self.inner.store.load();
        self.clear_tokens();
        if self.is_logged_in() {
            info!("logged out");
        }
        self.set_user(None);
        self.navigate(Route::Login);

        let refresh = tokens.refresh?;
        let mut request = self
            .inner
            .http
            .post(self.inner.endpoints.logout())
            .json(&json!({ "refresh": refresh }));
        if let Some(access) = tokens.access {
            request = request.bearer_auth(access);
        }

        let revoke = async move {
            match request.send().await {
                Ok(resp) if resp.status().is_success() => debug!("refresh token revoked"),
                Ok(resp) => debug!(status = resp.status().as_u16(), "revoke rejected, ignoring"),
                Err(e) => debug!(error = %e, "revoke failed, ignoring"),
            }
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => Some(handle.spawn(revoke)),
            Err(_) => {
                debug!("no async runtime, skipping revoke");
                None
            }
        }
    }

    // ── Account onboarding ───────────────────────────────────────────────

    /// Create an account. The backend sends an OTP to the phone number.
    #[tracing::instrument(skip_all)]
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, GatewayError> {
        self.gateway()
            .post_json(&self.inner.endpoints.register(), request)
            .await
    }

    /// Ask for a fresh OTP.
    #[tracing::instrument(skip_all)]
    pub async fn request_otp(&self, phone_number: &str) -> Result<MessageResponse, GatewayError> {
        self.gateway()
            .post_json(
                &self.inner.endpoints.otp_request(),
                &json!({ "phone_number": phone_number }),
            )
            .await
    }

    /// Confirm a phone number with the received OTP.
    #[tracing::instrument(skip_all)]
    pub async fn verify_otp(&self, phone_number: &str, otp: &str) -> Result<MessageResponse, GatewayError> {
        self.gateway()
            .post_json(
                &self.inner.endpoints.otp_verify(),
                &json!({ "phone_number": phone_number, "otp": otp }),
            )
            .await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
