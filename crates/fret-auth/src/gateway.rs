//! Outbound request gateway.
//!
//! Every API call is dispatched through [`RequestGateway::execute`]:
//!
//! 1. Attach `Authorization: Bearer <access>` when an access token is stored.
//! 2. Send.
//! 3. On a 401 from anything but the login or refresh endpoint, refresh the
//!    access token and replay the original request once with the new token.
//!    The replay's response is returned as-is, whatever its status.
//! 4. If the refresh fails, end the session and return the refresh error.
//!    A refresh outrun by logout leaves the session alone; when a new
//!    session was started meanwhile, the replay uses its access token.
//!
//! Transport errors propagate immediately, without retry.

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Method, Request, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::endpoints::is_auth_endpoint;
use crate::errors::{AuthError, GatewayError};
use crate::session::SessionManager;

/// Authenticating HTTP dispatcher bound to a session.
#[derive(Clone, Debug)]
pub struct RequestGateway {
    http: reqwest::Client,
    session: SessionManager,
}

impl RequestGateway {
    /// Gateway sending through `http` with tokens from `session`.
    pub fn new(http: reqwest::Client, session: SessionManager) -> Self {
        Self { http, session }
    }

    /// Session supplying the tokens.
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Start building a request. Send it with [`send_json`](Self::send_json),
    /// [`send_empty`](Self::send_empty) or `build()` + [`execute`](Self::execute).
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http.request(method, url)
    }

    /// Dispatch `request` with bearer auth and one refresh-and-retry on 401.
    #[tracing::instrument(skip_all, fields(method = %request.method(), path = %request.url().path()))]
    pub async fn execute(&self, request: Request) -> Result<Response, GatewayError> {
        let exempt = is_auth_endpoint(request.url());
        let replay = request.try_clone();
        let token = self.session.access_token();

        let response = self
            .http
            .execute(with_bearer(request, token.as_deref())?)
            .await?;

        if response.status() != StatusCode::UNAUTHORIZED || exempt {
            return Ok(response);
        }
        let Some(replay) = replay else {
            debug!("streaming body cannot be replayed, returning 401");
            return Ok(response);
        };

        debug!("access token rejected, refreshing");
        let fresh = match self.session.refresh_for_retry(token.as_deref()).await {
            Ok(access) => access,
            Err(AuthError::SessionEnded) => match self.session.access_token() {
                Some(current) if Some(current.as_str()) != token.as_deref() => {
                    debug!("session replaced during refresh, retrying with its token");
                    current
                }
                _ => return Err(GatewayError::Refresh(AuthError::SessionEnded)),
            },
            Err(e) => {
                warn!(error = %e, "token refresh failed, ending session");
                let _ = self.session.logout();
                return Err(GatewayError::Refresh(e));
            }
        };

        Ok(self
            .http
            .execute(with_bearer(replay, Some(&fresh))?)
            .await?)
    }

    /// Send a built request and decode a 2xx JSON body into `T`.
    ///
    /// Non-2xx responses become [`GatewayError::Status`]. An empty body
    /// decodes as JSON `null`, so `T = ()` or `Option<_>` accept 204s.
    pub async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, GatewayError> {
        let response = self.execute(builder.build()?).await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(status_error(status, &bytes));
        }
        if bytes.is_empty() {
            return Ok(serde_json::from_slice(b"null")?);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Send a built request, ignoring any 2xx body.
    pub async fn send_empty(&self, builder: RequestBuilder) -> Result<(), GatewayError> {
        let response = self.execute(builder.build()?).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let bytes = response.bytes().await?;
        Err(status_error(status, &bytes))
    }

    /// `GET url` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, GatewayError> {
        self.send_json(self.http.get(url)).await
    }

    /// `POST url` with a JSON body and decode the JSON response.
    pub async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(self.http.post(url).json(body)).await
    }

    /// `PATCH url` with a JSON body and decode the JSON response.
    pub async fn patch_json<B, T>(&self, url: &str, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(self.http.patch(url).json(body)).await
    }
}

fn with_bearer(mut request: Request, token: Option<&str>) -> Result<Request, GatewayError> {
    if let Some(token) = token {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| GatewayError::InvalidHeader)?;
        value.set_sensitive(true);
        let _ = request.headers_mut().insert(AUTHORIZATION, value);
    }
    Ok(request)
}

fn status_error(status: StatusCode, body: &[u8]) -> GatewayError {
    GatewayError::Status {
        status: status.as_u16(),
        body: String::from_utf8_lossy(body).into_owned(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
