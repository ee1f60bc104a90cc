//! Auth endpoint URLs.

/// Path of the credential exchange endpoint.
pub const LOGIN_PATH: &str = "auth/login/";
/// Path of the token refresh endpoint.
pub const REFRESH_PATH: &str = "auth/token/refresh/";
/// Path of the refresh token revocation endpoint.
pub const LOGOUT_PATH: &str = "auth/logout/";
/// Path of the registration endpoint.
pub const REGISTER_PATH: &str = "auth/register/";
/// Path of the OTP request endpoint.
pub const OTP_REQUEST_PATH: &str = "auth/otp/request/";
/// Path of the OTP verification endpoint.
pub const OTP_VERIFY_PATH: &str = "auth/otp/verify/";
/// Path of the "who am I" endpoint.
pub const ME_PATH: &str = "accounts/me/";

/// Absolute URLs of the auth endpoints under one API base.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthEndpoints {
    base: String,
}

impl AuthEndpoints {
    /// Build from the API base URL (a trailing slash is ignored).
    pub fn new(base_url: &str) -> Self {
        Self {
            base: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// API base URL without trailing slash.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Join a relative path to the base.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    /// Credential exchange.
    pub fn login(&self) -> String {
        self.url(LOGIN_PATH)
    }

    /// Token refresh.
    pub fn refresh(&self) -> String {
        self.url(REFRESH_PATH)
    }

    /// Refresh token revocation.
    pub fn logout(&self) -> String {
        self.url(LOGOUT_PATH)
    }

    /// Registration.
    pub fn register(&self) -> String {
        self.url(REGISTER_PATH)
    }

    /// OTP request.
    pub fn otp_request(&self) -> String {
        self.url(OTP_REQUEST_PATH)
    }

    /// OTP verification.
    pub fn otp_verify(&self) -> String {
        self.url(OTP_VERIFY_PATH)
    }

    /// Current user profile.
    pub fn me(&self) -> String {
        self.url(ME_PATH)
    }
}

/// Whether `url` targets the login or refresh endpoint.
///
/// A 401 from either of these means the credentials themselves are bad, so
/// the gateway must not answer it with another refresh.
pub fn is_auth_endpoint(url: &reqwest::Url) -> bool {
    let path = url.path();
    path.contains("/auth/login") || path.contains("/auth/token/refresh")
}
