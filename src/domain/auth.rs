use serde::{Deserialize, Serialize};

/// Role embedded in tokens issued to catalog administrators.
pub const ADMIN_ROLE: &str = "admin";

/// Claims carried by the signed bearer token issued on admin login.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AdminClaims {
    /// Administrator identifier.
    pub sub: String,
    pub email: String,
    pub role: String,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiration, seconds since the Unix epoch.
    pub exp: i64,
}

impl AdminClaims {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

/// Response body returned by a successful login.
#[derive(Debug, Serialize)]
pub struct AuthToken {
    pub message: String,
    pub token: String,
}
