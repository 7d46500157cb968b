//! Claims carried by access tokens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims embedded in every access token and inserted into request
/// extensions once a gated request passes the ownership check.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AccountClaims {
    /// Account the token was issued for
    #[serde(rename = "accountId")]
    pub account_id: Uuid,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}
