use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::claims::AccountClaims;
use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

/// Why a token failed verification. Logged, never shown to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    /// Not three base64url segments of valid JSON
    Malformed,
    BadSignature,
    /// Header names `none` or a non-HMAC algorithm
    UnexpectedAlgorithm,
    Expired,
    /// A registered claim required for validation (`exp`) is absent
    MissingClaim,
}

impl TokenRejection {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::BadSignature => "bad_signature",
            Self::UnexpectedAlgorithm => "unexpected_algorithm",
            Self::Expired => "expired",
            Self::MissingClaim => "missing_claim",
        }
    }
}

impl fmt::Display for TokenRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid token: {0}")]
    InvalidToken(TokenRejection),
    /// Signature checked out but the payload is not `AccountClaims`
    #[error("invalid claims")]
    InvalidClaims,
}

/// Algorithms accepted on verification; anything else (including `none`) is rejected.
const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Mint an access token for `account_id`, valid for `security.token_ttl`.
pub fn mint_access_token(
    account_id: Uuid,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = now
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|since| i64::try_from(since.as_secs()).ok())
        .ok_or_else(|| AppError::internal("Failed to get current time"))?;

    let exp = i64::try_from(security.token_ttl.as_secs())
        .ok()
        .and_then(|ttl| iat.checked_add(ttl))
        .ok_or_else(|| AppError::internal("Token expiry out of range"))?;

    let claims = AccountClaims {
        account_id,
        iat,
        exp,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Verify a token and decode its claims.
///
/// Signature, algorithm family and `exp` are checked first; only a token that
/// passes all of them is decoded into [`AccountClaims`].
pub fn verify_access_token(
    token: &str,
    security: &SecurityConfig,
) -> Result<AccountClaims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.algorithms = HMAC_ALGORITHMS.to_vec();

    let data = decode::<Map<String, Value>>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map_err(|e| match e.kind() {
        // Payload JSON is only parsed once the header and signature checked out
        ErrorKind::Json(_) if decode_header(token).is_ok() => TokenError::InvalidClaims,
        kind => TokenError::InvalidToken(rejection_for(kind)),
    })?;

    serde_json::from_value::<AccountClaims>(Value::Object(data.claims))
        .map_err(|_| TokenError::InvalidClaims)
}

fn rejection_for(kind: &ErrorKind) -> TokenRejection {
    match kind {
        ErrorKind::ExpiredSignature => TokenRejection::Expired,
        ErrorKind::InvalidSignature => TokenRejection::BadSignature,
        ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::MissingAlgorithm => TokenRejection::UnexpectedAlgorithm,
        ErrorKind::MissingRequiredClaim(_) => TokenRejection::MissingClaim,
        _ => TokenRejection::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine as _;

    use super::*;

    fn security(secret: &str) -> SecurityConfig {
        SecurityConfig::new(secret.as_bytes()).unwrap()
    }

    fn hs256_token(payload: &Value, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            payload,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn now_secs() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64
    }

    #[test]
    fn mint_and_verify_roundtrip() {
        let security = security("test_secret_key_for_testing_purposes_only");
        let account_id = Uuid::new_v4();
        let now = SystemTime::now();

        let token = mint_access_token(account_id, now, &security).unwrap();
        let claims = verify_access_token(&token, &security).unwrap();

        assert_eq!(claims.account_id, account_id);
        assert_eq!(
            claims.iat,
            now.duration_since(UNIX_EPOCH).unwrap().as_secs() as i64
        );
        assert_eq!(claims.exp, claims.iat + 60 * 60);
    }

    #[test]
    fn ttl_follows_config() {
        let security = security("ttl-secret")
            .with_ttl(Duration::from_secs(90))
            .unwrap();
        let token = mint_access_token(Uuid::new_v4(), SystemTime::now(), &security).unwrap();
        let claims = verify_access_token(&token, &security).unwrap();
        assert_eq!(claims.exp - claims.iat, 90);
    }

    #[test]
    fn expired_token_is_rejected() {
        let security = security("test_secret_key_for_testing_purposes_only");
        // Two hours ago, well past the one-hour TTL plus validation leeway
        let issued = SystemTime::now() - Duration::from_secs(2 * 60 * 60);

        let token = mint_access_token(Uuid::new_v4(), issued, &security).unwrap();
        assert_eq!(
            verify_access_token(&token, &security),
            Err(TokenError::InvalidToken(TokenRejection::Expired))
        );
    }

    #[test]
    fn bad_signature_is_rejected() {
        let token = mint_access_token(Uuid::new_v4(), SystemTime::now(), &security("secret-A"))
            .unwrap();
        assert_eq!(
            verify_access_token(&token, &security("secret-B")),
            Err(TokenError::InvalidToken(TokenRejection::BadSignature))
        );
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let security = security("tamper-secret");
        let token = mint_access_token(Uuid::new_v4(), SystemTime::now(), &security).unwrap();

        // Flip the first character of the signature segment
        let dot = token.rfind('.').unwrap();
        let mut chars: Vec<char> = token.chars().collect();
        chars[dot + 1] = if chars[dot + 1] == 'A' { 'B' } else { 'A' };
        let tampered: String = chars.into_iter().collect();

        assert!(matches!(
            verify_access_token(&tampered, &security),
            Err(TokenError::InvalidToken(_))
        ));
    }

    #[test]
    fn alg_none_is_rejected() {
        let security = security("none-secret");
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(
            serde_json::json!({
                "accountId": Uuid::new_v4(),
                "iat": now_secs(),
                "exp": now_secs() + 600,
            })
            .to_string(),
        );
        let token = format!("{header}.{payload}.");

        assert!(matches!(
            verify_access_token(&token, &security),
            Err(TokenError::InvalidToken(_))
        ));
    }

    #[test]
    fn non_hmac_header_is_rejected_even_with_valid_hmac_signature() {
        let security = security("rs-secret");
        let token = mint_access_token(Uuid::new_v4(), SystemTime::now(), &security).unwrap();

        // Swap the header for one naming RS256, keep payload and signature
        let mut parts = token.splitn(3, '.');
        let _header = parts.next().unwrap();
        let payload = parts.next().unwrap();
        let signature = parts.next().unwrap();
        let rs_header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let forged = format!("{rs_header}.{payload}.{signature}");

        assert_eq!(
            verify_access_token(&forged, &security),
            Err(TokenError::InvalidToken(TokenRejection::UnexpectedAlgorithm))
        );
    }

    #[test]
    fn hs512_tokens_are_accepted() {
        let security = security("hs512-secret");
        let account_id = Uuid::new_v4();
        let claims = AccountClaims {
            account_id,
            iat: now_secs(),
            exp: now_secs() + 600,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(b"hs512-secret"),
        )
        .unwrap();

        assert_eq!(
            verify_access_token(&token, &security).unwrap().account_id,
            account_id
        );
    }

    #[test]
    fn garbage_is_malformed() {
        let security = security("garbage-secret");
        assert_eq!(
            verify_access_token("not-a-jwt", &security),
            Err(TokenError::InvalidToken(TokenRejection::Malformed))
        );
        assert!(verify_access_token("", &security).is_err());
    }

    #[test]
    fn numeric_account_id_is_invalid_claims() {
        let payload = serde_json::json!({ "accountId": 12345, "iat": now_secs(), "exp": now_secs() + 600 });
        let token = hs256_token(&payload, "claims-secret");
        assert_eq!(
            verify_access_token(&token, &security("claims-secret")),
            Err(TokenError::InvalidClaims)
        );
    }

    #[test]
    fn missing_account_id_is_invalid_claims() {
        let payload = serde_json::json!({ "sub": "someone", "iat": now_secs(), "exp": now_secs() + 600 });
        let token = hs256_token(&payload, "claims-secret");
        assert_eq!(
            verify_access_token(&token, &security("claims-secret")),
            Err(TokenError::InvalidClaims)
        );
    }

    #[test]
    fn non_object_payload_is_invalid_claims() {
        let token = encode(
            &Header::new(Algorithm::HS256),
            &"not-an-object",
            &EncodingKey::from_secret(b"claims-secret"),
        )
        .unwrap();
        assert_eq!(
            verify_access_token(&token, &security("claims-secret")),
            Err(TokenError::InvalidClaims)
        );
    }

    #[test]
    fn unparseable_header_stays_malformed() {
        let header = URL_SAFE_NO_PAD.encode(b"{not json");
        let payload = URL_SAFE_NO_PAD.encode(b"{}");
        let token = format!("{header}.{payload}.c2ln");
        assert_eq!(
            verify_access_token(&token, &security("header-secret")),
            Err(TokenError::InvalidToken(TokenRejection::Malformed))
        );
    }

    #[test]
    fn expiry_overflow_is_an_error_not_a_panic() {
        // Bypass with_ttl's bound to reach the arithmetic guard
        let mut security = security("overflow-secret");
        security.token_ttl = Duration::from_secs(u64::MAX);
        assert!(mint_access_token(Uuid::new_v4(), SystemTime::now(), &security).is_err());

        security.token_ttl = Duration::from_secs(i64::MAX as u64);
        assert!(mint_access_token(Uuid::new_v4(), SystemTime::now(), &security).is_err());
    }

    #[test]
    fn missing_exp_is_rejected() {
        let payload = serde_json::json!({ "accountId": Uuid::new_v4(), "iat": now_secs() });
        let token = hs256_token(&payload, "exp-secret");
        assert_eq!(
            verify_access_token(&token, &security("exp-secret")),
            Err(TokenError::InvalidToken(TokenRejection::MissingClaim))
        );
    }

    #[test]
    fn token_error_converts_to_app_error() {
        let e: AppError = TokenError::InvalidClaims.into();
        assert!(matches!(e, AppError::InvalidClaims));
        let e: AppError = TokenError::InvalidToken(TokenRejection::Expired).into();
        assert!(matches!(e, AppError::InvalidToken(TokenRejection::Expired)));
    }
}
