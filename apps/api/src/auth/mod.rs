pub mod claims;
pub mod jwt;
pub mod password;

pub use claims::AccountClaims;
pub use jwt::{mint_access_token, verify_access_token, TokenError, TokenRejection};
pub use password::PasswordHasher;
