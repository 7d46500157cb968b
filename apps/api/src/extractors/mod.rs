pub mod account_id;
pub mod authenticated;
pub mod validated_json;

pub use account_id::AccountId;
pub use authenticated::AuthenticatedAccount;
pub use validated_json::ValidatedJson;
