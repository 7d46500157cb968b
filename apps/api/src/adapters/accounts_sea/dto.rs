//! DTOs for accounts_sea adapter.

use uuid::Uuid;

/// DTO for inserting a new account row.
#[derive(Debug, Clone)]
pub struct AccountCreate {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password_hash: String,
    pub number: i64,
}

impl AccountCreate {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        username: impl Into<String>,
        password_hash: impl Into<String>,
        number: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            username: username.into(),
            password_hash: password_hash.into(),
            number,
        }
    }

    /// Use a caller-chosen id instead of a fresh v4.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

/// DTO for renaming an account.
#[derive(Debug, Clone)]
pub struct AccountNamesUpdate {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
}
