use chrono::NaiveDateTime;
use serde::Serialize;

/// Administrator allowed to manage the catalog.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AdminUser {
    pub id: i32,
    pub email: String,
    /// Argon2 PHC string; never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewAdminUser {
    pub email: String,
    pub password_hash: String,
}

impl NewAdminUser {
    #[must_use]
    pub fn new(email: &str, password_hash: String) -> Self {
        Self {
            email: email.trim().to_lowercase(),
            password_hash,
        }
    }
}
