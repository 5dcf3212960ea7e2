//! User Models

use std::fmt;

use jiff::Timestamp;
use zeroize::Zeroize;

use crate::uuids::TypedUuid;

/// User UUID
pub type UserUuid = TypedUuid<User>;

/// User Model
///
/// The password hash never leaves the domain layer; HTTP responses are built
/// from the other fields only.
#[derive(Debug, Clone)]
pub struct User {
    pub uuid: UserUuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Plaintext password in transit between the HTTP layer and the hasher.
///
/// Wiped on drop and redacted in debug output.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    #[must_use]
    pub fn new(plaintext: String) -> Self {
        Self(plaintext)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(**redacted**)")
    }
}

impl Drop for Password {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// New User Model
#[derive(Debug, Clone)]
pub struct NewUser {
    pub uuid: UserUuid,
    pub name: String,
    pub email: String,
    pub password: Password,
    pub is_admin: bool,
}

/// User Update Model
///
/// `None` fields are left unchanged. `is_admin` is honoured only when the
/// caller is an admin; the service ignores it otherwise.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<Password>,
    pub is_admin: Option<bool>,
}
