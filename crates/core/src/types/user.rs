//! Users and registration payloads.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

use super::id::UserId;

/// A user as returned by the login and registration endpoints.
///
/// The server echoes the stored password back; it is dropped on decode and
/// never kept in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    #[serde(default)]
    pub id: UserId,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    /// National ID number.
    #[serde(default)]
    pub tz: String,
}

impl User {
    /// The anonymous user held before login and after logout.
    #[must_use]
    pub fn guest() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn is_guest(&self) -> bool {
        self.id.is_zero()
    }
}

/// Login request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Credentials {
    pub user_name: String,
    #[serde(serialize_with = "expose_secret")]
    pub password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(user_name: impl Into<String>, password: SecretString) -> Self {
        Self {
            user_name: user_name.into(),
            password,
        }
    }
}

/// Registration request body.
///
/// Serializes to the server's shape: `{UserName, Name, Password, Phone,
/// Email, Tz}`. Validate with [`crate::validation::validate_registration`]
/// before sending.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Registration {
    pub user_name: String,
    pub name: String,
    #[serde(serialize_with = "expose_secret")]
    pub password: SecretString,
    pub phone: String,
    pub email: String,
    pub tz: String,
}

fn expose_secret<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}
