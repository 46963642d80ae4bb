//! Wire types shared with the backend.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Authority granting full administrative access.
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";
/// Authority every signed-in user holds.
pub const ROLE_USER: &str = "ROLE_USER";

/// The authenticated user's account as returned by `GET /api/account`.
///
/// Treated as an immutable value: re-authentication replaces the whole
/// record, nothing mutates it in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Login name; the stable identifier for the user.
    pub login: String,
    /// Whether the account has completed activation.
    #[serde(default)]
    pub activated: bool,
    /// Granted authority tokens (e.g. `ROLE_ADMIN`).
    #[serde(default)]
    pub authorities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Avatar image URL, if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Preferred UI language key (e.g. `"en"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang_key: Option<String>,
}

impl Identity {
    /// True if the account holds the given authority.
    #[must_use]
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }
}
