//! User profile model shared by the session and the API.

use serde::{Deserialize, Serialize};

/// Profile of the signed-in user, as returned by the API.
///
/// Replaced wholesale on sign-in and on profile updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID (also the provider ID used for availability queries)
    pub id: String,
    /// Display name
    pub name: String,
    /// E-mail address
    #[serde(default)]
    pub email: String,
    /// Avatar URL (absent until the user uploads one)
    #[serde(default)]
    pub avatar_url: Option<String>,
}
