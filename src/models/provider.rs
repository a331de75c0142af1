//! Provider (barber) directory entry.

use serde::{Deserialize, Serialize};

/// A provider listed by `GET /providers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}
