//! User profile model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Role of a user in the community.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Resident,
    Staff,
    Admin,
}

impl UserType {
    fn rank(self) -> u8 {
        match self {
            UserType::Resident => 0,
            UserType::Staff => 1,
            UserType::Admin => 2,
        }
    }

    /// Whether this role grants at least the privileges of `required`.
    pub fn at_least(self, required: UserType) -> bool {
        self.rank() >= required.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UserType::Resident => "resident",
            UserType::Staff => "staff",
            UserType::Admin => "admin",
        }
    }
}

/// User profile stored in Firestore (document ID is `uid`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub uid: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(rename = "photoURL", default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Identity provider that authenticated this user (e.g. "password")
    #[serde(default)]
    pub provider_id: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    /// Created by an admin; linked to the first sign-in with this email
    #[serde(default)]
    pub pending_sign_in: bool,
    #[serde(rename = "user_type")]
    pub user_type: UserType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
