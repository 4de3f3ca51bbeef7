// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profiles, roles and account management.

use crate::db::{new_document_id, BookingQuery, FirestoreDb};
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{User, UserType};
use crate::services::filters::text_matches;
use crate::services::locks::{user_key, KeyedLocks};
use chrono::Utc;
use serde::Deserialize;
use validator::Validate;

/// Profile fields supplied by the client on sign-in.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignInProfile {
    /// Used only when the token carries no email claim
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 100))]
    pub display_name: Option<String>,
    #[serde(rename = "photoURL")]
    #[validate(length(max = 2048))]
    pub photo_url: Option<String>,
    #[validate(length(max = 32))]
    pub phone_number: Option<String>,
    pub provider_id: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
}

/// Fields a user may change on their own profile.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,
    #[serde(rename = "photoURL")]
    #[validate(length(max = 2048))]
    pub photo_url: Option<String>,
    #[validate(length(max = 32))]
    pub phone_number: Option<String>,
}

/// Admin request to create an account.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
    #[validate(length(max = 32))]
    pub phone_number: Option<String>,
    #[serde(rename = "user_type", default = "default_user_type")]
    pub user_type: UserType,
}

fn default_user_type() -> UserType {
    UserType::Resident
}

/// Apply the client-supplied sign-in fields that refresh on every sign-in.
fn refresh_profile(user: &mut User, profile: SignInProfile) {
    if profile.display_name.is_some() {
        user.display_name = profile.display_name;
    }
    if profile.photo_url.is_some() {
        user.photo_url = profile.photo_url;
    }
    user.email_verified |= profile.email_verified;
}

/// Admin user listing filters.
#[derive(Debug, Default, Deserialize)]
pub struct UserFilter {
    pub user_type: Option<UserType>,
    pub search: Option<String>,
}

/// Profile and role operations.
#[derive(Clone)]
pub struct UserService {
    db: FirestoreDb,
    locks: KeyedLocks,
    admin_emails: Vec<String>,
}

impl UserService {
    pub fn new(db: FirestoreDb, locks: KeyedLocks, admin_emails: Vec<String>) -> Self {
        Self {
            db,
            locks,
            admin_emails,
        }
    }

    /// Load the caller's profile and check they hold at least `role`.
    pub async fn require(&self, auth: &AuthUser, role: UserType) -> Result<User> {
        let user = self.db.get_user(&auth.uid).await?.ok_or_else(|| {
            AppError::Forbidden("No profile for this account; sign in first".to_string())
        })?;

        if !user.user_type.at_least(role) {
            tracing::warn!(
                uid = %auth.uid,
                role = user.user_type.as_str(),
                required = role.as_str(),
                "Blocked request with insufficient role"
            );
            return Err(AppError::Forbidden(format!(
                "Requires {} role",
                role.as_str()
            )));
        }

        Ok(user)
    }

    pub async fn get(&self, uid: &str) -> Result<User> {
        self.db
            .get_user(uid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", uid)))
    }

    /// Create the caller's profile on first sign-in, or refresh it afterwards.
    ///
    /// A profile an admin created for the token's email is moved to the
    /// caller's uid and keeps its role. Other new profiles are residents
    /// unless the token's email is a configured admin email. An existing
    /// profile keeps its role.
    pub async fn sync_profile(&self, auth: &AuthUser, profile: SignInProfile) -> Result<User> {
        profile.validate()?;
        let now = Utc::now();
        let _guard = self.locks.acquire(user_key(&auth.uid)).await;

        if let Some(mut user) = self.db.get_user(&auth.uid).await? {
            refresh_profile(&mut user, profile);
            user.updated_at = now;
            self.db.upsert_user(&user).await?;
            return Ok(user);
        }

        if let Some(mut user) = self.pending_account_for(auth).await? {
            let previous_uid = std::mem::replace(&mut user.uid, auth.uid.clone());
            let _previous_guard = self.locks.acquire(user_key(&previous_uid)).await;

            user.pending_sign_in = false;
            if user.phone_number.is_none() {
                user.phone_number = profile.phone_number.clone();
            }
            if profile.provider_id.is_some() {
                user.provider_id = profile.provider_id.clone();
            }
            refresh_profile(&mut user, profile);
            user.updated_at = now;

            self.db.upsert_user(&user).await?;
            self.db.delete_user(&previous_uid).await?;
            tracing::info!(
                uid = %user.uid,
                previous_uid = %previous_uid,
                role = user.user_type.as_str(),
                "Linked admin-created account on first sign-in"
            );
            return Ok(user);
        }

        let email = auth
            .email
            .clone()
            .or(profile.email)
            .map(|e| e.trim().to_ascii_lowercase())
            .ok_or_else(|| AppError::BadRequest("Email is required".to_string()))?;

        let is_bootstrap_admin = auth
            .email
            .as_deref()
            .is_some_and(|e| self.admin_emails.contains(&e.trim().to_ascii_lowercase()));

        let user = User {
            uid: auth.uid.clone(),
            email,
            display_name: profile.display_name,
            photo_url: profile.photo_url,
            phone_number: profile.phone_number,
            provider_id: profile.provider_id,
            email_verified: profile.email_verified,
            pending_sign_in: false,
            user_type: if is_bootstrap_admin {
                UserType::Admin
            } else {
                UserType::Resident
            },
            created_at: now,
            updated_at: now,
        };

        self.db.upsert_user(&user).await?;
        tracing::info!(
            uid = %user.uid,
            role = user.user_type.as_str(),
            "Created user profile on sign-in"
        );

        Ok(user)
    }

    /// An admin-created profile awaiting its first sign-in under the
    /// token's (provider-verified) email.
    async fn pending_account_for(&self, auth: &AuthUser) -> Result<Option<User>> {
        let Some(email) = auth.email.as_deref() else {
            return Ok(None);
        };
        let email = email.trim().to_ascii_lowercase();

        Ok(self
            .db
            .find_user_by_email(&email)
            .await?
            .filter(|u| u.pending_sign_in && u.uid != auth.uid))
    }

    pub async fn update_self(&self, uid: &str, update: ProfileUpdate) -> Result<User> {
        update.validate()?;
        let mut user = self.get(uid).await?;

        if let Some(name) = update.display_name {
            user.display_name = Some(name);
        }
        if let Some(photo) = update.photo_url {
            user.photo_url = Some(photo);
        }
        if let Some(phone) = update.phone_number {
            user.phone_number = Some(phone);
        }
        user.updated_at = Utc::now();

        self.db.upsert_user(&user).await?;
        Ok(user)
    }

    /// Create an account and its profile document.
    ///
    /// The profile is stored under a generated uid until its owner first
    /// signs in with the same email (see `sync_profile`).
    pub async fn create_account(&self, request: NewAccount) -> Result<User> {
        request.validate()?;
        let email = request.email.trim().to_ascii_lowercase();

        if self.db.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "An account for {} already exists",
                email
            )));
        }

        let now = Utc::now();
        let user = User {
            uid: new_document_id(),
            email,
            display_name: Some(request.display_name),
            photo_url: None,
            phone_number: request.phone_number,
            provider_id: Some("password".to_string()),
            email_verified: false,
            pending_sign_in: true,
            user_type: request.user_type,
            created_at: now,
            updated_at: now,
        };

        self.db.upsert_user(&user).await?;
        tracing::info!(
            uid = %user.uid,
            role = user.user_type.as_str(),
            "Account created"
        );

        Ok(user)
    }

    /// List users, sorted by display name then email.
    pub async fn list(&self, filter: &UserFilter) -> Result<Vec<User>> {
        let mut users = self.db.list_users(filter.user_type).await?;

        if let Some(search) = filter.search.as_deref() {
            users.retain(|u| {
                text_matches(
                    search,
                    [u.email.as_str(), u.display_name.as_deref().unwrap_or("")],
                )
            });
        }

        users.sort_by(|a, b| {
            a.display_name
                .cmp(&b.display_name)
                .then_with(|| a.email.cmp(&b.email))
        });
        Ok(users)
    }

    pub async fn set_role(&self, admin: &User, uid: &str, role: UserType) -> Result<User> {
        if admin.uid == uid && role != UserType::Admin {
            return Err(AppError::BadRequest(
                "Admins cannot remove their own admin role".to_string(),
            ));
        }

        let mut user = self.get(uid).await?;
        let previous = user.user_type;
        user.user_type = role;
        user.updated_at = Utc::now();
        self.db.upsert_user(&user).await?;

        tracing::info!(
            uid,
            admin = %admin.uid,
            from = previous.as_str(),
            to = role.as_str(),
            "User role changed"
        );

        Ok(user)
    }

    /// Remove a profile and the user's bookings. Returns bookings removed.
    pub async fn delete(&self, admin: &User, uid: &str) -> Result<usize> {
        if admin.uid == uid {
            return Err(AppError::BadRequest(
                "Admins cannot delete their own account".to_string(),
            ));
        }

        // Bookings for this user cannot be created while the lock is held.
        let _guard = self.locks.acquire(user_key(uid)).await;

        // Existence check so unknown IDs are reported
        self.get(uid).await?;

        let bookings_removed = self
            .db
            .delete_bookings(&BookingQuery {
                user_id: Some(uid.to_string()),
                ..Default::default()
            })
            .await?;
        self.db.delete_user(uid).await?;

        tracing::info!(uid, admin = %admin.uid, bookings_removed, "User deleted");
        Ok(bookings_removed)
    }
}
