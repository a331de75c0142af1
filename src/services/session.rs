// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session lifecycle manager.
//!
//! Owns the in-memory session, hydrates it from the credential store at
//! construction, and publishes every transition on a watch channel so the
//! route guard and the schedule view-model always read the latest value.

use crate::error::AppError;
use crate::models::{ProfileUpdate, Session, SignInCredentials, User};
use crate::services::api::BarberApi;
use crate::store::{keys, CredentialStore};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use validator::Validate;

/// Session manager: the only writer of the shared `Session`.
pub struct SessionManager {
    api: Arc<dyn BarberApi>,
    store: Arc<dyn CredentialStore>,
    session: watch::Sender<Session>,
    /// Serializes sign-in so store and memory writes never interleave.
    sign_in_lock: Mutex<()>,
}

impl SessionManager {
    /// Create a manager, hydrating the initial session from `store`.
    pub fn new(api: Arc<dyn BarberApi>, store: Arc<dyn CredentialStore>) -> Self {
        let initial = Self::hydrate(store.as_ref());
        let (session, _) = watch::channel(initial);

        Self {
            api,
            store,
            session,
            sign_in_lock: Mutex::new(()),
        }
    }

    /// Rebuild a session from persisted entries.
    ///
    /// Authenticated only when both entries exist and the user record
    /// deserializes. The token is trusted as-is; the API rejects it later if
    /// it has expired.
    pub fn hydrate(store: &dyn CredentialStore) -> Session {
        let entries = store
            .get(keys::TOKEN)
            .and_then(|token| Ok((token, store.get(keys::USER)?)));

        let (token, raw_user) = match entries {
            Ok((Some(token), Some(raw_user))) => (token, raw_user),
            Ok(_) => {
                tracing::debug!("No persisted session");
                return Session::Unauthenticated;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read credential store, starting signed out");
                return Session::Unauthenticated;
            }
        };

        match serde_json::from_str::<User>(&raw_user) {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "Session restored from credential store");
                Session::Authenticated { token, user }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Persisted user record is unreadable, starting signed out");
                Session::Unauthenticated
            }
        }
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> Session {
        self.session.borrow().clone()
    }

    /// Receiver that always yields the latest session.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.session.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.borrow().is_authenticated()
    }

    /// Current user, or `None` when signed out.
    pub fn current_user(&self) -> Option<User> {
        self.session.borrow().user().cloned()
    }

    pub fn token(&self) -> Option<String> {
        self.session.borrow().token().map(str::to_string)
    }

    /// Authenticate with e-mail and password.
    ///
    /// On success both store entries are written before the new session is
    /// published. On failure the session and the store are left unchanged.
    pub async fn sign_in(&self, credentials: SignInCredentials) -> Result<User, AppError> {
        credentials.validate()?;

        let _guard = self.sign_in_lock.lock().await;

        let response = match self.api.create_session(&credentials).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Sign-in failed");
                return Err(e);
            }
        };

        let raw_user = serialize_user(&response.user)?;
        let user = response.user.clone();

        // Store writes happen under the session's write lock so they never
        // interleave with a concurrent sign-out or profile update.
        let mut result = Ok(());
        self.session.send_if_modified(|session| {
            if let Err(e) = self.persist_session(&response.token, &raw_user) {
                result = Err(e);
                return false;
            }
            *session = Session::Authenticated {
                token: response.token,
                user: response.user,
            };
            true
        });

        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to persist session, sign-in abandoned");
            return Err(e);
        }

        tracing::info!(user_id = %user.id, "Signed in");
        Ok(user)
    }

    /// Replace the signed-in user's profile.
    ///
    /// Only the user half of the store is rewritten. Calling this while
    /// signed out is a caller bug and fails with `SessionInvalid`.
    pub fn update_user(&self, user: User) -> Result<(), AppError> {
        let Some(token) = self.token() else {
            tracing::error!("update_user called without an active session");
            return Err(AppError::SessionInvalid);
        };
        self.update_user_if(&token, user)
    }

    /// Replace the profile only if `token` is still the active session's.
    ///
    /// A reply to a request issued under an earlier session must never be
    /// paired with the token of the session that replaced it.
    fn update_user_if(&self, token: &str, user: User) -> Result<(), AppError> {
        let raw_user = serialize_user(&user)?;

        let mut result = Err(AppError::SessionInvalid);
        self.session.send_if_modified(|session| {
            let Session::Authenticated {
                token: active_token,
                user: current,
            } = session
            else {
                return false;
            };
            if active_token.as_str() != token {
                return false;
            }
            if let Err(e) = self.store.set(keys::USER, &raw_user) {
                result = Err(e);
                return false;
            }
            result = Ok(());
            if *current == user {
                return false;
            }
            *current = user.clone();
            true
        });

        match &result {
            Ok(()) => tracing::info!(user_id = %user.id, "User profile updated"),
            Err(AppError::SessionInvalid) => {
                tracing::warn!(user_id = %user.id, "Session changed, profile update dropped")
            }
            Err(e) => tracing::warn!(error = %e, "Failed to persist user profile"),
        }
        result
    }

    /// End the session. Safe to call when already signed out.
    ///
    /// The in-memory session is cleared even if the store cannot be; the
    /// store error is still returned.
    pub fn sign_out(&self) -> Result<(), AppError> {
        let mut result = Ok(());
        let was_signed_in = self.session.send_if_modified(|session| {
            let token_result = self.store.remove(keys::TOKEN);
            let user_result = self.store.remove(keys::USER);
            result = token_result.and(user_result);

            if session.is_authenticated() {
                *session = Session::Unauthenticated;
                true
            } else {
                false
            }
        });

        if was_signed_in {
            tracing::info!("Signed out");
        }
        result
    }

    /// Validate and submit a profile change, then adopt the returned user.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<User, AppError> {
        update.validate()?;

        let token = self.token().ok_or(AppError::SessionInvalid)?;
        let user = self.api.update_profile(&token, &update).await?;

        self.update_user_if(&token, user.clone())?;
        Ok(user)
    }

    /// Upload a new avatar, then adopt the returned user.
    pub async fn update_avatar(&self, file_name: &str, bytes: Vec<u8>) -> Result<User, AppError> {
        let token = self.token().ok_or(AppError::SessionInvalid)?;
        let user = self.api.update_avatar(&token, file_name, bytes).await?;

        self.update_user_if(&token, user.clone())?;
        Ok(user)
    }

    /// Write both entries, restoring the previous token if the user record
    /// cannot be written.
    fn persist_session(&self, token: &str, raw_user: &str) -> Result<(), AppError> {
        let previous_token = self.store.get(keys::TOKEN)?;
        self.store.set(keys::TOKEN, token)?;

        if let Err(e) = self.store.set(keys::USER, raw_user) {
            let restored = match previous_token {
                Some(previous) => self.store.set(keys::TOKEN, &previous),
                None => self.store.remove(keys::TOKEN),
            };
            if let Err(restore_err) = restored {
                tracing::error!(error = %restore_err, "Failed to restore previous token");
            }
            return Err(e);
        }
        Ok(())
    }
}

fn serialize_user(user: &User) -> Result<String, AppError> {
    serde_json::to_string(user)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize user: {}", e)))
}
