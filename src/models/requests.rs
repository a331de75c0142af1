// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request payloads sent to the API.
//!
//! Every payload is validated locally before a request is issued; a failed
//! check surfaces as `AppError::ValidationFailure` and nothing is sent.

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationError};

/// Minimum length for a new password.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Credentials for `POST /sessions`.
#[derive(Clone, Serialize, Validate)]
pub struct SignInCredentials {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl SignInCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for SignInCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignInCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Response body of `POST /sessions`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: super::User,
}

/// Account creation (`POST /users`).
#[derive(Clone, Serialize, Validate)]
pub struct SignUpRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

/// Password recovery e-mail (`POST /password/forgot`).
#[derive(Debug, Clone, Serialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email)]
    pub email: String,
}

/// Password reset with the token from the recovery e-mail
/// (`POST /password/reset`).
#[derive(Clone, Serialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(must_match(other = "password"))]
    pub password_confirmation: String,
    #[validate(length(min = 1))]
    pub token: String,
}

impl ResetPasswordRequest {
    /// Build a request from the link's query string (`?token=...`) or a bare token.
    pub fn from_link(
        link_query: &str,
        password: impl Into<String>,
        password_confirmation: impl Into<String>,
    ) -> Self {
        let token = link_query
            .trim_start_matches('?')
            .split('&')
            .find_map(|pair| pair.strip_prefix("token="))
            .unwrap_or(link_query)
            .to_string();

        Self {
            password: password.into(),
            password_confirmation: password_confirmation.into(),
            token,
        }
    }
}

/// Profile update (`PUT /profile`).
///
/// Password fields are only sent when `old_password` is non-empty.
#[derive(Clone, Default, Serialize, Validate)]
#[validate(schema(function = "validate_password_change"))]
pub struct ProfileUpdate {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_confirmation: Option<String>,
}

impl ProfileUpdate {
    pub fn changes_password(&self) -> bool {
        self.old_password.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// Payload as it goes on the wire.
    pub fn into_payload(mut self) -> Self {
        if !self.changes_password() {
            self.old_password = None;
            self.password = None;
            self.password_confirmation = None;
        }
        self
    }
}

impl fmt::Debug for ProfileUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = |p: &Option<String>| p.as_ref().map(|_| "<redacted>");
        f.debug_struct("ProfileUpdate")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("old_password", &redacted(&self.old_password))
            .field("password", &redacted(&self.password))
            .field("password_confirmation", &redacted(&self.password_confirmation))
            .finish()
    }
}

fn validate_password_change(update: &ProfileUpdate) -> Result<(), ValidationError> {
    if !update.changes_password() {
        return Ok(());
    }

    let password = update.password.as_deref().unwrap_or_default();
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::new("password_too_short"));
    }
    if update.password_confirmation.as_deref() != Some(password) {
        return Err(ValidationError::new("password_confirmation_mismatch"));
    }
    Ok(())
}
