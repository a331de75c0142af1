// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types.
//!
//! Callers branch on the variant, never on the message text: local input
//! problems are `ValidationFailure`, remote problems are
//! `AuthenticationFailed` or `NetworkFailure`.

/// Application error type shared by every client component.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication failed: invalid e-mail or password")]
    AuthenticationFailed,

    #[error("No active session")]
    SessionInvalid,

    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Invalid input: {0}")]
    ValidationFailure(String),

    #[error("Credential store error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Whether repeating the same call later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::NetworkFailure(_))
    }

    /// Whether the error is meant for the person using the client, as opposed
    /// to a contract violation inside the calling code.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            AppError::AuthenticationFailed
                | AppError::NetworkFailure(_)
                | AppError::ValidationFailure(_)
        )
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Struct-level checks are reported under "__all__"; use their code instead.
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    if field == "__all__" {
                        e.code.to_string()
                    } else {
                        field.to_string()
                    }
                })
            })
            .collect();
        fields.sort();
        fields.dedup();

        AppError::ValidationFailure(fields.join(", "))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::NetworkFailure(err.to_string())
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, AppError>;
