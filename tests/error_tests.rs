// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use gobarber_client::error::AppError;
use gobarber_client::models::{ProfileUpdate, SignInCredentials};
use validator::Validate;

#[test]
fn test_only_network_failures_are_retryable() {
    assert!(AppError::NetworkFailure("timed out".to_string()).is_retryable());

    assert!(!AppError::AuthenticationFailed.is_retryable());
    assert!(!AppError::SessionInvalid.is_retryable());
    assert!(!AppError::ValidationFailure("email".to_string()).is_retryable());
    assert!(!AppError::Storage("disk full".to_string()).is_retryable());
}

#[test]
fn test_user_facing_errors() {
    assert!(AppError::AuthenticationFailed.is_user_facing());
    assert!(AppError::ValidationFailure("email".to_string()).is_user_facing());
    assert!(AppError::NetworkFailure("HTTP 500".to_string()).is_user_facing());

    assert!(!AppError::SessionInvalid.is_user_facing());
    assert!(!AppError::Internal(anyhow::anyhow!("bug")).is_user_facing());
}

#[test]
fn test_validation_errors_name_fields() {
    let err: AppError = SignInCredentials::new("not-an-email", "")
        .validate()
        .unwrap_err()
        .into();

    match err {
        AppError::ValidationFailure(fields) => assert_eq!(fields, "email, password"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_struct_level_validation_uses_code() {
    let update = ProfileUpdate {
        name: "Ana".to_string(),
        email: "ana@example.com".to_string(),
        old_password: Some("old-secret".to_string()),
        password: Some("123".to_string()),
        password_confirmation: Some("123".to_string()),
    };

    let err: AppError = update.validate().unwrap_err().into();
    assert!(matches!(err, AppError::ValidationFailure(ref code) if code == "password_too_short"));
}

#[test]
fn test_error_messages() {
    assert_eq!(
        AppError::AuthenticationFailed.to_string(),
        "Authentication failed: invalid e-mail or password"
    );
    assert_eq!(
        AppError::NetworkFailure("HTTP 502 Bad Gateway".to_string()).to_string(),
        "Network failure: HTTP 502 Bad Gateway"
    );
}
