//! Anonymous account flows: sign-up and password recovery.
//!
//! None of these touch the session; a freshly created account still has to
//! sign in.

use crate::error::AppError;
use crate::models::{ForgotPasswordRequest, ResetPasswordRequest, SignUpRequest, User};
use crate::services::api::BarberApi;
use std::sync::Arc;
use validator::Validate;

#[derive(Clone)]
pub struct AccountService {
    api: Arc<dyn BarberApi>,
}

impl AccountService {
    pub fn new(api: Arc<dyn BarberApi>) -> Self {
        Self { api }
    }

    /// Create a new account.
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<User, AppError> {
        request.validate()?;

        let user = self.api.create_user(&request).await?;
        tracing::info!(user_id = %user.id, "Account created");
        Ok(user)
    }

    /// Ask the API to e-mail a password recovery link.
    pub async fn forgot_password(&self, request: ForgotPasswordRequest) -> Result<(), AppError> {
        request.validate()?;

        self.api.forgot_password(&request).await?;
        tracing::info!("Password recovery e-mail requested");
        Ok(())
    }

    /// Set a new password using the token from the recovery link.
    pub async fn reset_password(&self, request: ResetPasswordRequest) -> Result<(), AppError> {
        request.validate()?;

        self.api.reset_password(&request).await?;
        tracing::info!("Password reset");
        Ok(())
    }
}
