// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GoBarber API client.
//!
//! Handles:
//! - Session creation (sign-in)
//! - Provider month availability and the provider's own appointments
//! - Profile and avatar updates
//! - Anonymous account flows (sign-up, password recovery)
//!
//! Every authenticated call carries the session token as a bearer credential.

use crate::error::AppError;
use crate::models::{
    Appointment, ForgotPasswordRequest, MonthAvailabilityEntry, ProfileUpdate, Provider,
    ResetPasswordRequest, SessionResponse, SignInCredentials, SignUpRequest, User,
};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Remote operations the client depends on.
///
/// `ApiClient` is the HTTP implementation; tests substitute their own.
#[async_trait]
pub trait BarberApi: Send + Sync {
    /// `POST /sessions`
    async fn create_session(
        &self,
        credentials: &SignInCredentials,
    ) -> Result<SessionResponse, AppError>;

    /// `GET /providers/{provider_id}/month-availability?year&month`
    async fn month_availability(
        &self,
        token: &str,
        provider_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<MonthAvailabilityEntry>, AppError>;

    /// `GET /appointments/me?year&month&day`
    async fn my_appointments(
        &self,
        token: &str,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, AppError>;

    /// `PUT /profile`
    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<User, AppError>;

    /// `PATCH /users/avatar` (multipart field `avatar`)
    async fn update_avatar(
        &self,
        token: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<User, AppError>;

    /// `GET /providers`
    async fn list_providers(&self, token: &str) -> Result<Vec<Provider>, AppError>;

    /// `POST /users`
    async fn create_user(&self, request: &SignUpRequest) -> Result<User, AppError>;

    /// `POST /password/forgot`
    async fn forgot_password(&self, request: &ForgotPasswordRequest) -> Result<(), AppError>;

    /// `POST /password/reset`
    async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<(), AppError>;
}

/// HTTP client for the GoBarber API.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the API at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check response status and return error if not successful.
    ///
    /// 401 means the bearer token was rejected; everything else that is not
    /// 2xx is reported as a network failure carrying the status and body.
    async fn check_response(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, AppError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().path().to_string();
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = %status, path = %url, "API request rejected");

        if status.as_u16() == 401 {
            return Err(AppError::SessionInvalid);
        }

        Err(AppError::NetworkFailure(format!("HTTP {}: {}", status, body)))
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        self.check_response(response)
            .await?
            .json()
            .await
            .map_err(|e| AppError::NetworkFailure(format!("JSON parse error: {}", e)))
    }

    /// Generic authenticated GET with query parameters and JSON response.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        self.check_response_json(response).await
    }
}

#[async_trait]
impl BarberApi for ApiClient {
    async fn create_session(
        &self,
        credentials: &SignInCredentials,
    ) -> Result<SessionResponse, AppError> {
        let response = self
            .http
            .post(self.url("/sessions"))
            .json(credentials)
            .send()
            .await?;

        // Bad credentials come back as 401 before any token exists.
        match self.check_response_json(response).await {
            Err(AppError::SessionInvalid) => Err(AppError::AuthenticationFailed),
            other => other,
        }
    }

    async fn month_availability(
        &self,
        token: &str,
        provider_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<MonthAvailabilityEntry>, AppError> {
        let path = format!(
            "/providers/{}/month-availability",
            urlencoding::encode(provider_id)
        );
        self.get_json(
            &path,
            token,
            &[("year", year.to_string()), ("month", month.to_string())],
        )
        .await
    }

    async fn my_appointments(
        &self,
        token: &str,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, AppError> {
        self.get_json(
            "/appointments/me",
            token,
            &[
                ("year", date.year().to_string()),
                ("month", date.month().to_string()),
                ("day", date.day().to_string()),
            ],
        )
        .await
    }

    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<User, AppError> {
        let payload = update.clone().into_payload();

        let response = self
            .http
            .put(self.url("/profile"))
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await?;

        self.check_response_json(response).await
    }

    async fn update_avatar(
        &self,
        token: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<User, AppError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("avatar", part);

        let response = self
            .http
            .patch(self.url("/users/avatar"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;

        self.check_response_json(response).await
    }

    async fn list_providers(&self, token: &str) -> Result<Vec<Provider>, AppError> {
        self.get_json("/providers", token, &[]).await
    }

    async fn create_user(&self, request: &SignUpRequest) -> Result<User, AppError> {
        let response = self
            .http
            .post(self.url("/users"))
            .json(request)
            .send()
            .await?;

        self.check_response_json(response).await
    }

    async fn forgot_password(&self, request: &ForgotPasswordRequest) -> Result<(), AppError> {
        let response = self
            .http
            .post(self.url("/password/forgot"))
            .json(request)
            .send()
            .await?;

        self.check_response(response).await?;
        Ok(())
    }

    async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<(), AppError> {
        let response = self
            .http
            .post(self.url("/password/reset"))
            .json(request)
            .send()
            .await?;

        self.check_response(response).await?;
        Ok(())
    }
}
