// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! GoBarber client: session lifecycle, route guarding and the provider's
//! schedule view-model, on top of the GoBarber HTTP API.
//!
//! Rendering is left to the caller; this crate exposes the current session,
//! the guard's decision per navigation, and the derived schedule facts.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod time_utils;

use config::Config;
use error::AppError;
use models::Provider;
use routes::Navigator;
use services::{AccountService, ApiClient, BarberApi, ScheduleViewModel, SessionManager};
use std::sync::Arc;
use store::{CredentialStore, FileCredentialStore};

/// Shared client state.
///
/// The session manager is the only owner of the session; the navigator and
/// schedule view-models are handed a subscription to it.
pub struct Client {
    pub config: Config,
    pub session: Arc<SessionManager>,
    pub accounts: AccountService,
    api: Arc<dyn BarberApi>,
}

impl Client {
    /// Build a client talking HTTP to `config.api_url` and persisting the
    /// session to `config.credentials_path`.
    pub fn from_config(config: Config) -> Result<Self, AppError> {
        let api = Arc::new(ApiClient::new(&config.api_url, config.http_timeout)?);
        let store = Arc::new(FileCredentialStore::open(config.credentials_path.clone())?);
        Ok(Self::with_parts(config, api, store))
    }

    /// Build a client from explicit collaborators.
    pub fn with_parts(
        config: Config,
        api: Arc<dyn BarberApi>,
        store: Arc<dyn CredentialStore>,
    ) -> Self {
        let session = Arc::new(SessionManager::new(api.clone(), store));
        let accounts = AccountService::new(api.clone());

        Self {
            config,
            session,
            accounts,
            api,
        }
    }

    /// Navigator starting at `initial_path`.
    pub fn navigator(&self, initial_path: &str) -> Navigator {
        Navigator::new(initial_path, self.session.subscribe())
    }

    /// Schedule view-model for the signed-in provider, with today selected.
    pub fn schedule(&self) -> ScheduleViewModel {
        ScheduleViewModel::new(
            self.api.clone(),
            self.session.subscribe(),
            self.config.utc_offset,
        )
    }

    /// List the providers (barbers) visible to the signed-in user.
    pub async fn providers(&self) -> Result<Vec<Provider>, AppError> {
        let token = self.session.token().ok_or(AppError::SessionInvalid)?;
        self.api.list_providers(&token).await
    }
}
