// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use gobarber_client::error::AppError;
use gobarber_client::models::{
    Appointment, AppointmentParty, ForgotPasswordRequest, MonthAvailabilityEntry, ProfileUpdate,
    Provider, ResetPasswordRequest, SessionResponse, SignInCredentials, SignUpRequest, User,
};
use gobarber_client::services::BarberApi;
use gobarber_client::store::{keys, CredentialStore, MemoryCredentialStore};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::oneshot;

/// Scriptable in-process API used instead of HTTP.
///
/// Appointment and availability requests can be held on a gate until the
/// test releases them, to control response ordering.
#[derive(Default)]
#[allow(dead_code)]
pub struct StubApi {
    pub accounts: Mutex<HashMap<String, (String, SessionResponse)>>,
    pub appointments: Mutex<HashMap<NaiveDate, Vec<Appointment>>>,
    pub availability: Mutex<HashMap<(i32, u32), Vec<MonthAvailabilityEntry>>>,
    pub failing_days: Mutex<Vec<NaiveDate>>,
    pub appointment_gates: Mutex<HashMap<NaiveDate, oneshot::Receiver<()>>>,
    pub availability_gates: Mutex<HashMap<(i32, u32), oneshot::Receiver<()>>>,
    pub profile_reply: Mutex<Option<User>>,
    pub profile_gate: Mutex<Option<oneshot::Receiver<()>>>,
    /// Log of calls as "<endpoint> <args>" strings
    pub calls: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl StubApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, email: &str, password: &str, token: &str, user: User) -> Self {
        self.accounts.lock().unwrap().insert(
            email.to_string(),
            (
                password.to_string(),
                SessionResponse {
                    token: token.to_string(),
                    user,
                },
            ),
        );
        self
    }

    pub fn set_appointments(&self, date: NaiveDate, appointments: Vec<Appointment>) {
        self.appointments
            .lock()
            .unwrap()
            .insert(date, appointments);
    }

    pub fn set_availability(&self, year: i32, month: u32, entries: Vec<MonthAvailabilityEntry>) {
        self.availability
            .lock()
            .unwrap()
            .insert((year, month), entries);
    }

    pub fn fail_day(&self, date: NaiveDate) {
        self.failing_days.lock().unwrap().push(date);
    }

    /// Hold appointment requests for `date` until the returned sender fires.
    pub fn gate_appointments(&self, date: NaiveDate) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.appointment_gates.lock().unwrap().insert(date, rx);
        tx
    }

    pub fn gate_availability(&self, year: i32, month: u32) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.availability_gates
            .lock()
            .unwrap()
            .insert((year, month), rx);
        tx
    }

    /// Hold the next profile or avatar update until the returned sender fires.
    pub fn gate_profile(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.profile_gate.lock().unwrap() = Some(rx);
        tx
    }

    async fn wait_profile_gate(&self) {
        let gate = self.profile_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl BarberApi for StubApi {
    async fn create_session(
        &self,
        credentials: &SignInCredentials,
    ) -> Result<SessionResponse, AppError> {
        self.record(format!("create_session {}", credentials.email));
        let accounts = self.accounts.lock().unwrap();
        match accounts.get(&credentials.email) {
            Some((password, response)) if *password == credentials.password => {
                Ok(response.clone())
            }
            _ => Err(AppError::AuthenticationFailed),
        }
    }

    async fn month_availability(
        &self,
        token: &str,
        provider_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<MonthAvailabilityEntry>, AppError> {
        self.record(format!(
            "month_availability {} {} {}-{:02}",
            token, provider_id, year, month
        ));
        let gate = self.availability_gates.lock().unwrap().remove(&(year, month));
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        Ok(self
            .availability
            .lock()
            .unwrap()
            .get(&(year, month))
            .cloned()
            .unwrap_or_default())
    }

    async fn my_appointments(
        &self,
        token: &str,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, AppError> {
        self.record(format!("my_appointments {} {}", token, date));
        let gate = self.appointment_gates.lock().unwrap().remove(&date);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if self.failing_days.lock().unwrap().contains(&date) {
            return Err(AppError::NetworkFailure("connection reset".to_string()));
        }
        Ok(self
            .appointments
            .lock()
            .unwrap()
            .get(&date)
            .cloned()
            .unwrap_or_default())
    }

    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<User, AppError> {
        self.record(format!("update_profile {} {}", token, update.email));
        self.wait_profile_gate().await;
        self.profile_reply
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| AppError::NetworkFailure("HTTP 400 Bad Request".to_string()))
    }

    async fn update_avatar(
        &self,
        token: &str,
        file_name: &str,
        _bytes: Vec<u8>,
    ) -> Result<User, AppError> {
        self.record(format!("update_avatar {} {}", token, file_name));
        self.wait_profile_gate().await;
        self.profile_reply
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| AppError::NetworkFailure("HTTP 400 Bad Request".to_string()))
    }

    async fn list_providers(&self, token: &str) -> Result<Vec<Provider>, AppError> {
        self.record(format!("list_providers {}", token));
        Ok(vec![Provider {
            id: "p1".to_string(),
            name: "Barber One".to_string(),
            avatar_url: None,
        }])
    }

    async fn create_user(&self, request: &SignUpRequest) -> Result<User, AppError> {
        self.record(format!("create_user {}", request.email));
        Ok(User {
            id: "new".to_string(),
            name: request.name.clone(),
            email: request.email.clone(),
            avatar_url: None,
        })
    }

    async fn forgot_password(&self, request: &ForgotPasswordRequest) -> Result<(), AppError> {
        self.record(format!("forgot_password {}", request.email));
        Ok(())
    }

    async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<(), AppError> {
        self.record(format!("reset_password {}", request.token));
        Ok(())
    }
}

#[allow(dead_code)]
pub fn user(id: &str, name: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        avatar_url: None,
    }
}

#[allow(dead_code)]
pub fn appointment(id: &str, rfc3339: &str, client: &str) -> Appointment {
    Appointment {
        id: id.to_string(),
        date: DateTime::parse_from_rfc3339(rfc3339).expect("valid timestamp"),
        user: AppointmentParty {
            name: client.to_string(),
            avatar_url: None,
        },
    }
}

#[allow(dead_code)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Store already holding a session for `user`.
#[allow(dead_code)]
pub fn signed_in_store(token: &str, user: &User) -> MemoryCredentialStore {
    let raw_user = serde_json::to_string(user).unwrap();
    MemoryCredentialStore::with_entries([(keys::TOKEN, token), (keys::USER, raw_user.as_str())])
}

/// In-memory store whose writes to one key can be made to fail.
#[derive(Default)]
#[allow(dead_code)]
pub struct FailingStore {
    pub inner: MemoryCredentialStore,
    pub failing_key: Mutex<Option<&'static str>>,
}

#[allow(dead_code)]
impl FailingStore {
    pub fn wrapping(inner: MemoryCredentialStore) -> Self {
        Self {
            inner,
            failing_key: Mutex::new(None),
        }
    }

    pub fn fail_writes_to(&self, key: &'static str) {
        *self.failing_key.lock().unwrap() = Some(key);
    }
}

impl CredentialStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        if *self.failing_key.lock().unwrap() == Some(key) {
            return Err(AppError::Storage("disk full".to_string()));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        self.inner.remove(key)
    }
}
