// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the client.

pub mod appointment;
pub mod availability;
pub mod provider;
pub mod requests;
pub mod session;
pub mod user;

pub use appointment::{Appointment, AppointmentParty};
pub use availability::MonthAvailabilityEntry;
pub use provider::Provider;
pub use requests::{
    ForgotPasswordRequest, ProfileUpdate, ResetPasswordRequest, SessionResponse,
    SignInCredentials, SignUpRequest,
};
pub use session::{Session, SessionState};
pub use user::User;
