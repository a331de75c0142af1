// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - client logic layer.

pub mod account;
pub mod api;
pub mod schedule;
pub mod session;

pub use account::AccountService;
pub use api::{ApiClient, BarberApi};
pub use schedule::{FetchOutcome, ScheduleViewModel, ScheduledAppointment};
pub use session::SessionManager;
