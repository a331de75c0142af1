// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Appointment model as returned by `GET /appointments/me`.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// An appointment on the provider's calendar. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    /// Start time (RFC 3339, offset preserved as sent by the server)
    pub date: DateTime<FixedOffset>,
    /// The client who booked the appointment
    pub user: AppointmentParty,
}

/// The other party of an appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentParty {
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}
