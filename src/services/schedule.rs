// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Schedule view-model for the provider dashboard.
//!
//! Turns the selected day/month and the API's availability and appointment
//! data into what a calendar view renders:
//! - disabled days of the displayed month
//! - the day's appointments split into morning and afternoon
//! - the next upcoming appointment
//!
//! Each fetch kind carries a generation counter. A response is applied only
//! if its generation is still the latest for that kind, its input (month or
//! day) is still selected, and the session it was issued under is still
//! active. Anything else is dropped silently.

use crate::error::AppError;
use crate::models::{Appointment, MonthAvailabilityEntry, Session};
use crate::services::api::BarberApi;
use crate::time_utils;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike, Utc, Weekday};
use std::sync::Arc;
use tokio::sync::watch;

/// Appointments starting at or after this local hour are "afternoon".
pub const AFTERNOON_STARTS_AT_HOUR: u32 = 12;

/// An appointment with its display-time fields computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledAppointment {
    pub appointment: Appointment,
    /// Start time at the display offset
    pub local_time: DateTime<FixedOffset>,
    /// `HH:MM` at the display offset
    pub formatted_hour: String,
}

impl ScheduledAppointment {
    pub fn new(appointment: Appointment, offset: FixedOffset) -> Self {
        let local_time = appointment.date.with_timezone(&offset);
        Self {
            formatted_hour: time_utils::format_hour(&local_time),
            local_time,
            appointment,
        }
    }

    pub fn is_morning(&self) -> bool {
        self.local_time.hour() < AFTERNOON_STARTS_AT_HOUR
    }
}

/// Local calendar selection. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleSelection {
    pub selected_date: NaiveDate,
    /// Always the first day of the displayed month
    pub current_month: NaiveDate,
}

impl ScheduleSelection {
    pub fn starting_on(today: NaiveDate) -> Self {
        Self {
            selected_date: today,
            current_month: time_utils::first_of_month(today),
        }
    }
}

/// Whether a fetched response was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// The input changed or the session ended while the request was in flight.
    Superseded,
}

/// View-model state published to subscribers.
#[derive(Debug, Clone)]
pub struct ScheduleState {
    selection: ScheduleSelection,
    /// User the fetched data belongs to
    owner: Option<String>,
    month_availability: Vec<MonthAvailabilityEntry>,
    disabled_days: Vec<NaiveDate>,
    appointments: Vec<ScheduledAppointment>,
    morning: Vec<ScheduledAppointment>,
    afternoon: Vec<ScheduledAppointment>,
    availability_generation: u64,
    appointments_generation: u64,
}

impl ScheduleState {
    fn new(selection: ScheduleSelection, owner: Option<String>) -> Self {
        Self {
            selection,
            owner,
            month_availability: Vec::new(),
            disabled_days: Vec::new(),
            appointments: Vec::new(),
            morning: Vec::new(),
            afternoon: Vec::new(),
            availability_generation: 0,
            appointments_generation: 0,
        }
    }

    pub fn selection(&self) -> ScheduleSelection {
        self.selection
    }

    pub fn month_availability(&self) -> &[MonthAvailabilityEntry] {
        &self.month_availability
    }

    pub fn disabled_days(&self) -> &[NaiveDate] {
        &self.disabled_days
    }

    pub fn appointments(&self) -> &[ScheduledAppointment] {
        &self.appointments
    }

    pub fn morning(&self) -> &[ScheduledAppointment] {
        &self.morning
    }

    pub fn afternoon(&self) -> &[ScheduledAppointment] {
        &self.afternoon
    }

    /// First appointment in list order that starts after `now`.
    pub fn next_appointment(&self, now: DateTime<Utc>) -> Option<&ScheduledAppointment> {
        find_next_appointment(&self.appointments, now)
    }

    fn set_availability(&mut self, entries: Vec<MonthAvailabilityEntry>) {
        self.disabled_days = disabled_days(&entries, self.selection.current_month);
        self.month_availability = entries;
    }

    fn set_appointments(&mut self, appointments: Vec<ScheduledAppointment>) {
        let (morning, afternoon) = partition_by_period(&appointments);
        self.morning = morning;
        self.afternoon = afternoon;
        self.appointments = appointments;
    }

    fn clear_data(&mut self) {
        self.month_availability.clear();
        self.disabled_days.clear();
        self.appointments.clear();
        self.morning.clear();
        self.afternoon.clear();
    }
}

// ─── Derivations ─────────────────────────────────────────────

/// Map unavailable entries to concrete dates of `month`.
///
/// Days that do not exist in the month (e.g. 31 in April) are skipped.
pub fn disabled_days(entries: &[MonthAvailabilityEntry], month: NaiveDate) -> Vec<NaiveDate> {
    entries
        .iter()
        .filter(|entry| !entry.available)
        .filter_map(|entry| {
            let date = NaiveDate::from_ymd_opt(month.year(), month.month(), entry.day);
            if date.is_none() {
                tracing::warn!(
                    day = entry.day,
                    year = month.year(),
                    month = month.month(),
                    "Availability entry outside month, ignoring"
                );
            }
            date
        })
        .collect()
}

/// Attach display-time fields, keeping the server's order.
pub fn schedule_appointments(
    appointments: Vec<Appointment>,
    offset: FixedOffset,
) -> Vec<ScheduledAppointment> {
    appointments
        .into_iter()
        .map(|appointment| ScheduledAppointment::new(appointment, offset))
        .collect()
}

/// Split into (morning, afternoon), each in list order.
pub fn partition_by_period(
    appointments: &[ScheduledAppointment],
) -> (Vec<ScheduledAppointment>, Vec<ScheduledAppointment>) {
    appointments.iter().cloned().partition(|a| a.is_morning())
}

/// First appointment in list order strictly after `now`.
///
/// The list is not re-sorted: if the server does not return appointments in
/// ascending order, this is the first qualifying item, not necessarily the
/// nearest one.
pub fn find_next_appointment(
    appointments: &[ScheduledAppointment],
    now: DateTime<Utc>,
) -> Option<&ScheduledAppointment> {
    appointments
        .iter()
        .find(|a| a.appointment.date.with_timezone(&Utc) > now)
}

/// Monday through Friday.
pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

// ─── View-model ──────────────────────────────────────────────

/// Schedule view-model bound to one session.
pub struct ScheduleViewModel {
    api: Arc<dyn BarberApi>,
    session: watch::Receiver<Session>,
    offset: FixedOffset,
    /// The calendar never goes back past the month it opened on
    earliest_month: NaiveDate,
    state: watch::Sender<ScheduleState>,
}

impl ScheduleViewModel {
    /// Create a view-model with today selected.
    pub fn new(
        api: Arc<dyn BarberApi>,
        session: watch::Receiver<Session>,
        offset: FixedOffset,
    ) -> Self {
        Self::with_today(api, session, offset, time_utils::today_at(offset))
    }

    /// Create a view-model with `today` as the initial selection.
    pub fn with_today(
        api: Arc<dyn BarberApi>,
        session: watch::Receiver<Session>,
        offset: FixedOffset,
        today: NaiveDate,
    ) -> Self {
        let owner = session.borrow().user().map(|u| u.id.clone());
        let (state, _) = watch::channel(ScheduleState::new(
            ScheduleSelection::starting_on(today),
            owner,
        ));

        Self {
            api,
            session,
            offset,
            earliest_month: time_utils::first_of_month(today),
            state,
        }
    }

    /// Receiver that yields every state change.
    pub fn subscribe(&self) -> watch::Receiver<ScheduleState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ScheduleState {
        self.state.borrow().clone()
    }

    pub fn selection(&self) -> ScheduleSelection {
        self.state.borrow().selection
    }

    pub fn month_availability(&self) -> Vec<MonthAvailabilityEntry> {
        self.state.borrow().month_availability.clone()
    }

    pub fn disabled_days(&self) -> Vec<NaiveDate> {
        self.state.borrow().disabled_days.clone()
    }

    pub fn appointments(&self) -> Vec<ScheduledAppointment> {
        self.state.borrow().appointments.clone()
    }

    pub fn morning_appointments(&self) -> Vec<ScheduledAppointment> {
        self.state.borrow().morning.clone()
    }

    pub fn afternoon_appointments(&self) -> Vec<ScheduledAppointment> {
        self.state.borrow().afternoon.clone()
    }

    /// Next upcoming appointment as of the wall clock.
    pub fn next_appointment(&self) -> Option<ScheduledAppointment> {
        self.next_appointment_at(Utc::now())
    }

    pub fn next_appointment_at(&self, now: DateTime<Utc>) -> Option<ScheduledAppointment> {
        self.state.borrow().next_appointment(now).cloned()
    }

    pub fn selection_is_today(&self) -> bool {
        self.selection().selected_date == time_utils::today_at(self.offset)
    }

    /// Next appointment, shown only while the selected day is today.
    pub fn todays_next_appointment(&self) -> Option<ScheduledAppointment> {
        self.todays_next_appointment_at(Utc::now())
    }

    pub fn todays_next_appointment_at(&self, now: DateTime<Utc>) -> Option<ScheduledAppointment> {
        let today = now.with_timezone(&self.offset).date_naive();
        let state = self.state.borrow();
        if state.selection.selected_date != today {
            return None;
        }
        state.next_appointment(now).cloned()
    }

    // ─── Selection ───────────────────────────────────────────

    /// Select a day. Returns whether the selection changed.
    ///
    /// A change supersedes any appointment fetch still in flight.
    pub fn select_date(&self, date: NaiveDate) -> bool {
        self.state.send_if_modified(|s| {
            if s.selection.selected_date == date {
                return false;
            }
            s.selection.selected_date = date;
            s.appointments_generation += 1;
            true
        })
    }

    /// Select a day the way the calendar does: only bookable weekdays are
    /// accepted. Returns whether the day was accepted.
    pub fn pick_day(&self, date: NaiveDate) -> bool {
        let disabled = self.state.borrow().disabled_days.contains(&date);
        if !is_weekday(date) || disabled {
            tracing::debug!(%date, "Day not selectable");
            return false;
        }
        self.select_date(date);
        true
    }

    /// Display another month (any day of it). Returns whether it changed.
    ///
    /// Months before the current one are clamped to the current month.
    /// Disabled days are re-derived right away from the entries on hand;
    /// a month availability fetch still in flight is superseded.
    pub fn change_month(&self, month: NaiveDate) -> bool {
        let requested = time_utils::first_of_month(month);
        let month = requested.max(self.earliest_month);
        if month != requested {
            tracing::debug!(%requested, earliest = %month, "Month before current one, clamping");
        }
        self.state.send_if_modified(|s| {
            if s.selection.current_month == month {
                return false;
            }
            s.selection.current_month = month;
            s.availability_generation += 1;
            s.disabled_days = disabled_days(&s.month_availability, month);
            true
        })
    }

    // ─── Fetches ─────────────────────────────────────────────

    /// Fetch availability for the displayed month of the signed-in provider.
    pub async fn refresh_month_availability(&self) -> Result<FetchOutcome, AppError> {
        let (token, user_id) = self.identity()?;

        let mut generation = 0;
        let mut month = self.selection().current_month;
        self.state.send_if_modified(|s| {
            s.availability_generation += 1;
            generation = s.availability_generation;
            month = s.selection.current_month;
            false
        });

        tracing::debug!(
            user_id = %user_id,
            generation,
            year = month.year(),
            month = month.month(),
            "Fetching month availability"
        );

        let result = self
            .api
            .month_availability(&token, &user_id, month.year(), month.month())
            .await;
        let session_current = self.session_matches(&token);

        let entries = match result {
            Ok(entries) => entries,
            Err(e) => {
                let current = session_current && {
                    let state = self.state.borrow();
                    state.availability_generation == generation
                        && state.selection.current_month == month
                };
                if !current {
                    tracing::debug!(generation, "Dropping failure of superseded availability fetch");
                    return Ok(FetchOutcome::Superseded);
                }
                tracing::warn!(error = %e, "Month availability fetch failed, keeping previous data");
                return Err(e);
            }
        };

        let applied = self.state.send_if_modified(|s| {
            if !session_current
                || s.availability_generation != generation
                || s.selection.current_month != month
            {
                return false;
            }
            s.owner = Some(user_id.clone());
            s.set_availability(entries);
            true
        });

        Ok(self.outcome(applied, "month availability", generation, || {
            self.state.borrow().availability_generation
        }))
    }

    /// Fetch appointments for the selected day.
    pub async fn refresh_appointments(&self) -> Result<FetchOutcome, AppError> {
        let (token, user_id) = self.identity()?;

        let mut generation = 0;
        let mut date = self.selection().selected_date;
        self.state.send_if_modified(|s| {
            s.appointments_generation += 1;
            generation = s.appointments_generation;
            date = s.selection.selected_date;
            false
        });

        tracing::debug!(%date, generation, "Fetching appointments");

        let result = self.api.my_appointments(&token, date).await;
        let session_current = self.session_matches(&token);

        let appointments = match result {
            Ok(appointments) => schedule_appointments(appointments, self.offset),
            Err(e) => {
                let current = session_current && {
                    let state = self.state.borrow();
                    state.appointments_generation == generation
                        && state.selection.selected_date == date
                };
                if !current {
                    tracing::debug!(generation, "Dropping failure of superseded appointments fetch");
                    return Ok(FetchOutcome::Superseded);
                }
                tracing::warn!(error = %e, %date, "Appointments fetch failed, keeping previous data");
                return Err(e);
            }
        };

        let applied = self.state.send_if_modified(|s| {
            if !session_current
                || s.appointments_generation != generation
                || s.selection.selected_date != date
            {
                return false;
            }
            s.owner = Some(user_id.clone());
            s.set_appointments(appointments);
            true
        });

        Ok(self.outcome(applied, "appointments", generation, || {
            self.state.borrow().appointments_generation
        }))
    }

    /// Run both fetches concurrently.
    pub async fn refresh(
        &self,
    ) -> (
        Result<FetchOutcome, AppError>,
        Result<FetchOutcome, AppError>,
    ) {
        tokio::join!(self.refresh_month_availability(), self.refresh_appointments())
    }

    // ─── Session tracking ────────────────────────────────────

    /// React to a session transition.
    ///
    /// When the identity changes (sign-out or another user) all derived data
    /// is cleared and every in-flight fetch is superseded.
    pub fn on_session_change(&self, session: &Session) {
        let owner = session.user().map(|u| u.id.clone());
        let changed = self.state.send_if_modified(|s| {
            if s.owner == owner {
                return false;
            }
            s.owner = owner;
            s.availability_generation += 1;
            s.appointments_generation += 1;
            s.clear_data();
            true
        });

        if changed {
            tracing::debug!("Session identity changed, schedule cleared");
        }
    }

    /// Apply session transitions until the session manager goes away.
    pub async fn follow_session(&self) {
        let mut session = self.session.clone();
        while session.changed().await.is_ok() {
            let current = session.borrow_and_update().clone();
            self.on_session_change(&current);
        }
    }

    fn identity(&self) -> Result<(String, String), AppError> {
        match &*self.session.borrow() {
            Session::Authenticated { token, user } => Ok((token.clone(), user.id.clone())),
            Session::Unauthenticated => Err(AppError::SessionInvalid),
        }
    }

    fn session_matches(&self, token: &str) -> bool {
        self.session.borrow().token() == Some(token)
    }

    fn outcome(
        &self,
        applied: bool,
        kind: &'static str,
        generation: u64,
        latest: impl FnOnce() -> u64,
    ) -> FetchOutcome {
        if applied {
            tracing::debug!(kind, generation, "Fetch applied");
            FetchOutcome::Applied
        } else {
            tracing::debug!(
                kind,
                generation,
                latest_generation = latest(),
                "Dropping superseded response"
            );
            FetchOutcome::Superseded
        }
    }
}
