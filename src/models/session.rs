// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session model: the authenticated identity held by the client.

use super::User;

/// Current session.
///
/// Token and user are carried by the same variant, so one can never be
/// present without the other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Unauthenticated,
    Authenticated { token: String, user: User },
}

/// Coarse session state, as seen by route policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
}

impl Session {
    pub fn state(&self) -> SessionState {
        match self {
            Session::Unauthenticated => SessionState::Unauthenticated,
            Session::Authenticated { .. } => SessionState::Authenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    /// Bearer token, if signed in.
    pub fn token(&self) -> Option<&str> {
        match self {
            Session::Authenticated { token, .. } => Some(token),
            Session::Unauthenticated => None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Authenticated { user, .. } => Some(user),
            Session::Unauthenticated => None,
        }
    }
}
