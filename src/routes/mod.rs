// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application route table.
//!
//! Every view declares a policy on session state; the guard in
//! [`guard`] decides per navigation whether the view renders or redirects.

pub mod guard;

pub use guard::{GuardDecision, Navigator, RouteGuard};

use std::fmt::Display;

/// A route's requirement on session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutePolicy {
    /// Only signed-in users may render the view
    RequiresAuth,
    /// Only anonymous users may render the view (sign-in, sign-up, ...)
    RequiresAnonymous,
    /// Always admitted
    Any,
}

/// Application views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum AppRoute {
    /// Sign-in page (anonymous entry route)
    #[default]
    SignIn,
    SignUp,
    ForgotPassword,
    ResetPassword,
    /// Provider dashboard (default authenticated landing route)
    Dashboard,
    Profile,
    Providers,
    NotFound,
}

impl AppRoute {
    /// Parse a URL path (query string and trailing slash ignored).
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        match path {
            "/" | "/signin" => Self::SignIn,
            "/signup" => Self::SignUp,
            "/forgot-password" => Self::ForgotPassword,
            "/reset-password" => Self::ResetPassword,
            "/dashboard" => Self::Dashboard,
            "/profile" => Self::Profile,
            "/providers" => Self::Providers,
            _ => Self::NotFound,
        }
    }

    pub fn to_path(&self) -> &'static str {
        match self {
            Self::SignIn => "/",
            Self::SignUp => "/signup",
            Self::ForgotPassword => "/forgot-password",
            Self::ResetPassword => "/reset-password",
            Self::Dashboard => "/dashboard",
            Self::Profile => "/profile",
            Self::Providers => "/providers",
            Self::NotFound => "/404",
        }
    }

    pub fn policy(&self) -> RoutePolicy {
        match self {
            Self::SignIn | Self::SignUp | Self::ForgotPassword | Self::ResetPassword => {
                RoutePolicy::RequiresAnonymous
            }
            Self::Dashboard | Self::Profile | Self::Providers => RoutePolicy::RequiresAuth,
            Self::NotFound => RoutePolicy::Any,
        }
    }

    /// Where anonymous users land when they hit a protected route.
    pub fn anonymous_entry() -> Self {
        Self::SignIn
    }

    /// Where signed-in users land when they hit an anonymous-only route.
    pub fn authenticated_landing() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}
