// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route authorization guard.
//!
//! The guard itself is stateless: a decision depends only on the target
//! route's policy and the current session. `Navigator` applies it on every
//! navigation and again on every session transition, so a sign-out while a
//! protected view is mounted redirects immediately.

use super::{AppRoute, RoutePolicy};
use crate::models::{Session, SessionState};
use tokio::sync::watch;

/// Outcome of guarding one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the requested route
    Admit(AppRoute),
    /// Render `to` instead of `from`
    Redirect { from: AppRoute, to: AppRoute },
}

impl GuardDecision {
    /// The route that ends up rendered.
    pub fn destination(&self) -> AppRoute {
        match self {
            GuardDecision::Admit(route) => *route,
            GuardDecision::Redirect { to, .. } => *to,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, GuardDecision::Redirect { .. })
    }
}

/// Stateless admit-or-redirect check.
pub struct RouteGuard;

impl RouteGuard {
    pub fn evaluate(route: AppRoute, state: SessionState) -> GuardDecision {
        match (route.policy(), state) {
            (RoutePolicy::RequiresAuth, SessionState::Unauthenticated) => GuardDecision::Redirect {
                from: route,
                to: AppRoute::anonymous_entry(),
            },
            (RoutePolicy::RequiresAnonymous, SessionState::Authenticated) => {
                GuardDecision::Redirect {
                    from: route,
                    to: AppRoute::authenticated_landing(),
                }
            }
            _ => GuardDecision::Admit(route),
        }
    }
}

/// Tracks the rendered route and keeps it consistent with the session.
pub struct Navigator {
    current: AppRoute,
    session: watch::Receiver<Session>,
}

impl Navigator {
    /// Start at `initial_path`, guarded against the current session.
    pub fn new(initial_path: &str, session: watch::Receiver<Session>) -> Self {
        let mut navigator = Self {
            current: AppRoute::default(),
            session,
        };
        navigator.navigate(initial_path);
        navigator
    }

    /// Route currently rendered.
    pub fn current(&self) -> AppRoute {
        self.current
    }

    /// Navigate to a URL path.
    pub fn navigate(&mut self, path: &str) -> GuardDecision {
        self.navigate_to(AppRoute::from_path(path))
    }

    /// Navigate to a route, applying the guard.
    pub fn navigate_to(&mut self, target: AppRoute) -> GuardDecision {
        let state = self.session.borrow_and_update().state();
        let decision = RouteGuard::evaluate(target, state);

        if let GuardDecision::Redirect { from, to } = decision {
            tracing::info!(from = %from, to = %to, "Navigation redirected");
        }

        self.current = decision.destination();
        decision
    }

    /// Re-check the rendered route against the latest session.
    pub fn on_session_change(&mut self) -> GuardDecision {
        self.navigate_to(self.current)
    }

    /// Wait for the next session transition and re-check the rendered route.
    ///
    /// Returns `None` once the session manager has been dropped.
    pub async fn next_transition(&mut self) -> Option<GuardDecision> {
        self.session.changed().await.ok()?;
        Some(self.on_session_change())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_matrix() {
        use SessionState::{Authenticated, Unauthenticated};

        assert_eq!(
            RouteGuard::evaluate(AppRoute::Dashboard, Authenticated),
            GuardDecision::Admit(AppRoute::Dashboard)
        );
        assert_eq!(
            RouteGuard::evaluate(AppRoute::Dashboard, Unauthenticated),
            GuardDecision::Redirect {
                from: AppRoute::Dashboard,
                to: AppRoute::SignIn
            }
        );
        assert_eq!(
            RouteGuard::evaluate(AppRoute::SignUp, Authenticated),
            GuardDecision::Redirect {
                from: AppRoute::SignUp,
                to: AppRoute::Dashboard
            }
        );
        assert_eq!(
            RouteGuard::evaluate(AppRoute::SignIn, Unauthenticated),
            GuardDecision::Admit(AppRoute::SignIn)
        );
        assert_eq!(
            RouteGuard::evaluate(AppRoute::NotFound, Authenticated),
            GuardDecision::Admit(AppRoute::NotFound)
        );
        assert_eq!(
            RouteGuard::evaluate(AppRoute::NotFound, Unauthenticated),
            GuardDecision::Admit(AppRoute::NotFound)
        );
    }
}
