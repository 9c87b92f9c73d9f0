//! Security context state and the actions mutating it.
//!
//! # Spring Security Equivalent
//! `SecurityContext` / `SecurityContextHolder`
//!
//! # Overview
//! The security context is a slice of the application's state container. It
//! is mutated only by dispatching [`SecurityAction`]s, which the coordinator
//! alone does; the embedding UI observes `authentication_error` and
//! `authentication_required` to render login forms and messages.

use crate::router::security::authentication::Authentication;
use crate::router::security::provider::AuthenticationError;

/// Snapshot of the current authentication status.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SecurityContext {
    pub authentication: Option<Authentication>,
    pub authentication_error: Option<AuthenticationError>,
    pub authentication_required: bool,
}

/// Actions accepted by the security context.
#[derive(Clone, Debug, PartialEq)]
pub enum SecurityAction {
    /// Successful authentication, or `None` to reset it.
    Authentication(Option<Authentication>),
    /// Failed authentication attempt.
    AuthenticationFailed(AuthenticationError),
    /// A restricted route was requested without any authentication.
    AuthenticationRequired,
}

impl SecurityAction {
    /// Action type as seen by the state container.
    pub fn action_type(&self) -> &'static str {
        match self {
            SecurityAction::Authentication(_) | SecurityAction::AuthenticationFailed(_) => {
                "AUTHENTICATION"
            }
            SecurityAction::AuthenticationRequired => "AUTHENTICATION_REQUIRED",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SecurityAction::AuthenticationFailed(_))
    }
}

impl SecurityContext {
    /// Returns the context after applying `action`.
    ///
    /// A failure keeps the previous authentication (an empty record when
    /// there was none) but marks it unauthenticated.
    pub fn reduce(&self, action: &SecurityAction) -> SecurityContext {
        match action {
            SecurityAction::Authentication(authentication) => SecurityContext {
                authentication: authentication.clone(),
                authentication_error: None,
                authentication_required: false,
            },
            SecurityAction::AuthenticationFailed(error) => SecurityContext {
                authentication: Some(
                    self.authentication
                        .as_ref()
                        .map(Authentication::unauthenticated)
                        .unwrap_or_default(),
                ),
                authentication_error: Some(error.clone()),
                authentication_required: true,
            },
            SecurityAction::AuthenticationRequired => SecurityContext {
                authentication: None,
                authentication_error: None,
                authentication_required: true,
            },
        }
    }

    /// Whether the current authentication is resolved and authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.authentication
            .as_ref()
            .map_or(false, Authentication::is_authenticated)
    }
}

/// State types exposing a security context slice.
pub trait SecurityState {
    fn security_context(&self) -> Option<&SecurityContext>;
}

/// Application state holding only the security context slice.
#[derive(Clone, Debug, PartialEq)]
pub struct RootState {
    pub security_context: Option<SecurityContext>,
}

impl Default for RootState {
    fn default() -> Self {
        RootState {
            security_context: Some(SecurityContext::default()),
        }
    }
}

impl RootState {
    /// State of a container that never registered the security slice.
    pub fn without_security_context() -> Self {
        RootState {
            security_context: None,
        }
    }

    /// Reducer of the root state; a missing slice stays missing.
    pub fn reduce(&self, action: &SecurityAction) -> RootState {
        RootState {
            security_context: self
                .security_context
                .as_ref()
                .map(|context| context.reduce(action)),
        }
    }
}

impl SecurityState for RootState {
    fn security_context(&self) -> Option<&SecurityContext> {
        self.security_context.as_ref()
    }
}
