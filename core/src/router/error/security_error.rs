use derive_more::{Display, Error};

use crate::router::route::TransitionId;
use crate::router::security::logout::LogoutError;

/// Special routes that must never declare an access requirement.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum SpecialRoute {
    #[display("login")]
    Login,
    #[display("logout")]
    Logout,
}

/// Configuration errors and provider contract violations.
///
/// These are fatal for the operation that raised them and are never turned
/// into security context state.
#[derive(Clone, Debug, Display, Error, PartialEq)]
pub enum SecurityError {
    /// The state container has no security context slice.
    #[display("No securityContext found. Did you forget to include securityContext in your store?")]
    MissingSecurityContext,

    /// The login or logout route sits below a route declaring access.
    #[display("Access to the {kind} route '{pathname}' must not be restricted.")]
    RestrictedSpecialRoute { kind: SpecialRoute, pathname: String },

    /// The authentication manager resolved with an unauthenticated record.
    #[display(
        "authenticationManager returned an unauthenticated authentication (type '{authentication_type}')"
    )]
    InvalidProviderResult { authentication_type: String },

    /// A newer navigation started while this transition awaited its provider.
    #[display("transition {transition} was superseded by a newer navigation")]
    TransitionSuperseded { transition: TransitionId },
}

/// Error raised by an application enter hook.
#[derive(Clone, Debug, Display, Error, PartialEq, Eq)]
#[display("{message}")]
pub struct HookError {
    message: String,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        HookError {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Error channel of a navigation transition.
///
/// This is what the host router receives through its completion callback.
#[derive(Clone, Debug, Display, Error, PartialEq)]
pub enum TransitionError {
    #[display("{_0}")]
    Security(SecurityError),

    #[display("{_0}")]
    Hook(HookError),

    /// The logout route failed: the downstream hooks, the logout handler, or both.
    #[display("logout transition failed")]
    Logout {
        logout_error: Option<LogoutError>,
        on_enter_error: Option<Box<TransitionError>>,
    },
}

impl From<SecurityError> for TransitionError {
    fn from(error: SecurityError) -> Self {
        TransitionError::Security(error)
    }
}

impl From<HookError> for TransitionError {
    fn from(error: HookError) -> Self {
        TransitionError::Hook(error)
    }
}
