//! Logout handlers and the logout chain.
//!
//! # Spring Security Equivalent
//! `LogoutHandler` + `CompositeLogoutHandler`
//!
//! A [`LogoutFilter`] tries its handlers strictly in order and stops at the
//! first one that succeeds. When none succeeds it fails with the collected
//! errors, the last one being a synthesized [`LogoutError::NoHandlerSucceeded`].
//!
//! # Example
//! ```
//! use futures::executor::block_on;
//! use futures::future;
//! use route_security_core::router::security::{
//!     Authentication, LogoutError, LogoutFilter, LogoutHandler,
//! };
//!
//! let filter = LogoutFilter::new()
//!     .handler(|_: Authentication| future::err::<(), _>(LogoutError::handler("server unreachable")))
//!     .handler(|_: Authentication| future::ok::<(), LogoutError>(()));
//!
//! assert!(block_on(filter.logout(Authentication::new())).is_ok());
//! ```

use std::future::Future;
use std::rc::Rc;

use derive_more::{Display, Error};
use futures::future::{FutureExt, LocalBoxFuture};

use crate::router::security::authentication::Authentication;

/// Logout related errors.
#[derive(Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum LogoutError {
    /// Synthesized when no handler of a chain succeeded.
    #[display("Could not logout authentication (type '{authentication_type}')")]
    NoHandlerSucceeded { authentication_type: String },

    /// A handler failed (server unreachable, session already gone, ...).
    #[display("{message}")]
    Handler { status: Option<u16>, message: String },

    /// Every handler of a chain failed; errors are kept in the order they occurred.
    #[display("no logout handler succeeded")]
    Aggregate { errors: Vec<LogoutError> },
}

impl LogoutError {
    pub fn handler(message: impl Into<String>) -> Self {
        LogoutError::Handler {
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        LogoutError::Handler {
            status: Some(status),
            message: message.into(),
        }
    }

    /// The individual errors: the aggregated ones, or this error alone.
    pub fn errors(&self) -> Vec<&LogoutError> {
        match self {
            LogoutError::Aggregate { errors } => errors.iter().collect(),
            other => vec![other],
        }
    }
}

/// Result of an asynchronous logout attempt.
pub type LogoutFuture = LocalBoxFuture<'static, Result<(), LogoutError>>;

/// Strategy terminating an authentication (e.g. clearing a server session).
///
/// # Spring Equivalent
/// `LogoutHandler`
pub trait LogoutHandler {
    fn logout(&self, authentication: Authentication) -> LogoutFuture;
}

impl<F, Fut> LogoutHandler for F
where
    F: Fn(Authentication) -> Fut,
    Fut: Future<Output = Result<(), LogoutError>> + 'static,
{
    fn logout(&self, authentication: Authentication) -> LogoutFuture {
        self(authentication).boxed_local()
    }
}

/// Ordered chain of logout handlers.
///
/// A single handler and a one-element chain behave identically.
#[derive(Clone, Default)]
pub struct LogoutFilter {
    handlers: Vec<Rc<dyn LogoutHandler>>,
}

impl LogoutFilter {
    /// Creates an empty chain; logging out through it always fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a chain of exactly one handler.
    pub fn single<H: LogoutHandler + 'static>(handler: H) -> Self {
        Self::new().handler(handler)
    }

    /// Appends a handler to the chain.
    pub fn handler<H: LogoutHandler + 'static>(mut self, handler: H) -> Self {
        self.handlers.push(Rc::new(handler));
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl LogoutHandler for LogoutFilter {
    fn logout(&self, authentication: Authentication) -> LogoutFuture {
        let handlers = self.handlers.clone();

        Box::pin(async move {
            let mut errors = Vec::new();

            for (index, handler) in handlers.iter().enumerate() {
                match handler.logout(authentication.clone()).await {
                    Ok(()) => {
                        log::debug!("Logout handler #{} succeeded", index);
                        return Ok(());
                    }
                    Err(error) => {
                        log::warn!("Logout handler #{} failed: {}", index, error);
                        errors.push(error);
                    }
                }
            }

            errors.push(LogoutError::NoHandlerSucceeded {
                authentication_type: authentication.type_label(),
            });

            if errors.len() == 1 {
                Err(errors.remove(0))
            } else {
                Err(LogoutError::Aggregate { errors })
            }
        })
    }
}
