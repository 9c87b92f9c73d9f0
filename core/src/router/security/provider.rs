//! Authentication providers and the provider dispatcher.
//!
//! # Spring Security Equivalent
//! `AuthenticationProvider` + `ProviderManager`
//!
//! # Example
//! ```
//! use futures::executor::block_on;
//! use route_security_core::router::security::{
//!     Authentication, AuthenticationError, AuthenticationManager, ProviderManager,
//! };
//!
//! let manager = ProviderManager::new().provider("session", |authentication: Authentication| async move {
//!     Ok::<_, AuthenticationError>(authentication.authenticated(true))
//! });
//!
//! let session = Authentication::new().authentication_type("session");
//! assert!(block_on(manager.authenticate(session)).unwrap().is_authenticated());
//!
//! let unknown = Authentication::new().authentication_type("token");
//! assert!(block_on(manager.authenticate(unknown)).is_err());
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use derive_more::{Display, Error};
use futures::future::{self, FutureExt, LocalBoxFuture};

use crate::router::security::authentication::Authentication;

/// Failure of an authentication attempt.
///
/// This is the payload committed to the security context as
/// `authentication_error`.
#[derive(Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum AuthenticationError {
    /// No provider is registered for the record's type.
    #[display("Could not authenticate authentication of type '{authentication_type}'!")]
    UnknownAuthenticationType { authentication_type: String },

    /// A provider rejected the attempt (bad credentials, expired session, ...).
    #[display("{message}")]
    Provider { status: Option<u16>, message: String },
}

impl AuthenticationError {
    /// Creates a provider failure with a message.
    pub fn provider(message: impl Into<String>) -> Self {
        AuthenticationError::Provider {
            status: None,
            message: message.into(),
        }
    }

    /// Creates a provider failure carrying a status code, e.g. from an HTTP call.
    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        AuthenticationError::Provider {
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            AuthenticationError::Provider { status, .. } => *status,
            AuthenticationError::UnknownAuthenticationType { .. } => None,
        }
    }
}

/// Result of an asynchronous authentication attempt.
pub type AuthenticationFuture = LocalBoxFuture<'static, Result<Authentication, AuthenticationError>>;

/// Strategy performing authentication attempts for the coordinator.
///
/// # Spring Equivalent
/// `AuthenticationManager`
///
/// The coordinator calls this at most once per transition and never retries.
pub trait AuthenticationManager {
    fn authenticate(&self, authentication: Authentication) -> AuthenticationFuture;
}

impl<F, Fut> AuthenticationManager for F
where
    F: Fn(Authentication) -> Fut,
    Fut: Future<Output = Result<Authentication, AuthenticationError>> + 'static,
{
    fn authenticate(&self, authentication: Authentication) -> AuthenticationFuture {
        self(authentication).boxed_local()
    }
}

/// Strategy authenticating records of one type.
///
/// # Spring Equivalent
/// `AuthenticationProvider`
pub trait AuthenticationProvider {
    fn authenticate(&self, authentication: Authentication) -> AuthenticationFuture;
}

impl<F, Fut> AuthenticationProvider for F
where
    F: Fn(Authentication) -> Fut,
    Fut: Future<Output = Result<Authentication, AuthenticationError>> + 'static,
{
    fn authenticate(&self, authentication: Authentication) -> AuthenticationFuture {
        self(authentication).boxed_local()
    }
}

/// Dispatches authentication attempts to the provider registered for the
/// record's type.
///
/// # Spring Security Equivalent
/// `ProviderManager`
#[derive(Clone, Default)]
pub struct ProviderManager {
    providers: HashMap<String, Rc<dyn AuthenticationProvider>>,
}

impl ProviderManager {
    /// Creates a dispatcher without providers; every attempt fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the provider for a type, replacing any previous one.
    pub fn provider<P>(mut self, authentication_type: &str, provider: P) -> Self
    where
        P: AuthenticationProvider + 'static,
    {
        self.providers
            .insert(authentication_type.to_string(), Rc::new(provider));
        self
    }

    pub fn has_provider(&self, authentication_type: &str) -> bool {
        self.providers.contains_key(authentication_type)
    }
}

impl AuthenticationManager for ProviderManager {
    fn authenticate(&self, authentication: Authentication) -> AuthenticationFuture {
        let provider = authentication
            .get_type()
            .and_then(|authentication_type| self.providers.get(authentication_type));

        match provider {
            Some(provider) => {
                log::debug!(
                    "Dispatching authentication of type '{}'",
                    authentication.type_label()
                );
                provider.authenticate(authentication)
            }
            None => {
                let authentication_type = authentication.type_label();
                log::warn!("No provider for authentication type '{}'", authentication_type);
                future::err(AuthenticationError::UnknownAuthenticationType {
                    authentication_type,
                })
                .boxed_local()
            }
        }
    }
}
