//! Security coordinator configuration.
//!
//! # Example
//! ```rust,ignore
//! use route_security_core::router::security::{LogoutFilter, ProviderManager, SecurityConfig};
//!
//! let config = SecurityConfig::new()
//!     .login_pathname("/signin")
//!     .logout_success_pathname("/signin")
//!     .authentication_manager(ProviderManager::new().provider("session", session_provider))
//!     .logout_handler(LogoutFilter::single(server_logout));
//! ```

use std::rc::Rc;

use crate::router::security::access::{decide, AccessDecisionManager};
use crate::router::security::context::{SecurityContext, SecurityState};
use crate::router::security::logout::{LogoutFilter, LogoutHandler};
use crate::router::security::provider::{AuthenticationManager, ProviderManager};
use crate::router::security::store::SecurityContextSelector;

/// Default name of the route attribute holding the access declaration.
pub const DEFAULT_ACCESS_PROPERTY: &str = "access";

/// Configuration of a [`Security`](crate::router::security::Security) coordinator.
///
/// `S` is the state type of the store the coordinator reads.
pub struct SecurityConfig<S> {
    /// Redirect target when access is denied
    access_denied_pathname: String,
    /// Route attribute holding the access declaration
    access_property: String,
    /// Redirect target when authentication is required
    login_pathname: String,
    /// Route running the logout flow when entered
    logout_pathname: String,
    /// Redirect target after the logout route completed
    logout_success_pathname: Option<String>,
    /// Key of the resumption pathname in the login redirect state
    next_pathname_property: String,
    authentication_manager: Rc<dyn AuthenticationManager>,
    logout_handler: Rc<dyn LogoutHandler>,
    access_decision_manager: Rc<dyn AccessDecisionManager>,
    security_context_selector: SecurityContextSelector<S>,
}

impl<S: SecurityState + 'static> SecurityConfig<S> {
    /// Creates a configuration with default values, reading the security
    /// context through [`SecurityState`].
    pub fn new() -> Self {
        Self::with_selector(|state: &S| state.security_context().cloned())
    }
}

impl<S: SecurityState + 'static> Default for SecurityConfig<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> SecurityConfig<S> {
    /// Creates a configuration with default values and a custom selector.
    pub fn with_selector<F>(selector: F) -> Self
    where
        F: Fn(&S) -> Option<SecurityContext> + 'static,
    {
        SecurityConfig {
            access_denied_pathname: "/access-denied".to_string(),
            access_property: DEFAULT_ACCESS_PROPERTY.to_string(),
            login_pathname: "/login".to_string(),
            logout_pathname: "/logout".to_string(),
            logout_success_pathname: None,
            next_pathname_property: "nextPathname".to_string(),
            authentication_manager: Rc::new(ProviderManager::new()),
            logout_handler: Rc::new(LogoutFilter::new()),
            access_decision_manager: Rc::new(decide),
            security_context_selector: Rc::new(selector),
        }
    }

    pub fn access_denied_pathname(mut self, pathname: &str) -> Self {
        self.access_denied_pathname = pathname.to_string();
        self
    }

    pub fn access_property(mut self, property: &str) -> Self {
        self.access_property = property.to_string();
        self
    }

    pub fn login_pathname(mut self, pathname: &str) -> Self {
        self.login_pathname = pathname.to_string();
        self
    }

    pub fn logout_pathname(mut self, pathname: &str) -> Self {
        self.logout_pathname = pathname.to_string();
        self
    }

    pub fn logout_success_pathname(mut self, pathname: &str) -> Self {
        self.logout_success_pathname = Some(pathname.to_string());
        self
    }

    pub fn next_pathname_property(mut self, property: &str) -> Self {
        self.next_pathname_property = property.to_string();
        self
    }

    pub fn authentication_manager<M: AuthenticationManager + 'static>(mut self, manager: M) -> Self {
        self.authentication_manager = Rc::new(manager);
        self
    }

    pub fn logout_handler<H: LogoutHandler + 'static>(mut self, handler: H) -> Self {
        self.logout_handler = Rc::new(handler);
        self
    }

    pub fn access_decision_manager<D: AccessDecisionManager + 'static>(mut self, manager: D) -> Self {
        self.access_decision_manager = Rc::new(manager);
        self
    }

    pub fn security_context_selector<F>(mut self, selector: F) -> Self
    where
        F: Fn(&S) -> Option<SecurityContext> + 'static,
    {
        self.security_context_selector = Rc::new(selector);
        self
    }

    // Getters

    pub fn get_access_denied_pathname(&self) -> &str {
        &self.access_denied_pathname
    }

    pub fn get_access_property(&self) -> &str {
        &self.access_property
    }

    pub fn get_login_pathname(&self) -> &str {
        &self.login_pathname
    }

    pub fn get_logout_pathname(&self) -> &str {
        &self.logout_pathname
    }

    pub fn get_logout_success_pathname(&self) -> Option<&str> {
        self.logout_success_pathname.as_deref()
    }

    pub fn get_next_pathname_property(&self) -> &str {
        &self.next_pathname_property
    }

    pub(crate) fn get_authentication_manager(&self) -> &dyn AuthenticationManager {
        self.authentication_manager.as_ref()
    }

    pub(crate) fn get_logout_handler(&self) -> &dyn LogoutHandler {
        self.logout_handler.as_ref()
    }

    pub(crate) fn get_access_decision_manager(&self) -> &dyn AccessDecisionManager {
        self.access_decision_manager.as_ref()
    }

    pub(crate) fn get_security_context_selector(&self) -> SecurityContextSelector<S> {
        Rc::clone(&self.security_context_selector)
    }
}
