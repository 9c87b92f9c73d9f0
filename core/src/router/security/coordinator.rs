//! Security coordinator.
//!
//! # Spring Security Equivalent
//! `FilterSecurityInterceptor` + `ExceptionTranslationFilter`
//!
//! # Overview
//! [`Security`] intercepts route entries and decides, once per transition,
//! whether the most specific route declaring access may be entered:
//!
//! 1. The login and logout routes must never be restricted.
//! 2. The security context is read from the store.
//! 3. Without authentication, authentication is required and the transition
//!    is redirected to the login route, carrying the attempted pathname.
//! 4. A stale (unauthenticated) record is refreshed through the
//!    authentication manager, exactly once.
//! 5. The access decision manager grants the transition or redirects it to
//!    the access-denied route.
//!
//! Entering the logout route runs the downstream hooks, then [`Security::logout`].
//!
//! # Example
//! ```
//! use futures::executor::block_on;
//! use route_security_core::router::intercept::InterceptRoute;
//! use route_security_core::router::navigator::Navigator;
//! use route_security_core::router::route::Route;
//! use route_security_core::router::security::{MemoryStore, Security, SecurityConfig};
//!
//! let security = Security::new(MemoryStore::with_security_context(), SecurityConfig::new());
//! let routes = InterceptRoute::create(
//!     Route::new("/").intercept(security.clone()).access("ROLE_USER"),
//! );
//!
//! let outcome = block_on(Navigator::new(vec![routes]).navigate("/"));
//! let redirect = outcome.redirect.unwrap();
//!
//! assert_eq!(redirect.pathname, "/login");
//! assert_eq!(redirect.get_state("nextPathname"), Some("/"));
//! ```

use std::cell::Cell;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture};

use crate::router::error::{SecurityError, SpecialRoute, TransitionError};
use crate::router::route::{Interceptor, Location, Next, NextState, Replace, Route, TransitionFuture, TransitionId};
use crate::router::security::access::RouteAccess;
use crate::router::security::authentication::Authentication;
use crate::router::security::config::SecurityConfig;
use crate::router::security::context::SecurityContext;
use crate::router::security::logout::{LogoutError, LogoutFuture};
use crate::router::security::provider::AuthenticationError;
use crate::router::security::store::{SecurityContextStore, Store};

/// Access decision taken for a transition.
#[derive(Clone, Copy, Debug)]
struct TransitionCheck {
    id: TransitionId,
    granted: bool,
}

/// Coordinates authentication state and route interception.
///
/// Clones share the same store, configuration and transition bookkeeping,
/// so one coordinator can intercept many routes.
pub struct Security<St: Store> {
    inner: Rc<SecurityInner<St>>,
}

struct SecurityInner<St: Store> {
    store: SecurityContextStore<St>,
    config: SecurityConfig<St::State>,
    /// Most recent transition seen by any interception
    latest: Cell<Option<TransitionId>>,
    /// Decision of the transition being processed
    decision: Cell<Option<TransitionCheck>>,
}

impl<St: Store> Clone for Security<St> {
    fn clone(&self) -> Self {
        Security {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<St: Store + 'static> Security<St> {
    pub fn new(store: St, config: SecurityConfig<St::State>) -> Self {
        let selector = config.get_security_context_selector();

        Security {
            inner: Rc::new(SecurityInner {
                store: SecurityContextStore::new(store, selector),
                config,
                latest: Cell::new(None),
                decision: Cell::new(None),
            }),
        }
    }

    /// Reads the security context from the store.
    pub fn get_security_context(&self) -> Result<SecurityContext, SecurityError> {
        self.inner.store.read()
    }

    /// Commits `authentication` as the current authentication and returns it.
    ///
    /// `None` resets the authentication.
    pub fn authenticate(&self, authentication: impl Into<Option<Authentication>>) -> Option<Authentication> {
        self.inner.commit(authentication.into())
    }

    /// Commits an authentication failure and returns the error unchanged.
    pub fn authentication_failed(&self, error: AuthenticationError) -> AuthenticationError {
        self.inner.store.dispatch_authentication_error(error.clone());
        error
    }

    /// Marks authentication as required, resetting the current one.
    pub fn require_authentication(&self) {
        self.inner.store.dispatch_authentication_required();
    }

    /// Logs in with `authentication`.
    ///
    /// The record is committed immediately. An authenticated record resolves
    /// unchanged; otherwise the authentication manager is called once:
    /// - a refreshed authenticated record is committed and resolved
    /// - a provider failure is committed as authentication error and the
    ///   original record is resolved
    /// - an unauthenticated provider result fails with
    ///   [`SecurityError::InvalidProviderResult`], committing nothing more
    pub fn login(
        &self,
        authentication: Authentication,
    ) -> LocalBoxFuture<'static, Result<Authentication, SecurityError>> {
        Rc::clone(&self.inner).login(authentication).boxed_local()
    }

    /// Logs out the current authentication.
    ///
    /// Authenticated or force-logout records go through the logout handler
    /// and are reset only when it succeeds; any other record is reset right
    /// away. Without authentication this does nothing.
    pub fn logout(&self) -> LogoutFuture {
        Rc::clone(&self.inner).logout().boxed_local()
    }

    /// Returns the pathname to resume after login, read from the state of
    /// the login redirect.
    pub fn next_pathname(&self, location: Option<&Location>, default_pathname: &str) -> String {
        location
            .and_then(|location| location.get_state(self.inner.config.get_next_pathname_property()))
            .filter(|pathname| !pathname.is_empty())
            .unwrap_or(default_pathname)
            .to_string()
    }

    /// Interception protocol, see the module documentation.
    pub fn secure_routes(
        &self,
        route: &Route,
        next: Next,
        next_state: NextState,
        replace: Replace,
    ) -> TransitionFuture {
        let inner = Rc::clone(&self.inner);
        inner.latest.set(Some(next_state.id));

        let access_property = inner.config.get_access_property();
        let check_access = next_state
            .routes
            .iter()
            .rev()
            .find_map(|candidate| {
                candidate
                    .get_attribute(access_property)
                    .filter(|access| access.is_declared())
            })
            .cloned();

        if let Some(access) = check_access {
            return match inner.decision_for(next_state.id) {
                Some(true) => next(next_state, replace),
                Some(false) => futures::future::ok(()).boxed_local(),
                None => inner.check_access(access, next, next_state, replace).boxed_local(),
            };
        }

        if next_state.is_leaf(route) && next_state.location.pathname == inner.config.get_logout_pathname() {
            return inner.logout_route(next, next_state, replace).boxed_local();
        }

        next(next_state, replace)
    }

    // Getters

    pub fn get_config(&self) -> &SecurityConfig<St::State> {
        &self.inner.config
    }

    pub fn get_store(&self) -> &St {
        self.inner.store.store()
    }

    pub fn get_access_denied_pathname(&self) -> &str {
        self.inner.config.get_access_denied_pathname()
    }

    pub fn get_login_pathname(&self) -> &str {
        self.inner.config.get_login_pathname()
    }

    pub fn get_logout_pathname(&self) -> &str {
        self.inner.config.get_logout_pathname()
    }
}

impl<St: Store + 'static> Interceptor for Security<St> {
    fn intercept(
        &self,
        route: &Route,
        next: Next,
        next_state: NextState,
        replace: Replace,
    ) -> TransitionFuture {
        self.secure_routes(route, next, next_state, replace)
    }
}

impl<St: Store + 'static> SecurityInner<St> {
    fn commit(&self, authentication: Option<Authentication>) -> Option<Authentication> {
        match &authentication {
            Some(authentication) => log::info!("Authentication set: {}", authentication),
            None => log::info!("Authentication reset"),
        }
        self.store.dispatch_authentication(authentication.clone());
        authentication
    }

    fn decision_for(&self, id: TransitionId) -> Option<bool> {
        self.decision
            .get()
            .filter(|check| check.id == id)
            .map(|check| check.granted)
    }

    /// Records the outcome of `id`; only a grant lets later interceptions
    /// of the same transition proceed.
    fn settle(&self, id: TransitionId, granted: bool) {
        self.decision.set(Some(TransitionCheck { id, granted }));
    }

    fn redirect_to_login(&self, next_state: &NextState, replace: &Replace) {
        let login = Location::new(self.config.get_login_pathname()).with_state(
            self.config.get_next_pathname_property(),
            &next_state.location.pathname,
        );
        log::debug!(
            "Transition {} to '{}' requires authentication",
            next_state.id,
            next_state.location.pathname
        );
        replace.replace(login);
    }

    async fn login(self: Rc<Self>, authentication: Authentication) -> Result<Authentication, SecurityError> {
        self.commit(Some(authentication.clone()));

        if authentication.is_authenticated() {
            return Ok(authentication);
        }

        let result = self
            .config
            .get_authentication_manager()
            .authenticate(authentication.clone())
            .await;

        match result {
            Ok(refreshed) if refreshed.is_authenticated() => {
                self.commit(Some(refreshed.clone()));
                Ok(refreshed)
            }
            Ok(_) => Err(SecurityError::InvalidProviderResult {
                authentication_type: authentication.type_label(),
            }),
            Err(error) => {
                log::warn!("Login failed: {}", error);
                self.store.dispatch_authentication_error(error);
                Ok(authentication)
            }
        }
    }

    async fn logout(self: Rc<Self>) -> Result<(), LogoutError> {
        let authentication = self
            .store
            .read()
            .ok()
            .and_then(|context| context.authentication);

        match authentication {
            None => Ok(()),
            Some(authentication) if authentication.is_authenticated() || authentication.is_force_logout() => {
                self.config.get_logout_handler().logout(authentication).await?;
                self.commit(None);
                Ok(())
            }
            Some(_) => {
                self.commit(None);
                Ok(())
            }
        }
    }

    async fn check_access(
        self: Rc<Self>,
        access: RouteAccess,
        next: Next,
        next_state: NextState,
        replace: Replace,
    ) -> Result<(), TransitionError> {
        let pathname = next_state.location.pathname.clone();

        if pathname == self.config.get_login_pathname() {
            return Err(SecurityError::RestrictedSpecialRoute {
                kind: SpecialRoute::Login,
                pathname,
            }
            .into());
        }

        if pathname == self.config.get_logout_pathname() {
            return Err(SecurityError::RestrictedSpecialRoute {
                kind: SpecialRoute::Logout,
                pathname,
            }
            .into());
        }

        let context = self.store.read()?;

        let authentication = match context.authentication {
            None => {
                self.settle(next_state.id, false);
                self.store.dispatch_authentication_required();
                self.redirect_to_login(&next_state, &replace);
                return Ok(());
            }
            Some(authentication) if authentication.is_authenticated() => authentication,
            Some(stale) => {
                log::debug!(
                    "Refreshing authentication of type '{}' for transition {}",
                    stale.type_label(),
                    next_state.id
                );

                let result = self
                    .config
                    .get_authentication_manager()
                    .authenticate(stale.clone())
                    .await;

                if self.latest.get() != Some(next_state.id) {
                    log::warn!("Discarding authentication result of superseded transition {}", next_state.id);
                    return Err(SecurityError::TransitionSuperseded {
                        transition: next_state.id,
                    }
                    .into());
                }

                match result {
                    Ok(refreshed) if refreshed.is_authenticated() => {
                        self.commit(Some(refreshed.clone()));
                        refreshed
                    }
                    Ok(_) => {
                        self.settle(next_state.id, false);
                        return Err(SecurityError::InvalidProviderResult {
                            authentication_type: stale.type_label(),
                        }
                        .into());
                    }
                    Err(error) => {
                        log::warn!("Authentication refresh failed: {}", error);
                        self.settle(next_state.id, false);
                        self.store.dispatch_authentication_error(error);
                        self.redirect_to_login(&next_state, &replace);
                        return Ok(());
                    }
                }
            }
        };

        let granted = self
            .config
            .get_access_decision_manager()
            .decide(&authentication, Some(&access));

        self.settle(next_state.id, granted);

        if !granted {
            log::debug!(
                "Access to '{}' denied for '{}'",
                next_state.location.pathname,
                authentication.get_name()
            );
            replace.replace(self.config.get_access_denied_pathname());
            return Ok(());
        }

        next(next_state, replace).await
    }

    async fn logout_route(
        self: Rc<Self>,
        next: Next,
        next_state: NextState,
        replace: Replace,
    ) -> Result<(), TransitionError> {
        let replaced = Rc::new(Cell::new(false));
        let tracking = {
            let replaced = Rc::clone(&replaced);
            let replace = replace.clone();
            Replace::new(move |location| {
                replaced.set(true);
                replace.replace(location);
            })
        };

        let on_enter = next(next_state, tracking).await;
        let logout = Rc::clone(&self).logout().await;

        match (on_enter, logout) {
            (Ok(()), Ok(())) => {
                if let Some(pathname) = self.config.get_logout_success_pathname() {
                    if !replaced.get() {
                        replace.replace(pathname);
                    }
                }
                Ok(())
            }
            (on_enter, logout) => Err(TransitionError::Logout {
                logout_error: logout.err(),
                on_enter_error: on_enter.err().map(Box::new),
            }),
        }
    }
}
