//! Route tree, enter hooks and transition types.
//!
//! # Overview
//! A host router walks the [`Route`]s matching a location and enters them in
//! order, root to leaf. Entering a route runs its [`Interceptor`] (when one is
//! set) with a continuation to the route's own [`EnterHook`], or the hook
//! directly. A transition completes with `Ok(())`, may redirect through
//! [`Replace`], or fails with a [`TransitionError`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use derive_more::Display;
use futures::future::{self, FutureExt, LocalBoxFuture};

use crate::router::error::TransitionError;
use crate::router::security::access::RouteAccess;
use crate::router::security::config::DEFAULT_ACCESS_PROPERTY;

static ROUTE_IDS: AtomicU64 = AtomicU64::new(1);
static TRANSITION_IDS: AtomicU64 = AtomicU64::new(1);

/// Identity of a route, stable across clones.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
#[display("route#{_0}")]
pub struct RouteId(u64);

impl RouteId {
    fn next() -> Self {
        RouteId(ROUTE_IDS.fetch_add(1, Ordering::Relaxed))
    }
}

/// Identity of one navigation transition.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
#[display("#{_0}")]
pub struct TransitionId(u64);

impl TransitionId {
    /// Allocates a new, process-wide unique transition identity.
    pub fn next() -> Self {
        TransitionId(TRANSITION_IDS.fetch_add(1, Ordering::Relaxed))
    }
}

/// Navigation target.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Location {
    pub pathname: String,
    pub state: Option<BTreeMap<String, String>>,
}

impl Location {
    pub fn new(pathname: impl Into<String>) -> Self {
        Location {
            pathname: pathname.into(),
            state: None,
        }
    }

    /// Adds an entry to the location state.
    pub fn with_state(mut self, key: &str, value: &str) -> Self {
        self.state
            .get_or_insert_with(BTreeMap::new)
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn get_state(&self, key: &str) -> Option<&str> {
        self.state
            .as_ref()
            .and_then(|state| state.get(key))
            .map(String::as_str)
    }
}

impl From<&str> for Location {
    fn from(pathname: &str) -> Self {
        Location::new(pathname)
    }
}

impl From<String> for Location {
    fn from(pathname: String) -> Self {
        Location::new(pathname)
    }
}

/// The transition being processed.
#[derive(Clone, Debug)]
pub struct NextState {
    pub id: TransitionId,
    /// Matched routes, root to leaf.
    pub routes: Vec<Route>,
    pub location: Location,
    pub params: HashMap<String, String>,
}

impl NextState {
    pub fn new(id: TransitionId, routes: Vec<Route>, location: impl Into<Location>) -> Self {
        NextState {
            id,
            routes,
            location: location.into(),
            params: HashMap::new(),
        }
    }

    /// Whether `route` is the leaf of the transition.
    pub fn is_leaf(&self, route: &Route) -> bool {
        self.routes.last().map(Route::id) == Some(route.id())
    }
}

/// Redirect function handed to enter hooks.
#[derive(Clone)]
pub struct Replace(Rc<dyn Fn(Location)>);

impl Replace {
    pub fn new<F: Fn(Location) + 'static>(f: F) -> Self {
        Replace(Rc::new(f))
    }

    /// Redirects the transition to `location`.
    pub fn replace(&self, location: impl Into<Location>) {
        (self.0)(location.into())
    }
}

impl fmt::Debug for Replace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Replace")
    }
}

/// Completion of an enter hook or of a whole transition.
pub type TransitionFuture = LocalBoxFuture<'static, Result<(), TransitionError>>;

/// Continuation to the remaining entry processing of a route.
pub type Next = Box<dyn FnOnce(NextState, Replace) -> TransitionFuture>;

type SyncHook = Rc<dyn Fn(&Route, &NextState, &Replace) -> Result<(), TransitionError>>;
type AsyncHook = Rc<dyn Fn(&Route, NextState, Replace) -> TransitionFuture>;

/// Application hook run when a route is entered.
///
/// `Sync` hooks complete when they return; `Async` hooks complete with the
/// future they return.
#[derive(Clone)]
pub enum EnterHook {
    Sync(SyncHook),
    Async(AsyncHook),
}

impl EnterHook {
    pub fn sync<F>(hook: F) -> Self
    where
        F: Fn(&Route, &NextState, &Replace) -> Result<(), TransitionError> + 'static,
    {
        EnterHook::Sync(Rc::new(hook))
    }

    pub fn asynchronous<F>(hook: F) -> Self
    where
        F: Fn(&Route, NextState, Replace) -> TransitionFuture + 'static,
    {
        EnterHook::Async(Rc::new(hook))
    }
}

/// Creates the continuation running `hook` for `route`.
///
/// A route without hook completes immediately; a `Sync` hook gets its
/// completion signalled on its behalf.
pub fn create_enter_hook(hook: Option<EnterHook>, route: Route) -> Next {
    Box::new(move |next_state: NextState, replace: Replace| match hook {
        None => future::ok(()).boxed_local(),
        Some(EnterHook::Sync(hook)) => {
            future::ready(hook(&route, &next_state, &replace)).boxed_local()
        }
        Some(EnterHook::Async(hook)) => hook(&route, next_state, replace),
    })
}

/// Function wrapping the entry of a route.
///
/// Implementations either call `next` to proceed to the route's own hook, or
/// complete without calling it (after redirecting through `replace`, or with
/// an error).
pub trait Interceptor {
    fn intercept(
        &self,
        route: &Route,
        next: Next,
        next_state: NextState,
        replace: Replace,
    ) -> TransitionFuture;
}

impl<F> Interceptor for F
where
    F: Fn(&Route, Next, NextState, Replace) -> TransitionFuture,
{
    fn intercept(
        &self,
        route: &Route,
        next: Next,
        next_state: NextState,
        replace: Replace,
    ) -> TransitionFuture {
        self(route, next, next_state, replace)
    }
}

/// Node of the route tree.
///
/// # Example
/// ```
/// use route_security_core::router::route::{EnterHook, Route};
///
/// let routes = Route::new("/")
///     .access("ROLE_USER")
///     .child(Route::new("dashboard").on_enter(EnterHook::sync(|_, _, _| Ok(()))));
///
/// assert_eq!(routes.get_child_routes().len(), 1);
/// ```
#[derive(Clone)]
pub struct Route {
    id: RouteId,
    path: Option<String>,
    attributes: HashMap<String, RouteAccess>,
    on_enter: Option<EnterHook>,
    intercept: Option<Rc<dyn Interceptor>>,
    /// Shared with clones; copied on write
    child_routes: Rc<Vec<Route>>,
}

impl Route {
    pub fn new(path: &str) -> Self {
        Route {
            path: Some(path.to_string()),
            ..Self::pathless()
        }
    }

    /// Route matching no path segment of its own.
    pub fn pathless() -> Self {
        Route {
            id: RouteId::next(),
            path: None,
            attributes: HashMap::new(),
            on_enter: None,
            intercept: None,
            child_routes: Rc::new(Vec::new()),
        }
    }

    /// Declares the access required to enter this route.
    pub fn access(self, access: impl Into<RouteAccess>) -> Self {
        self.attribute(DEFAULT_ACCESS_PROPERTY, access)
    }

    /// Sets an access declaration under a custom attribute name.
    pub fn attribute(mut self, name: &str, access: impl Into<RouteAccess>) -> Self {
        self.attributes.insert(name.to_string(), access.into());
        self
    }

    pub fn on_enter(mut self, hook: EnterHook) -> Self {
        self.on_enter = Some(hook);
        self
    }

    pub fn intercept<I: Interceptor + 'static>(mut self, interceptor: I) -> Self {
        self.intercept = Some(Rc::new(interceptor));
        self
    }

    pub(crate) fn set_intercept(&mut self, interceptor: Rc<dyn Interceptor>) {
        self.intercept = Some(interceptor);
    }

    pub fn child(mut self, route: Route) -> Self {
        Rc::make_mut(&mut self.child_routes).push(route);
        self
    }

    // Getters

    pub fn id(&self) -> RouteId {
        self.id
    }

    pub fn get_path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn get_attribute(&self, name: &str) -> Option<&RouteAccess> {
        self.attributes.get(name)
    }

    pub fn get_on_enter(&self) -> Option<&EnterHook> {
        self.on_enter.as_ref()
    }

    pub fn get_intercept(&self) -> Option<&Rc<dyn Interceptor>> {
        self.intercept.as_ref()
    }

    pub fn get_child_routes(&self) -> &[Route] {
        &self.child_routes
    }

    pub(crate) fn child_routes_mut(&mut self) -> &mut Vec<Route> {
        Rc::make_mut(&mut self.child_routes)
    }

    /// Enters this route: through its interceptor when set, else straight
    /// into its enter hook.
    pub fn enter(&self, next_state: NextState, replace: Replace) -> TransitionFuture {
        let next = create_enter_hook(self.on_enter.clone(), self.clone());

        match &self.intercept {
            Some(interceptor) => interceptor.intercept(self, next, next_state, replace),
            None => next(next_state, replace),
        }
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("attributes", &self.attributes)
            .field("on_enter", &self.on_enter.is_some())
            .field("intercept", &self.intercept.is_some())
            .field("child_routes", &self.child_routes)
            .finish()
    }
}
