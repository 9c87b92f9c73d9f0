//! Reference host router.
//!
//! [`Navigator`] matches a location against a route tree and enters the
//! matched routes the way a single-page application router does:
//! - only routes that were not active after the previous successful
//!   navigation are entered
//! - routes are entered one at a time, root to leaf
//! - entering stops at the first redirect or error
//!
//! Each navigation is a transition of its own [`TransitionId`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::router::error::TransitionError;
use crate::router::route::{Location, NextState, Replace, Route, RouteId, TransitionId};

/// Result of a navigation, in the shape of a router match callback.
#[derive(Debug, Default)]
pub struct NavigationOutcome {
    pub error: Option<TransitionError>,
    pub redirect: Option<Location>,
    /// Routes to render; empty unless the navigation completed.
    pub routes: Vec<Route>,
}

impl NavigationOutcome {
    /// Whether the target location can be rendered.
    pub fn is_rendered(&self) -> bool {
        self.error.is_none() && self.redirect.is_none() && !self.routes.is_empty()
    }
}

/// In-memory router driving route enter hooks.
///
/// # Example
/// ```
/// use futures::executor::block_on;
/// use route_security_core::router::navigator::Navigator;
/// use route_security_core::router::route::Route;
///
/// let navigator = Navigator::new(vec![Route::new("/").child(Route::new("users/:id"))]);
/// let outcome = block_on(navigator.navigate("/users/42"));
///
/// assert!(outcome.is_rendered());
/// assert_eq!(outcome.routes.len(), 2);
/// ```
pub struct Navigator {
    routes: Vec<Route>,
    active: RefCell<Vec<RouteId>>,
}

impl Navigator {
    pub fn new(routes: Vec<Route>) -> Self {
        Navigator {
            routes,
            active: RefCell::new(Vec::new()),
        }
    }

    /// Matches `pathname` against the route tree.
    ///
    /// Returns the matched routes, root to leaf, and the path parameters.
    pub fn match_routes(&self, pathname: &str) -> Option<(Vec<Route>, HashMap<String, String>)> {
        let segments = split_segments(pathname);
        let mut params = HashMap::new();

        self.routes
            .iter()
            .find_map(|route| match_route(route, &segments, &mut params))
            .map(|routes| (routes, params))
    }

    /// Navigates to `location`.
    pub async fn navigate(&self, location: impl Into<Location>) -> NavigationOutcome {
        let location = location.into();

        let (routes, params) = match self.match_routes(&location.pathname) {
            Some(matched) => matched,
            None => {
                log::debug!("No route matches '{}'", location.pathname);
                return NavigationOutcome::default();
            }
        };

        let next_state = NextState {
            id: TransitionId::next(),
            routes: routes.clone(),
            location,
            params,
        };
        log::debug!(
            "Transition {} to '{}'",
            next_state.id,
            next_state.location.pathname
        );

        let redirect = Rc::new(RefCell::new(None));
        let replace = {
            let redirect = Rc::clone(&redirect);
            Replace::new(move |location| *redirect.borrow_mut() = Some(location))
        };

        let entering = self.entering(&routes);
        for route in &routes[entering..] {
            let result = route.enter(next_state.clone(), replace.clone()).await;

            if let Err(error) = result {
                log::debug!("Transition {} failed: {}", next_state.id, error);
                return NavigationOutcome {
                    error: Some(error),
                    ..NavigationOutcome::default()
                };
            }

            let redirected = redirect.borrow_mut().take();
            if let Some(location) = redirected {
                log::debug!(
                    "Transition {} redirected to '{}'",
                    next_state.id,
                    location.pathname
                );
                return NavigationOutcome {
                    redirect: Some(location),
                    ..NavigationOutcome::default()
                };
            }
        }

        *self.active.borrow_mut() = routes.iter().map(Route::id).collect();

        NavigationOutcome {
            routes,
            ..NavigationOutcome::default()
        }
    }

    /// Index of the first route of `routes` to enter.
    fn entering(&self, routes: &[Route]) -> usize {
        let active = self.active.borrow();

        routes
            .iter()
            .zip(active.iter())
            .take_while(|(route, id)| route.id() == **id)
            .count()
    }
}

fn split_segments(pathname: &str) -> Vec<&str> {
    pathname.split('/').filter(|s| !s.is_empty()).collect()
}

fn match_route(route: &Route, segments: &[&str], params: &mut HashMap<String, String>) -> Option<Vec<Route>> {
    let rest = match route.get_path() {
        Some(path) => {
            let pattern = split_segments(path);
            if pattern.len() > segments.len() {
                return None;
            }

            let mut bound = Vec::new();
            for (part, segment) in pattern.iter().zip(segments) {
                match part.strip_prefix(':') {
                    Some(name) => bound.push((name.to_string(), segment.to_string())),
                    None if part == segment => {}
                    None => return None,
                }
            }

            let rest = &segments[pattern.len()..];
            let children = route
                .get_child_routes()
                .iter()
                .find_map(|child| match_route(child, rest, params));

            let matched = match children {
                Some(children) => Some(children),
                None if rest.is_empty() => Some(Vec::new()),
                None => None,
            };
            if matched.is_some() {
                params.extend(bound);
            }
            return matched.map(|children| prepend(route, children));
        }
        None => segments,
    };

    route
        .get_child_routes()
        .iter()
        .find_map(|child| match_route(child, rest, params))
        .or_else(|| (rest.is_empty() && route.get_child_routes().is_empty()).then(Vec::new))
        .map(|children| prepend(route, children))
}

fn prepend(route: &Route, children: Vec<Route>) -> Vec<Route> {
    let mut routes = Vec::with_capacity(children.len() + 1);
    routes.push(route.clone());
    routes.extend(children);
    routes
}
