//! Interception of route subtrees.
//!
//! A route declaring an [`Interceptor`](crate::router::route::Interceptor)
//! passes it down to every descendant, so each route of the subtree is
//! entered through it. A descendant declaring an interceptor of its own keeps
//! it, and passes that one down instead.

use std::rc::Rc;

use crate::router::route::{Interceptor, Route};

/// Builder of intercepted route trees.
///
/// # Example
/// ```
/// use route_security_core::router::intercept::InterceptRoute;
/// use route_security_core::router::route::{Next, NextState, Replace, Route};
///
/// let routes = InterceptRoute::create(
///     Route::new("/")
///         .intercept(|_: &Route, next: Next, next_state: NextState, replace: Replace| {
///             next(next_state, replace)
///         })
///         .child(Route::new("level-1").child(Route::new("level-2"))),
/// );
///
/// let level_2 = &routes.get_child_routes()[0].get_child_routes()[0];
/// assert!(level_2.get_intercept().is_some());
/// ```
pub struct InterceptRoute;

impl InterceptRoute {
    /// Propagates the interceptor of `route` to its whole subtree.
    ///
    /// A route without interceptor is returned unchanged.
    pub fn create(mut route: Route) -> Route {
        if let Some(interceptor) = route.get_intercept().cloned() {
            intercept_children(&mut route, &interceptor);
        }
        route
    }
}

fn intercept_children(route: &mut Route, interceptor: &Rc<dyn Interceptor>) {
    for child in route.child_routes_mut() {
        let interceptor = match child.get_intercept() {
            Some(own) => Rc::clone(own),
            None => {
                child.set_intercept(Rc::clone(interceptor));
                Rc::clone(interceptor)
            }
        };
        intercept_children(child, &interceptor);
    }
}
