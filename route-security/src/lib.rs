//! # Route Security
//!
//! Spring Security-inspired authentication and authorization for single-page
//! application routers.
//!
//! This crate re-exports `route-security-core`: the security coordinator, its
//! pluggable strategies and the route tree it intercepts.
//!
//! ## Quick Start
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! route-security = "0.1"
//! ```
//!
//! ## Example
//!
//! ```
//! use futures::executor::block_on;
//! use route_security::prelude::*;
//!
//! let security = Security::new(
//!     MemoryStore::with_security_context(),
//!     SecurityConfig::new().authentication_manager(
//!         ProviderManager::new().provider("session", |authentication: Authentication| async move {
//!             Ok::<_, AuthenticationError>(authentication.authorities(&["ROLE_USER"]).authenticated(true))
//!         }),
//!     ),
//! );
//!
//! let routes = InterceptRoute::create(
//!     Route::pathless()
//!         .intercept(security.clone())
//!         .child(Route::new("/login"))
//!         .child(Route::new("/").access("ROLE_USER")),
//! );
//! let navigator = Navigator::new(vec![routes]);
//!
//! security.authenticate(Authentication::new().authentication_type("session"));
//! assert!(block_on(navigator.navigate("/")).is_rendered());
//! ```
//!
//! ## Modules
//!
//! - [`router::security`] - Authentication, access decisions and the coordinator
//! - [`router::route`] - Route tree and enter hooks
//! - [`router::error`] - Error types

// Re-export everything from route-security-core
pub use route_security_core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use route_security_core::router::error::{HookError, SecurityError, SpecialRoute, TransitionError};
    pub use route_security_core::router::intercept::InterceptRoute;
    pub use route_security_core::router::navigator::{NavigationOutcome, Navigator};
    pub use route_security_core::router::route::{
        EnterHook, Interceptor, Location, Next, NextState, Replace, Route, TransitionFuture,
    };
    pub use route_security_core::router::security::{
        create_authentication, decide, AccessDecisionManager, Authentication, AuthenticationError,
        AuthenticationManager, AuthenticationProvider, LogoutError, LogoutFilter, LogoutHandler,
        MemoryStore, ProviderManager, RootState, RouteAccess, Security, SecurityConfig,
        SecurityContext, SecurityState, Store,
    };
}
