//! # Route Security Core
//!
//! Authentication and authorization guards for single-page application
//! routers.
//!
//! The core intercepts navigation transitions and decides, per transition,
//! whether the target route may be entered given the current authentication
//! and the access declared on the routes. Outcomes are: proceed, refresh the
//! authentication through a provider, redirect to the login or access-denied
//! route, or run the logout flow.
//!
//! ## Modules
//!
//! - [`router::security`] - Authentication records, access decisions,
//!   providers, logout handlers, the security context and the coordinator
//! - [`router::route`] - Route tree, enter hooks and transition types
//! - [`router::intercept`] - Wrapping of route subtrees with an interceptor
//! - [`router::navigator`] - Reference host router driving enter hooks
//! - [`router::error`] - Error types

pub mod router;
