//! Security module guarding route transitions.
//!
//! # Spring Equivalent
//! `org.springframework.security` package
//!
//! # Module Structure
//!
//! - `authentication` - Authentication record and its JSON builder
//! - `access` - Route access declarations and the default access decision
//! - `provider` - Authentication providers and the provider dispatcher (ProviderManager)
//! - `logout` - Logout handlers and the logout chain (LogoutFilter)
//! - `context` - Security context state, actions and reducer
//! - `store` - State container contract, MemoryStore and the context adapter
//! - `config` - Coordinator configuration (SecurityConfig)
//! - `coordinator` - The security coordinator intercepting routes (Security)

// Re-exports for convenience
pub use access::{decide, AccessDecisionManager, RouteAccess, IS_AUTHENTICATED, ROLE_PREFIX};
pub use authentication::{create_authentication, Authentication};
pub use config::{SecurityConfig, DEFAULT_ACCESS_PROPERTY};
pub use context::{RootState, SecurityAction, SecurityContext, SecurityState};
pub use coordinator::Security;
pub use logout::{LogoutError, LogoutFilter, LogoutFuture, LogoutHandler};
pub use provider::{
    AuthenticationError, AuthenticationFuture, AuthenticationManager, AuthenticationProvider,
    ProviderManager,
};
pub use store::{MemoryStore, SecurityContextSelector, SecurityContextStore, Store};

pub mod access;
pub mod authentication;
pub mod config;
pub mod context;
pub mod coordinator;
pub mod logout;
pub mod provider;
pub mod store;
