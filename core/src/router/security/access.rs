//! Route access declarations and the access decision.
//!
//! # Spring Security Equivalent
//! `ConfigAttribute` + `AccessDecisionManager`
//!
//! A route declares its requirement as a comma-separated string of tokens
//! (`"ROLE_USER, ROLE_ADMIN"`) or as a sequence of tokens. Every non-empty
//! token must be satisfied:
//! - `IS_AUTHENTICATED` is satisfied by any authenticated record
//! - `ROLE_*` tokens are satisfied when present in the record's authorities
//! - any other token is never satisfied

use crate::router::security::authentication::Authentication;

/// Token satisfied by any authenticated record.
pub const IS_AUTHENTICATED: &str = "IS_AUTHENTICATED";

/// Prefix marking a token as a role looked up in the authorities.
pub const ROLE_PREFIX: &str = "ROLE_";

/// Access requirement attached to a route.
///
/// # Example
/// ```
/// use route_security_core::router::security::RouteAccess;
///
/// let access = RouteAccess::from("ROLE_USER, ROLE_ADMIN");
/// assert_eq!(access.tokens(), vec!["ROLE_USER", "ROLE_ADMIN"]);
///
/// let access = RouteAccess::from(vec!["ROLE_USER", " IS_AUTHENTICATED "]);
/// assert_eq!(access.tokens(), vec!["ROLE_USER", "IS_AUTHENTICATED"]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteAccess {
    /// Comma-separated tokens.
    Expression(String),
    /// Sequence of tokens.
    Tokens(Vec<String>),
}

impl RouteAccess {
    /// Returns the trimmed tokens in declaration order, empty ones included.
    pub fn tokens(&self) -> Vec<&str> {
        match self {
            RouteAccess::Expression(expression) => expression.split(',').map(str::trim).collect(),
            RouteAccess::Tokens(tokens) => tokens.iter().map(|t| t.trim()).collect(),
        }
    }

    /// Whether the declaration restricts its route at all.
    ///
    /// An empty expression counts as no declaration; an empty sequence still
    /// requires an authenticated record.
    pub fn is_declared(&self) -> bool {
        match self {
            RouteAccess::Expression(expression) => !expression.is_empty(),
            RouteAccess::Tokens(_) => true,
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            RouteAccess::Expression(expression) => expression.is_empty(),
            RouteAccess::Tokens(tokens) => tokens.is_empty(),
        }
    }
}

impl From<&str> for RouteAccess {
    fn from(expression: &str) -> Self {
        RouteAccess::Expression(expression.to_string())
    }
}

impl From<String> for RouteAccess {
    fn from(expression: String) -> Self {
        RouteAccess::Expression(expression)
    }
}

impl From<Vec<&str>> for RouteAccess {
    fn from(tokens: Vec<&str>) -> Self {
        RouteAccess::Tokens(tokens.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for RouteAccess {
    fn from(tokens: &[&str]) -> Self {
        RouteAccess::Tokens(tokens.iter().map(|t| t.to_string()).collect())
    }
}

impl From<Vec<String>> for RouteAccess {
    fn from(tokens: Vec<String>) -> Self {
        RouteAccess::Tokens(tokens)
    }
}

/// Trait deciding whether an authentication may enter a restricted route.
///
/// # Spring Equivalent
/// `AccessDecisionManager`
///
/// Implemented for every `Fn(&Authentication, Option<&RouteAccess>) -> bool`,
/// so [`decide`] itself can be plugged in.
pub trait AccessDecisionManager {
    fn decide(&self, authentication: &Authentication, access: Option<&RouteAccess>) -> bool;
}

impl<F> AccessDecisionManager for F
where
    F: Fn(&Authentication, Option<&RouteAccess>) -> bool,
{
    fn decide(&self, authentication: &Authentication, access: Option<&RouteAccess>) -> bool {
        self(authentication, access)
    }
}

/// Default access decision.
///
/// Pure: unauthenticated records are always denied; authenticated records
/// are granted when every token of `access` is satisfied.
///
/// # Example
/// ```
/// use route_security_core::router::security::{decide, Authentication, RouteAccess};
///
/// let user = Authentication::new().authorities(&["ROLE_USER"]).authenticated(true);
///
/// assert!(decide(&user, None));
/// assert!(decide(&user, Some(&RouteAccess::from("ROLE_USER"))));
/// assert!(!decide(&user, Some(&RouteAccess::from("ROLE_USER, ROLE_ADMIN"))));
/// ```
pub fn decide(authentication: &Authentication, access: Option<&RouteAccess>) -> bool {
    if !authentication.is_authenticated() {
        return false;
    }

    let access = match access {
        Some(access) if !access.is_empty() => access,
        _ => return true,
    };

    access.tokens().into_iter().all(|token| match token {
        "" | IS_AUTHENTICATED => true,
        role if role.starts_with(ROLE_PREFIX) => authentication.has_authority(role),
        _ => false,
    })
}
