//! Authentication record.
//!
//! # Spring Equivalent
//! `Authentication` interface
//!
//! A record is an immutable value: it is replaced wholesale in the security
//! context whenever authentication changes.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const KNOWN_FIELDS: [&str; 8] = [
    "type",
    "name",
    "principal",
    "credentials",
    "details",
    "authorities",
    "isAuthenticated",
    "forceLogout",
];

/// Canonical description of an identity and its authentication status.
///
/// # Example
/// ```
/// use route_security_core::router::security::Authentication;
///
/// let authentication = Authentication::new()
///     .authentication_type("form")
///     .principal("admin")
///     .authorities(&["ROLE_ADMIN", "ROLE_USER"])
///     .authenticated(true);
///
/// assert_eq!(authentication.get_name(), "admin");
/// assert!(authentication.has_authority("ROLE_ADMIN"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Authentication {
    #[serde(rename = "type")]
    authentication_type: Option<String>,
    name: String,
    principal: Option<Value>,
    credentials: Option<Value>,
    details: Option<Value>,
    authorities: Vec<String>,
    is_authenticated: bool,
    force_logout: bool,
    #[serde(flatten)]
    attributes: Map<String, Value>,
}

impl Authentication {
    /// Creates an empty, unauthenticated record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tag of the strategy able to authenticate this record.
    pub fn authentication_type(mut self, authentication_type: &str) -> Self {
        self.authentication_type = Some(authentication_type.to_string()).filter(|t| !t.is_empty());
        self
    }

    /// Sets the display name. Defaults to the stringified principal.
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Sets the principal; falsy values are treated as absent.
    ///
    /// A name still derived from the previous principal follows the new one.
    pub fn principal(mut self, principal: impl Into<Value>) -> Self {
        let derived = self.principal.as_ref().map(stringify).unwrap_or_default();
        self.principal = Some(principal.into()).filter(is_truthy);
        if self.name == derived {
            self.name = self.principal.as_ref().map(stringify).unwrap_or_default();
        }
        self
    }

    pub fn credentials(mut self, credentials: impl Into<Value>) -> Self {
        self.credentials = Some(credentials.into()).filter(is_truthy);
        self
    }

    pub fn details(mut self, details: impl Into<Value>) -> Self {
        self.details = Some(details.into()).filter(is_truthy);
        self
    }

    /// Adds authorities to the record (builder pattern).
    pub fn authorities(mut self, authorities: &[&str]) -> Self {
        for authority in authorities {
            if !self.has_authority(authority) {
                self.authorities.push(authority.to_string());
            }
        }
        self
    }

    pub fn authenticated(mut self, is_authenticated: bool) -> Self {
        self.is_authenticated = is_authenticated;
        self
    }

    /// Requests the logout chain to run even while unauthenticated.
    pub fn force_logout(mut self, force_logout: bool) -> Self {
        self.force_logout = force_logout;
        self
    }

    /// Attaches an extra attribute, e.g. a password read by a form provider.
    pub fn attribute(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn get_type(&self) -> Option<&str> {
        self.authentication_type.as_deref()
    }

    /// Returns the type as rendered in diagnostics (`null` when absent).
    pub fn type_label(&self) -> String {
        self.get_type().unwrap_or("null").to_string()
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_principal(&self) -> Option<&Value> {
        self.principal.as_ref()
    }

    pub fn get_credentials(&self) -> Option<&Value> {
        self.credentials.as_ref()
    }

    pub fn get_details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    pub fn get_authorities(&self) -> &[String] {
        &self.authorities
    }

    pub fn get_attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub fn is_force_logout(&self) -> bool {
        self.force_logout
    }

    /// Checks if the record carries a specific authority.
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }

    /// Checks if the record carries ANY of the specified authorities (OR logic).
    pub fn has_any_authority(&self, authorities: &[&str]) -> bool {
        authorities.iter().any(|a| self.has_authority(a))
    }

    /// Checks if the record carries ALL of the specified authorities (AND logic).
    pub fn has_all_authorities(&self, authorities: &[&str]) -> bool {
        authorities.iter().all(|a| self.has_authority(a))
    }

    /// Copy of this record with the authentication flag cleared.
    pub(crate) fn unauthenticated(&self) -> Self {
        Authentication {
            is_authenticated: false,
            ..self.clone()
        }
    }
}

impl fmt::Display for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Authentication {{ type: {}, name: {}, authorities: {:?}, authenticated: {} }}",
            self.type_label(),
            self.name,
            self.authorities,
            self.is_authenticated
        )
    }
}

/// Normalizes arbitrary JSON input into a canonical record.
///
/// Absent input (`null` or any falsy value) stays absent. Every field falls
/// back to its default; `isAuthenticated` and `forceLogout` are coerced from
/// their truthiness. Unknown keys are kept as attributes.
///
/// # Example
/// ```
/// use route_security_core::router::security::create_authentication;
/// use serde_json::json;
///
/// assert!(create_authentication(&json!(null)).is_none());
///
/// let authentication = create_authentication(&json!({ "principal": 42, "isAuthenticated": 1 })).unwrap();
/// assert_eq!(authentication.get_name(), "42");
/// assert!(authentication.is_authenticated());
/// ```
pub fn create_authentication(input: &Value) -> Option<Authentication> {
    if !is_truthy(input) {
        return None;
    }

    let object = input.as_object().cloned().unwrap_or_default();
    let field = |key: &str| object.get(key).filter(|v| is_truthy(v)).cloned();
    let flag = |key: &str| object.get(key).map_or(false, is_truthy);

    let principal = field("principal");
    let name = field("name")
        .map(|name| stringify(&name))
        .or_else(|| principal.as_ref().map(stringify))
        .unwrap_or_default();
    let authorities = match object.get("authorities") {
        Some(Value::Array(values)) => values.iter().filter_map(Value::as_str).fold(
            Vec::new(),
            |mut authorities: Vec<String>, authority| {
                if !authorities.iter().any(|a| a == authority) {
                    authorities.push(authority.to_string());
                }
                authorities
            },
        ),
        Some(Value::String(authority)) if !authority.is_empty() => vec![authority.clone()],
        _ => Vec::new(),
    };
    let attributes = object
        .iter()
        .filter(|(key, _)| !KNOWN_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Some(Authentication {
        authentication_type: field("type").map(|t| stringify(&t)),
        name,
        principal,
        credentials: field("credentials"),
        details: field("details"),
        authorities,
        is_authenticated: flag("isAuthenticated"),
        force_logout: flag("forceLogout"),
        attributes,
    })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
