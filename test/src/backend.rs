//! In-memory authentication backend of the demo.
//!
//! Plays the server side: checks credentials against a fixed user table and
//! issues random session ids.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use lazy_static::lazy_static;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::Value;

use route_security::prelude::*;

lazy_static! {
    /// username -> (password, roles)
    static ref USERS: HashMap<&'static str, (&'static str, Vec<&'static str>)> = {
        let mut users = HashMap::new();
        users.insert("admin", ("admin", vec!["ROLE_ADMIN", "ROLE_USER"]));
        users.insert("user", ("user", vec!["ROLE_USER"]));
        users.insert("guest", ("guest", vec![]));
        users
    };
}

const SESSION_ID_LENGTH: usize = 32;

/// Session store of the backend.
#[derive(Debug, Default)]
pub struct Backend {
    sessions: RefCell<HashMap<String, String>>,
}

impl Backend {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Checks credentials and opens a session.
    pub fn login(&self, username: &str, password: &str) -> Result<Authentication, AuthenticationError> {
        match USERS.get(username) {
            Some((expected, _)) if *expected == password => {
                let session_id: String = rand::thread_rng()
                    .sample_iter(&Alphanumeric)
                    .take(SESSION_ID_LENGTH)
                    .map(char::from)
                    .collect();
                self.sessions
                    .borrow_mut()
                    .insert(session_id.clone(), username.to_string());
                log::info!("Opened session for '{}'", username);
                Ok(session_authentication(username, session_id))
            }
            _ => Err(AuthenticationError::with_status(401, "Bad credentials")),
        }
    }

    /// Resolves an open session.
    pub fn session(&self, session_id: &str) -> Result<Authentication, AuthenticationError> {
        match self.sessions.borrow().get(session_id) {
            Some(username) => Ok(session_authentication(username, session_id.to_string())),
            None => Err(AuthenticationError::with_status(401, "Session expired")),
        }
    }

    /// Closes a session.
    pub fn logout(&self, session_id: &str) -> Result<(), LogoutError> {
        match self.sessions.borrow_mut().remove(session_id) {
            Some(username) => {
                log::info!("Closed session of '{}'", username);
                Ok(())
            }
            None => Err(LogoutError::with_status(404, "Unknown session")),
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.borrow().len()
    }
}

fn session_authentication(username: &str, session_id: String) -> Authentication {
    let roles = USERS
        .get(username)
        .map(|(_, roles)| roles.clone())
        .unwrap_or_default();

    Authentication::new()
        .authentication_type("session")
        .principal(username)
        .details(session_id)
        .authorities(&roles)
        .authenticated(true)
}

fn session_id(authentication: &Authentication) -> Option<String> {
    authentication
        .get_details()
        .and_then(Value::as_str)
        .map(String::from)
}

/// Provider of `form` authentications: principal and `password` attribute.
pub fn form_provider(backend: Rc<Backend>) -> impl AuthenticationProvider {
    move |authentication: Authentication| {
        let password = authentication
            .get_attribute("password")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let result = backend.login(authentication.get_name(), &password);
        async move { result }
    }
}

/// Provider of `session` authentications: session id in the details.
pub fn session_provider(backend: Rc<Backend>) -> impl AuthenticationProvider {
    move |authentication: Authentication| {
        let result = match session_id(&authentication) {
            Some(session_id) => backend.session(&session_id),
            None => Err(AuthenticationError::provider("No session")),
        };
        async move { result }
    }
}

/// Logout handler closing the session of `session` authentications.
pub fn session_logout(backend: Rc<Backend>) -> impl LogoutHandler {
    move |authentication: Authentication| {
        let result = match session_id(&authentication) {
            Some(session_id) => backend.logout(&session_id),
            None => Err(LogoutError::handler("No session")),
        };
        async move { result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_login_opens_session() {
        let backend = Backend::new();
        let authentication = backend.login("admin", "admin").unwrap();

        assert!(authentication.is_authenticated());
        assert!(authentication.has_all_authorities(&["ROLE_ADMIN", "ROLE_USER"]));
        assert_eq!(session_id(&authentication).map(|id| id.len()), Some(SESSION_ID_LENGTH));
        assert_eq!(backend.session_count(), 1);
    }

    #[test]
    fn test_bad_credentials() {
        let error = Backend::new().login("admin", "wrong").unwrap_err();
        assert_eq!(error.status(), Some(401));
    }

    #[test]
    fn test_session_provider_resolves_open_session() {
        let backend = Backend::new();
        let opened = backend.login("user", "user").unwrap();
        let stale = Authentication::new()
            .authentication_type("session")
            .details(session_id(&opened).unwrap_or_default());

        let provider = session_provider(Rc::clone(&backend));
        let refreshed = block_on(provider.authenticate(stale)).unwrap();

        assert_eq!(refreshed, opened);
    }

    #[test]
    fn test_logout_closes_session() {
        let backend = Backend::new();
        let opened = backend.login("user", "user").unwrap();
        let handler = session_logout(Rc::clone(&backend));

        assert!(block_on(handler.logout(opened.clone())).is_ok());
        assert_eq!(backend.session_count(), 0);
        assert!(block_on(handler.logout(opened)).is_err());
    }
}
