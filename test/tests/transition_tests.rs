//! Transition lifecycle tests.
//!
//! Decisions taken once per transition, and refreshes resolving after a
//! newer transition started.


use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use route_security::prelude::*;
use route_security::router::route::TransitionId;

use common::{authenticated, counting_hook, counting_manager, create_security, security_context, Counter};

/// Authentication manager resolving with whatever is sent through the
/// returned sender.
fn pending_manager() -> (
    oneshot::Sender<Result<Authentication, AuthenticationError>>,
    impl AuthenticationManager + 'static,
) {
    let (sender, receiver) = oneshot::channel();
    let receiver = Rc::new(RefCell::new(Some(receiver)));

    let manager = move |_: Authentication| {
        let receiver = receiver.borrow_mut().take();
        async move {
            match receiver {
                Some(receiver) => receiver
                    .await
                    .unwrap_or_else(|_| Err(AuthenticationError::provider("Refresh cancelled"))),
                None => Err(AuthenticationError::provider("Refresh already pending")),
            }
        }
    };

    (sender, manager)
}

fn stale_session() -> Authentication {
    Authentication::new()
        .authentication_type("session")
        .principal("jdoe")
}

fn guarded_tree(security: &common::TestSecurity) -> Route {
    Route::pathless()
        .intercept(security.clone())
        .child(Route::new("/login"))
        .child(Route::new("/").access("ROLE_USER").child(Route::new("dashboard")))
}

// =============================================================================
// Decision Per Transition
// =============================================================================

#[tokio::test]
async fn test_every_transition_decides_again() {
    let calls = Counter::new();
    let security = create_security(
        SecurityConfig::new()
            .authentication_manager(counting_manager(&calls, Err(AuthenticationError::provider("Session expired")))),
    );
    let navigator = common::navigator(guarded_tree(&security));

    security.authenticate(stale_session());
    let first = navigator.navigate("/dashboard").await;

    security.authenticate(stale_session());
    let second = navigator.navigate("/dashboard").await;

    assert_eq!(calls.get(), 2);
    assert_eq!(first.redirect.map(|l| l.pathname), Some("/login".to_string()));
    assert_eq!(second.redirect.map(|l| l.pathname), Some("/login".to_string()));
}

#[tokio::test]
async fn test_granted_transition_enters_remaining_routes() {
    let entries = Counter::new();
    let security = create_security(SecurityConfig::new());
    let navigator = common::navigator(
        Route::pathless().intercept(security.clone()).child(
            Route::new("/")
                .access("ROLE_USER")
                .on_enter(counting_hook(&entries))
                .child(Route::new("dashboard").on_enter(counting_hook(&entries)))
                .child(Route::new("settings").on_enter(counting_hook(&entries))),
        ),
    );

    security.authenticate(authenticated(&["ROLE_USER"]));
    let dashboard = navigator.navigate("/dashboard").await;
    let settings = navigator.navigate("/settings").await;

    assert!(dashboard.is_rendered());
    assert!(settings.is_rendered());
    assert_eq!(entries.get(), 3);
}

#[tokio::test]
async fn test_access_revoked_between_transitions() {
    let security = create_security(SecurityConfig::new());
    let navigator = common::navigator(guarded_tree(&security));

    security.authenticate(authenticated(&["ROLE_USER"]));
    let granted = navigator.navigate("/dashboard").await;

    let login = navigator.navigate("/login").await;

    security.authenticate(authenticated(&[]));
    let denied = navigator.navigate("/dashboard").await;

    assert!(granted.is_rendered());
    assert!(login.is_rendered());
    assert_eq!(denied.redirect, Some(Location::new("/access-denied")));
}

#[tokio::test]
async fn test_failed_refresh_calls_provider_once_per_transition() {
    let calls = Counter::new();
    let security = create_security(
        SecurityConfig::new()
            .authentication_manager(counting_manager(&calls, Err(AuthenticationError::provider("Session expired")))),
    );
    let root = Route::new("/").intercept(security.clone());
    let secret = Route::new("secret").access("ROLE_USER").intercept(security.clone());
    let redirects = common::Recorder::new();
    let replace = {
        let redirects = redirects.clone();
        Replace::new(move |location| redirects.record(location.pathname))
    };
    let next_state = NextState::new(TransitionId::next(), vec![root.clone(), secret.clone()], "/secret");

    security.authenticate(stale_session());
    let entered_root = root.enter(next_state.clone(), replace.clone()).await;
    let entered_secret = secret.enter(next_state, replace).await;

    assert_eq!(calls.get(), 1);
    assert!(entered_root.is_ok());
    assert!(entered_secret.is_ok());
    assert_eq!(redirects.events(), vec!["/login"]);
}

// =============================================================================
// Superseded Transitions
// =============================================================================

#[tokio::test]
async fn test_refresh_of_latest_transition_is_committed() {
    let (sender, manager) = pending_manager();
    let security = create_security(SecurityConfig::new().authentication_manager(manager));
    let navigator = common::navigator(guarded_tree(&security));
    let refreshed = authenticated(&["ROLE_USER"]).principal("jdoe");

    security.authenticate(stale_session());
    let refresh = async {
        let _ = sender.send(Ok(refreshed.clone()));
    };
    let (outcome, ()) = futures::join!(navigator.navigate("/dashboard"), refresh);

    assert!(outcome.is_rendered());
    assert_eq!(security_context(&security).authentication, Some(refreshed));
}

#[tokio::test]
async fn test_superseded_refresh_is_discarded() {
    let (sender, manager) = pending_manager();
    let security = create_security(SecurityConfig::new().authentication_manager(manager));
    let navigator = common::navigator(guarded_tree(&security));

    security.authenticate(stale_session());
    let newer = async {
        let outcome = navigator.navigate("/login").await;
        let _ = sender.send(Ok(authenticated(&["ROLE_USER"])));
        outcome
    };
    let (older, newer) = futures::join!(navigator.navigate("/dashboard"), newer);
    let context = security_context(&security);

    assert!(matches!(
        older.error,
        Some(TransitionError::Security(SecurityError::TransitionSuperseded { .. }))
    ));
    assert!(older.redirect.is_none());
    assert!(newer.is_rendered());
    assert_eq!(context.authentication, Some(stale_session()));
    assert!(context.authentication_error.is_none());
    assert!(!context.authentication_required);
}

#[tokio::test]
async fn test_superseded_refresh_failure_is_discarded() {
    let (sender, manager) = pending_manager();
    let security = create_security(SecurityConfig::new().authentication_manager(manager));
    let navigator = common::navigator(guarded_tree(&security));

    security.authenticate(stale_session());
    let newer = async {
        let outcome = navigator.navigate("/login").await;
        let _ = sender.send(Err(AuthenticationError::with_status(401, "Session expired")));
        outcome
    };
    let (older, _) = futures::join!(navigator.navigate("/dashboard"), newer);

    assert!(matches!(
        older.error,
        Some(TransitionError::Security(SecurityError::TransitionSuperseded { .. }))
    ));
    assert!(security_context(&security).authentication_error.is_none());
}
