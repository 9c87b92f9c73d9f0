//! State container contract and the security context adapter.
//!
//! The state container is owned by the embedding application; the core only
//! reads it and dispatches [`SecurityAction`]s to it. [`MemoryStore`] is a
//! reducer-driven container for applications without one of their own.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::router::error::SecurityError;
use crate::router::security::authentication::Authentication;
use crate::router::security::context::{RootState, SecurityAction, SecurityContext};
use crate::router::security::provider::AuthenticationError;

/// Process-wide state container.
pub trait Store {
    type State;

    /// Returns a snapshot of the current state.
    fn get_state(&self) -> Self::State;

    /// Applies an action to the state.
    fn dispatch(&self, action: SecurityAction);
}

/// Selects the security context slice from the container state.
pub type SecurityContextSelector<S> = Rc<dyn Fn(&S) -> Option<SecurityContext>>;

/// Reducer-driven in-memory state container.
///
/// Clones share the same state.
///
/// # Example
/// ```
/// use route_security_core::router::security::{MemoryStore, SecurityAction, Store};
///
/// let store = MemoryStore::with_security_context();
/// store.dispatch(SecurityAction::AuthenticationRequired);
///
/// assert!(store.get_state().security_context.unwrap().authentication_required);
/// ```
pub struct MemoryStore<S> {
    state: Rc<RefCell<S>>,
    reducer: Rc<dyn Fn(&S, &SecurityAction) -> S>,
}

impl<S> MemoryStore<S> {
    pub fn new<R>(initial: S, reducer: R) -> Self
    where
        R: Fn(&S, &SecurityAction) -> S + 'static,
    {
        MemoryStore {
            state: Rc::new(RefCell::new(initial)),
            reducer: Rc::new(reducer),
        }
    }
}

impl MemoryStore<RootState> {
    /// Store holding an initial security context.
    pub fn with_security_context() -> Self {
        Self::new(RootState::default(), RootState::reduce)
    }

    /// Store of a container that never registered the security context.
    pub fn without_security_context() -> Self {
        Self::new(RootState::without_security_context(), RootState::reduce)
    }
}

impl<S> Clone for MemoryStore<S> {
    fn clone(&self) -> Self {
        MemoryStore {
            state: Rc::clone(&self.state),
            reducer: Rc::clone(&self.reducer),
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for MemoryStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("state", &self.state.borrow())
            .finish()
    }
}

impl<S: Clone> Store for MemoryStore<S> {
    type State = S;

    fn get_state(&self) -> S {
        self.state.borrow().clone()
    }

    fn dispatch(&self, action: SecurityAction) {
        log::debug!("Dispatching {}", action.action_type());
        let next = (self.reducer)(&self.state.borrow(), &action);
        *self.state.borrow_mut() = next;
    }
}

/// Read/dispatch adapter over the security context slice of a store.
pub struct SecurityContextStore<St: Store> {
    store: St,
    selector: SecurityContextSelector<St::State>,
}

impl<St: Store> SecurityContextStore<St> {
    pub fn new(store: St, selector: SecurityContextSelector<St::State>) -> Self {
        SecurityContextStore { store, selector }
    }

    /// Reads the security context.
    ///
    /// Fails when the container has no security context slice.
    pub fn read(&self) -> Result<SecurityContext, SecurityError> {
        (self.selector)(&self.store.get_state()).ok_or(SecurityError::MissingSecurityContext)
    }

    pub fn dispatch_authentication(&self, authentication: Option<Authentication>) {
        self.store
            .dispatch(SecurityAction::Authentication(authentication));
    }

    pub fn dispatch_authentication_error(&self, error: AuthenticationError) {
        self.store
            .dispatch(SecurityAction::AuthenticationFailed(error));
    }

    pub fn dispatch_authentication_required(&self) {
        self.store.dispatch(SecurityAction::AuthenticationRequired);
    }

    pub fn store(&self) -> &St {
        &self.store
    }
}
