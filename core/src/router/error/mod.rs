pub mod security_error;

pub use security_error::{HookError, SecurityError, SpecialRoute, TransitionError};
