//! Glue between the host's form, session and role events and the CAS stores.
//!
//! Each host event has a typed payload ([`events`]). Handlers implement
//! [`Hook`] for the payloads they care about and are registered, in order, on
//! a [`HookRegistry`]. The host builds a [`HookContext`] per request and calls
//! [`HookRegistry::dispatch`].
//!
//! Form validation outcomes are recorded on the payload's [`Form`]; only
//! storage failures surface as errors from `dispatch`.

mod accounts;
mod context;
mod error;
mod events;
mod form;
mod login_form;
mod password_reset;
mod registry;
mod roles;
mod session;
mod user_form;

pub use context::HookContext;
pub use error::{HookError, HookResult};
pub use events::*;
pub use form::{FieldKind, Form, FormError, FormField, FormId, RejectionKind};
pub use login_form::{LOGIN_LINK_FIELD, LOGIN_VALIDATOR};
pub use registry::{Hook, HookRegistry};
pub use user_form::{CAS_USERNAME_FIELD, CURRENT_PASSWORD_FIELD, EMAIL_FIELD, PASSWORD_FIELD};
