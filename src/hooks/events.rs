//! Typed payloads for every host event the bridge listens to.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::Form;
use crate::models::{AccountId, RoleId, SessionId};

/// Permission that lets a viewer manage other accounts' credentials.
pub const ADMINISTER_USERS: &str = "administer users";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    UserFormRender,
    UserFormValidate,
    UserFormSubmit,
    RegisterFormRender,
    RegisterFormSubmit,
    PasswordResetValidate,
    LoginFormRender,
    LoginFormValidate,
    CasLoginCompleted,
    Logout,
    RoleDeleted,
    AccountDeleted,
}

/// A payload that can be dispatched through the [`HookRegistry`](super::HookRegistry).
pub trait Event: Send + Sync + 'static {
    const KIND: EventKind;
}

/// Which button submitted a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormAction {
    Save,
    Cancel,
}

/// The account looking at a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub account_id: Option<AccountId>,
    #[serde(default)]
    pub permissions: HashSet<String>,
}

impl Viewer {
    pub fn new(account_id: AccountId) -> Self {
        Self {
            account_id: Some(account_id),
            permissions: HashSet::new(),
        }
    }

    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.insert(permission.into());
        self
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}

/// The account edit form is being built.
#[derive(Debug, Clone)]
pub struct UserFormRender {
    pub form: Form,
    /// Account being edited
    pub account_id: AccountId,
    pub viewer: Viewer,
}

/// The account edit form was submitted and is being validated.
#[derive(Debug, Clone)]
pub struct UserFormValidate {
    pub form: Form,
    pub account_id: AccountId,
    pub triggering_action: FormAction,
}

/// The account edit form passed validation and is being saved.
#[derive(Debug, Clone)]
pub struct UserFormSubmit {
    pub form: Form,
    pub account_id: AccountId,
}

#[derive(Debug, Clone)]
pub struct RegisterFormRender {
    pub form: Form,
}

/// A registration was saved; `account_id` is the newly created account.
#[derive(Debug, Clone)]
pub struct RegisterFormSubmit {
    pub form: Form,
    pub account_id: AccountId,
}

#[derive(Debug, Clone)]
pub struct PasswordResetValidate {
    pub form: Form,
    /// What the user typed: an account name or an email address
    pub name_or_email: String,
}

#[derive(Debug, Clone)]
pub struct LoginFormRender {
    pub form: Form,
}

/// The local login form is being validated.
#[derive(Debug, Clone)]
pub struct LoginFormValidate {
    pub form: Form,
    /// Account the host resolved from the submitted credentials, if any
    pub resolved_account: Option<AccountId>,
}

/// A CAS service ticket was validated and a local session opened.
#[derive(Debug, Clone)]
pub struct CasLoginCompleted {
    pub session_id: SessionId,
    pub ticket: String,
}

#[derive(Debug, Clone)]
pub struct Logout {
    pub session_id: SessionId,
}

#[derive(Debug, Clone)]
pub struct RoleDeleted {
    pub role_id: RoleId,
}

#[derive(Debug, Clone)]
pub struct AccountDeleted {
    pub account_id: AccountId,
}

macro_rules! impl_event {
    ($($ty:ident),* $(,)?) => {
        $(
            impl Event for $ty {
                const KIND: EventKind = EventKind::$ty;
            }
        )*
    };
}

impl_event!(
    UserFormRender,
    UserFormValidate,
    UserFormSubmit,
    RegisterFormRender,
    RegisterFormSubmit,
    PasswordResetValidate,
    LoginFormRender,
    LoginFormValidate,
    CasLoginCompleted,
    Logout,
    RoleDeleted,
    AccountDeleted,
);
