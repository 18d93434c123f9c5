use std::{any::Any, collections::HashMap, sync::Arc};

use async_trait::async_trait;

use super::{
    AccountDeleted, CasLoginCompleted, Event, EventKind, HookContext, HookResult,
    LoginFormRender, LoginFormValidate, Logout, PasswordResetValidate, RegisterFormRender,
    RegisterFormSubmit, RoleDeleted, UserFormRender, UserFormSubmit, UserFormValidate, accounts,
    login_form, password_reset, roles, session, user_form,
};

/// A handler for one event type.
#[async_trait]
pub trait Hook<E: Event>: Send + Sync {
    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    async fn handle(&self, ctx: &HookContext, event: &mut E) -> HookResult<()>;
}

/// Ordered handlers per event kind.
///
/// Each entry is an `Arc<dyn Hook<E>>` boxed as `Any`; the event's
/// [`EventKind`] guarantees the downcast target.
#[derive(Default)]
pub struct HookRegistry {
    handlers: HashMap<EventKind, Vec<Box<dyn Any + Send + Sync>>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every CAS handler installed.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .register::<UserFormRender, _>(user_form::InjectUsernameField)
            .register::<UserFormRender, _>(user_form::RestrictCredentialFields)
            .register::<UserFormValidate, _>(user_form::ValidateUsernameUnique)
            .register::<UserFormSubmit, _>(user_form::SaveUsername)
            .register::<RegisterFormRender, _>(user_form::InjectUsernameField)
            .register::<RegisterFormSubmit, _>(user_form::SaveUsername)
            .register::<PasswordResetValidate, _>(password_reset::BlockCasPasswordReset)
            .register::<LoginFormRender, _>(login_form::AddLoginLink)
            .register::<LoginFormValidate, _>(login_form::BlockLocalLogin)
            .register::<CasLoginCompleted, _>(session::RecordLoginData)
            .register::<Logout, _>(session::DeleteLoginData)
            .register::<RoleDeleted, _>(roles::PruneAutoAssignedRole)
            .register::<AccountDeleted, _>(accounts::RemoveAssociation);
        registry
    }

    pub fn register<E, H>(&mut self, hook: H) -> &mut Self
    where
        E: Event,
        H: Hook<E> + 'static,
    {
        let hook: Arc<dyn Hook<E>> = Arc::new(hook);
        self.handlers.entry(E::KIND).or_default().push(Box::new(hook));
        self
    }

    fn handlers<E: Event>(&self) -> impl Iterator<Item = &Arc<dyn Hook<E>>> {
        self.handlers
            .get(&E::KIND)
            .into_iter()
            .flatten()
            .filter_map(|h| h.downcast_ref::<Arc<dyn Hook<E>>>())
    }

    /// Names of the handlers registered for `E`, in dispatch order.
    pub fn handler_names<E: Event>(&self) -> Vec<&'static str> {
        self.handlers::<E>().map(|h| h.name()).collect()
    }

    /// Run every handler for `E` in registration order.
    ///
    /// Stops at the first handler error. Form rejections are not errors here;
    /// they are recorded on the event's form.
    pub async fn dispatch<E: Event>(&self, ctx: &HookContext, event: &mut E) -> HookResult<()> {
        for hook in self.handlers::<E>() {
            if let Err(e) = hook.handle(ctx, event).await {
                tracing::warn!(hook = hook.name(), kind = ?E::KIND, error = %e, "Hook failed");
                return Err(e);
            }
        }
        Ok(())
    }
}
