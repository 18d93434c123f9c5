use async_trait::async_trait;

use super::{
    FieldKind, FormError, FormField, Hook, HookContext, HookResult, LoginFormRender,
    LoginFormValidate, RejectionKind,
};
use crate::observability::metrics;

pub const LOGIN_LINK_FIELD: &str = "cas_login_link";
pub const LOGIN_VALIDATOR: &str = "cas_login_validate";
const NAME_FIELD: &str = "name";

/// Adds the CAS login link (when enabled) and registers the CAS login
/// validator.
pub struct AddLoginLink;

#[async_trait]
impl Hook<LoginFormRender> for AddLoginLink {
    fn name(&self) -> &'static str {
        "add_cas_login_link"
    }

    async fn handle(&self, ctx: &HookContext, event: &mut LoginFormRender) -> HookResult<()> {
        let settings = &ctx.settings;
        if settings.login_link_enabled {
            event.form.insert_field(
                LOGIN_LINK_FIELD,
                FormField::new(
                    FieldKind::Link {
                        url: settings.login_path.clone(),
                    },
                    settings.login_link_label.clone(),
                )
                .with_weight(-10),
            );
        }
        event.form.add_validator(LOGIN_VALIDATOR);
        Ok(())
    }
}

/// Rejects local password logins for CAS-associated accounts when normal
/// login is prevented.
pub struct BlockLocalLogin;

#[async_trait]
impl Hook<LoginFormValidate> for BlockLocalLogin {
    fn name(&self) -> &'static str {
        LOGIN_VALIDATOR
    }

    async fn handle(&self, ctx: &HookContext, event: &mut LoginFormValidate) -> HookResult<()> {
        if !ctx.settings.prevent_normal_login {
            return Ok(());
        }
        let Some(account_id) = event.resolved_account else {
            return Ok(());
        };

        if ctx.cas_users().is_cas_user(account_id).await? {
            tracing::info!(account_id = %account_id, "Local login refused for CAS account");
            metrics::record_policy_rejection("prevent_normal_login");
            let login_path = &ctx.settings.login_path;
            event.form.set_error(FormError {
                field: NAME_FIELD.to_string(),
                kind: RejectionKind::Policy,
                message: format!(
                    "This account must log in through CAS. Use the CAS login at {login_path} instead."
                ),
                link: Some(login_path.clone()),
            });
        }
        Ok(())
    }
}
