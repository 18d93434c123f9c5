use async_trait::async_trait;

use super::{FormError, Hook, HookContext, HookResult, PasswordResetValidate, RejectionKind};
use crate::observability::metrics;

const NAME_FIELD: &str = "name";
const PASSWORD_MANAGED_BY_CAS: &str = "The requested account is associated with CAS and its password cannot be managed from this website.";

/// Refuses password reset requests for CAS-associated accounts when password
/// management is restricted.
pub struct BlockCasPasswordReset;

#[async_trait]
impl Hook<PasswordResetValidate> for BlockCasPasswordReset {
    fn name(&self) -> &'static str {
        "block_cas_password_reset"
    }

    async fn handle(&self, ctx: &HookContext, event: &mut PasswordResetValidate) -> HookResult<()> {
        if !ctx.settings.restrict_password_management {
            return Ok(());
        }
        let name_or_email = event.name_or_email.trim();
        if name_or_email.is_empty() {
            return Ok(());
        }

        // Email first, then account name
        let account_id = match ctx.accounts.find_by_email(name_or_email).await? {
            Some(id) => Some(id),
            None => ctx.accounts.find_by_name(name_or_email).await?,
        };
        let Some(account_id) = account_id else {
            return Ok(());
        };

        if ctx.cas_users().is_cas_user(account_id).await? {
            tracing::info!(account_id = %account_id, "Password reset refused for CAS account");
            metrics::record_policy_rejection("restrict_password_management");
            event.form.set_error(FormError {
                field: NAME_FIELD.to_string(),
                kind: RejectionKind::Policy,
                message: PASSWORD_MANAGED_BY_CAS.to_string(),
                link: None,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rstest::rstest;

    use super::*;
    use crate::{
        config::CasSettings,
        hooks::{Form, FormId, HookRegistry, context::test_support::context_with_accounts},
        models::AccountId,
        services::MemoryAccountDirectory,
    };

    async fn reset(restrict: bool, typed: &str) -> Form {
        let accounts = Arc::new(MemoryAccountDirectory::new());
        accounts
            .insert(AccountId(1), "casuser", Some("cas@example.com"))
            .await;
        accounts
            .insert(AccountId(2), "localuser", Some("local@example.com"))
            .await;

        let settings = CasSettings {
            restrict_password_management: restrict,
            ..Default::default()
        };
        let ctx = context_with_accounts(settings, accounts).await;
        ctx.cas_users().set(AccountId(1), "jdoe").await.unwrap();

        let mut event = PasswordResetValidate {
            form: Form::new(FormId::UserPass),
            name_or_email: typed.to_string(),
        };
        HookRegistry::with_defaults()
            .dispatch(&ctx, &mut event)
            .await
            .unwrap();
        event.form
    }

    #[rstest]
    #[case::by_name("casuser")]
    #[case::by_email("cas@example.com")]
    #[case::case_insensitive_email("CAS@Example.com")]
    #[tokio::test]
    async fn test_blocks_cas_account(#[case] typed: &str) {
        let form = reset(true, typed).await;
        let errors: Vec<_> = form.errors_for(NAME_FIELD).collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, RejectionKind::Policy);
    }

    #[rstest]
    #[case::local_account("localuser")]
    #[case::unknown("nobody")]
    #[case::blank("  ")]
    #[tokio::test]
    async fn test_allows_non_cas_account(#[case] typed: &str) {
        assert!(!reset(true, typed).await.has_errors());
    }

    #[tokio::test]
    async fn test_unrestricted_allows_cas_account() {
        assert!(!reset(false, "casuser").await.has_errors());
    }
}
