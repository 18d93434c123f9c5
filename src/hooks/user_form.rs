//! Account edit and registration form handlers.

use async_trait::async_trait;

use super::{
    ADMINISTER_USERS, FieldKind, Form, FormAction, FormError, FormField, Hook, HookContext,
    HookResult, RegisterFormRender, RegisterFormSubmit, RejectionKind, UserFormRender,
    UserFormSubmit, UserFormValidate,
};
use crate::{models::AccountId, observability::metrics};

pub const CAS_USERNAME_FIELD: &str = "cas_username";
pub const PASSWORD_FIELD: &str = "pass";
pub const CURRENT_PASSWORD_FIELD: &str = "current_pass";
pub const EMAIL_FIELD: &str = "mail";

const USERNAME_TAKEN: &str = "The specified CAS username is already in use by another user.";

fn username_field(value: Option<String>) -> FormField {
    let mut field = FormField::new(FieldKind::Textfield, "CAS Username")
        .with_description(
            "If necessary, additional permissions and roles may be granted to this account's CAS username.",
        )
        .with_weight(-9);
    field.value = value;
    field
}

/// Adds the `cas_username` field, prefilled with the current association.
pub struct InjectUsernameField;

#[async_trait]
impl Hook<UserFormRender> for InjectUsernameField {
    fn name(&self) -> &'static str {
        "inject_cas_username_field"
    }

    async fn handle(&self, ctx: &HookContext, event: &mut UserFormRender) -> HookResult<()> {
        let current = ctx.cas_users().lookup_username(event.account_id).await?;
        event
            .form
            .insert_field(CAS_USERNAME_FIELD, username_field(current));
        Ok(())
    }
}

#[async_trait]
impl Hook<RegisterFormRender> for InjectUsernameField {
    fn name(&self) -> &'static str {
        "inject_cas_username_field"
    }

    async fn handle(&self, _ctx: &HookContext, event: &mut RegisterFormRender) -> HookResult<()> {
        event.form.insert_field(CAS_USERNAME_FIELD, username_field(None));
        Ok(())
    }
}

/// Hides password fields and locks the email field per the CAS management
/// restrictions.
pub struct RestrictCredentialFields;

#[async_trait]
impl Hook<UserFormRender> for RestrictCredentialFields {
    fn name(&self) -> &'static str {
        "restrict_credential_fields"
    }

    async fn handle(&self, ctx: &HookContext, event: &mut UserFormRender) -> HookResult<()> {
        let settings = &ctx.settings;

        if settings.restrict_password_management && !event.viewer.has_permission(ADMINISTER_USERS)
        {
            for name in [PASSWORD_FIELD, CURRENT_PASSWORD_FIELD] {
                if let Some(field) = event.form.field_mut(name) {
                    field.access = false;
                }
            }
        }

        if settings.restrict_email_management
            && let Some(field) = event.form.field_mut(EMAIL_FIELD)
        {
            field.disabled = true;
        }

        Ok(())
    }
}

/// Rejects a CAS username that already belongs to another account.
pub struct ValidateUsernameUnique;

#[async_trait]
impl Hook<UserFormValidate> for ValidateUsernameUnique {
    fn name(&self) -> &'static str {
        "validate_cas_username_unique"
    }

    async fn handle(&self, ctx: &HookContext, event: &mut UserFormValidate) -> HookResult<()> {
        if event.triggering_action != FormAction::Save {
            return Ok(());
        }
        let Some(username) = event.form.value(CAS_USERNAME_FIELD) else {
            return Ok(());
        };

        if let Some(owner) = ctx.cas_users().lookup_account(username).await?
            && owner != event.account_id
        {
            tracing::debug!(
                account_id = %event.account_id,
                owner = %owner,
                username,
                "CAS username already taken"
            );
            metrics::record_policy_rejection("username_taken");
            event.form.set_error(FormError {
                field: CAS_USERNAME_FIELD.to_string(),
                kind: RejectionKind::UsernameTaken,
                message: USERNAME_TAKEN.to_string(),
                link: None,
            });
        }
        Ok(())
    }
}

/// Stores the submitted username, or removes the association when blank.
pub struct SaveUsername;

async fn save_username(ctx: &HookContext, form: &Form, account_id: AccountId) -> HookResult<()> {
    let users = ctx.cas_users();
    match form.value(CAS_USERNAME_FIELD) {
        Some(username) => users.set(account_id, username).await?,
        None => users.remove(account_id).await?,
    }
    Ok(())
}

#[async_trait]
impl Hook<UserFormSubmit> for SaveUsername {
    fn name(&self) -> &'static str {
        "save_cas_username"
    }

    async fn handle(&self, ctx: &HookContext, event: &mut UserFormSubmit) -> HookResult<()> {
        save_username(ctx, &event.form, event.account_id).await
    }
}

#[async_trait]
impl Hook<RegisterFormSubmit> for SaveUsername {
    fn name(&self) -> &'static str {
        "save_cas_username"
    }

    async fn handle(&self, ctx: &HookContext, event: &mut RegisterFormSubmit) -> HookResult<()> {
        save_username(ctx, &event.form, event.account_id).await
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{
        config::CasSettings,
        db::DbError,
        hooks::{FormId, HookError, HookRegistry, Viewer, context::test_support::context},
    };

    fn edit_form() -> Form {
        Form::new(FormId::UserEdit)
            .with_field("name", FormField::new(FieldKind::Textfield, "Username"))
            .with_field(EMAIL_FIELD, FormField::new(FieldKind::Email, "Email"))
            .with_field(
                PASSWORD_FIELD,
                FormField::new(FieldKind::PasswordConfirm, "Password"),
            )
            .with_field(
                CURRENT_PASSWORD_FIELD,
                FormField::new(FieldKind::Password, "Current password"),
            )
    }

    fn submitted(username: &str) -> Form {
        edit_form().with_field(
            CAS_USERNAME_FIELD,
            FormField::new(FieldKind::Textfield, "CAS Username").with_value(username),
        )
    }

    fn restricted() -> CasSettings {
        CasSettings {
            restrict_password_management: true,
            restrict_email_management: true,
            ..Default::default()
        }
    }

    async fn render(settings: CasSettings, viewer: Viewer) -> (HookContext, Form) {
        let ctx = context(settings).await;
        ctx.cas_users().set(AccountId(7), "jdoe").await.unwrap();
        let mut event = UserFormRender {
            form: edit_form(),
            account_id: AccountId(7),
            viewer,
        };
        HookRegistry::with_defaults()
            .dispatch(&ctx, &mut event)
            .await
            .unwrap();
        (ctx, event.form)
    }

    #[tokio::test]
    async fn test_render_prefills_current_username() {
        let (_, form) = render(CasSettings::default(), Viewer::new(AccountId(7))).await;

        let field = form.field(CAS_USERNAME_FIELD).unwrap();
        assert_eq!(field.kind, FieldKind::Textfield);
        assert_eq!(field.value.as_deref(), Some("jdoe"));
        assert!(field.access);
        assert!(form.field(PASSWORD_FIELD).unwrap().access);
        assert!(!form.field(EMAIL_FIELD).unwrap().disabled);
    }

    #[tokio::test]
    async fn test_render_without_association_leaves_field_empty() {
        let ctx = context(CasSettings::default()).await;
        let mut event = UserFormRender {
            form: edit_form(),
            account_id: AccountId(8),
            viewer: Viewer::new(AccountId(8)),
        };
        HookRegistry::with_defaults()
            .dispatch(&ctx, &mut event)
            .await
            .unwrap();
        assert_eq!(event.form.field(CAS_USERNAME_FIELD).unwrap().value, None);
    }

    #[tokio::test]
    async fn test_render_restricted_hides_passwords_for_regular_viewer() {
        let (_, form) = render(restricted(), Viewer::new(AccountId(7))).await;

        assert!(!form.field(PASSWORD_FIELD).unwrap().access);
        assert!(!form.field(CURRENT_PASSWORD_FIELD).unwrap().access);
        assert!(form.field(EMAIL_FIELD).unwrap().disabled);
    }

    #[tokio::test]
    async fn test_render_restricted_keeps_passwords_for_admin() {
        let admin = Viewer::new(AccountId(1)).with_permission(ADMINISTER_USERS);
        let (_, form) = render(restricted(), admin).await;

        assert!(form.field(PASSWORD_FIELD).unwrap().access);
        assert!(form.field(CURRENT_PASSWORD_FIELD).unwrap().access);
        // Email lock applies regardless of permission
        assert!(form.field(EMAIL_FIELD).unwrap().disabled);
    }

    #[tokio::test]
    async fn test_render_tolerates_missing_current_password_field() {
        let ctx = context(restricted()).await;
        let mut form = edit_form();
        form.fields.remove(CURRENT_PASSWORD_FIELD);
        let mut event = UserFormRender {
            form,
            account_id: AccountId(7),
            viewer: Viewer::default(),
        };
        HookRegistry::with_defaults()
            .dispatch(&ctx, &mut event)
            .await
            .unwrap();

        assert!(!event.form.field(PASSWORD_FIELD).unwrap().access);
        assert!(event.form.field(CURRENT_PASSWORD_FIELD).is_none());
    }

    #[tokio::test]
    async fn test_register_render_injects_empty_field() {
        let ctx = context(restricted()).await;
        let mut event = RegisterFormRender {
            form: Form::new(FormId::UserRegister),
        };
        HookRegistry::with_defaults()
            .dispatch(&ctx, &mut event)
            .await
            .unwrap();

        let field = event.form.field(CAS_USERNAME_FIELD).unwrap();
        assert_eq!(field.value, None);
        assert!(field.access);
    }

    #[tokio::test]
    async fn test_validate_rejects_username_of_other_account() {
        let ctx = context(CasSettings::default()).await;
        ctx.cas_users().set(AccountId(1), "taken").await.unwrap();

        let mut event = UserFormValidate {
            form: submitted(" taken "),
            account_id: AccountId(2),
            triggering_action: FormAction::Save,
        };
        HookRegistry::with_defaults()
            .dispatch(&ctx, &mut event)
            .await
            .unwrap();

        let errors: Vec<_> = event.form.errors_for(CAS_USERNAME_FIELD).collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, RejectionKind::UsernameTaken);
        assert!(matches!(event.form.check(), Err(HookError::Rejected(_))));

        // Validation never mutates associations
        assert_eq!(
            ctx.cas_users().lookup_username(AccountId(2)).await.unwrap(),
            None
        );
    }

    #[rstest]
    #[case::own_username(AccountId(1), "taken", FormAction::Save)]
    #[case::free_username(AccountId(2), "free", FormAction::Save)]
    #[case::blank(AccountId(2), "   ", FormAction::Save)]
    #[case::cancel(AccountId(2), "taken", FormAction::Cancel)]
    #[tokio::test]
    async fn test_validate_accepts(
        #[case] account_id: AccountId,
        #[case] username: &str,
        #[case] action: FormAction,
    ) {
        let ctx = context(CasSettings::default()).await;
        ctx.cas_users().set(AccountId(1), "taken").await.unwrap();

        let mut event = UserFormValidate {
            form: submitted(username),
            account_id,
            triggering_action: action,
        };
        HookRegistry::with_defaults()
            .dispatch(&ctx, &mut event)
            .await
            .unwrap();
        assert!(!event.form.has_errors());
    }

    #[tokio::test]
    async fn test_submit_sets_then_blank_removes() {
        let ctx = context(CasSettings::default()).await;
        let registry = HookRegistry::with_defaults();

        let mut event = UserFormSubmit {
            form: submitted("jdoe"),
            account_id: AccountId(3),
        };
        registry.dispatch(&ctx, &mut event).await.unwrap();
        assert_eq!(
            ctx.cas_users().lookup_username(AccountId(3)).await.unwrap(),
            Some("jdoe".to_string())
        );

        let mut event = UserFormSubmit {
            form: submitted(""),
            account_id: AccountId(3),
        };
        registry.dispatch(&ctx, &mut event).await.unwrap();
        assert_eq!(
            ctx.cas_users().lookup_username(AccountId(3)).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_submit_conflict_propagates_as_storage_error() {
        let ctx = context(CasSettings::default()).await;
        ctx.cas_users().set(AccountId(1), "taken").await.unwrap();

        let mut event = UserFormSubmit {
            form: submitted("taken"),
            account_id: AccountId(2),
        };
        let err = HookRegistry::with_defaults()
            .dispatch(&ctx, &mut event)
            .await
            .unwrap_err();
        assert!(matches!(err, HookError::Storage(DbError::Conflict(_))));
        assert_eq!(
            ctx.cas_users().lookup_account("taken").await.unwrap(),
            Some(AccountId(1))
        );
    }

    #[tokio::test]
    async fn test_register_submit_stores_username() {
        let ctx = context(CasSettings::default()).await;
        let mut event = RegisterFormSubmit {
            form: Form::new(FormId::UserRegister).with_field(
                CAS_USERNAME_FIELD,
                FormField::new(FieldKind::Textfield, "CAS Username").with_value("newbie"),
            ),
            account_id: AccountId(42),
        };
        HookRegistry::with_defaults()
            .dispatch(&ctx, &mut event)
            .await
            .unwrap();
        assert_eq!(
            ctx.cas_users().lookup_account("newbie").await.unwrap(),
            Some(AccountId(42))
        );
    }
}
