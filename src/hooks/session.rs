use async_trait::async_trait;
use chrono::Utc;

use super::{CasLoginCompleted, Hook, HookContext, HookResult, Logout};
use crate::models::LoginData;

/// Remembers which service ticket opened a session, for single logout.
pub struct RecordLoginData;

#[async_trait]
impl Hook<CasLoginCompleted> for RecordLoginData {
    fn name(&self) -> &'static str {
        "record_cas_login_data"
    }

    async fn handle(&self, ctx: &HookContext, event: &mut CasLoginCompleted) -> HookResult<()> {
        ctx.db
            .login_data()
            .insert(LoginData {
                session_id: event.session_id.clone(),
                ticket: event.ticket.clone(),
                created: Utc::now(),
            })
            .await?;
        tracing::debug!(session_id = %event.session_id, "CAS login data recorded");
        Ok(())
    }
}

/// Drops the login-data record of a session that is logging out.
pub struct DeleteLoginData;

#[async_trait]
impl Hook<Logout> for DeleteLoginData {
    fn name(&self) -> &'static str {
        "delete_cas_login_data"
    }

    async fn handle(&self, ctx: &HookContext, event: &mut Logout) -> HookResult<()> {
        if ctx.db.login_data().delete(&event.session_id).await? {
            tracing::debug!(session_id = %event.session_id, "CAS login data deleted on logout");
        }
        Ok(())
    }
}
