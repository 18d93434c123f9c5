use async_trait::async_trait;

use super::{AccountDeleted, Hook, HookContext, HookResult};

/// Drops the CAS association of a deleted account.
pub struct RemoveAssociation;

#[async_trait]
impl Hook<AccountDeleted> for RemoveAssociation {
    fn name(&self) -> &'static str {
        "remove_cas_association"
    }

    async fn handle(&self, ctx: &HookContext, event: &mut AccountDeleted) -> HookResult<()> {
        ctx.cas_users().remove(event.account_id).await?;
        Ok(())
    }
}
