use async_trait::async_trait;

use super::{Hook, HookContext, HookResult, RoleDeleted};

/// Removes a deleted role from the auto-assigned role list and persists the
/// removal.
///
/// Works on the handle's current settings rather than the context snapshot,
/// so consecutive deletions never resurrect an earlier one.
pub struct PruneAutoAssignedRole;

#[async_trait]
impl Hook<RoleDeleted> for PruneAutoAssignedRole {
    fn name(&self) -> &'static str {
        "prune_auto_assigned_role"
    }

    async fn handle(&self, ctx: &HookContext, event: &mut RoleDeleted) -> HookResult<()> {
        if ctx
            .settings_handle
            .remove_auto_assigned_role(&event.role_id)
            .await?
        {
            tracing::info!(role = %event.role_id, "Deleted role removed from CAS auto-assigned roles");
        }
        Ok(())
    }
}
