use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::{
    db::{error::DbResult, repos::RemovedRoleRepo},
    models::RoleId,
};

pub struct SqliteRemovedRoleRepo {
    pool: SqlitePool,
}

impl SqliteRemovedRoleRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RemovedRoleRepo for SqliteRemovedRoleRepo {
    async fn list(&self) -> DbResult<Vec<RoleId>> {
        let roles: Vec<String> =
            sqlx::query_scalar("SELECT role_id FROM cas_removed_roles ORDER BY seq")
                .fetch_all(&self.pool)
                .await?;

        Ok(roles.into_iter().map(RoleId).collect())
    }

    async fn record(&self, role: &RoleId) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO cas_removed_roles (role_id, removed_at)
            VALUES (?, ?)
            ON CONFLICT (role_id) DO NOTHING
            "#,
        )
        .bind(role.as_str())
        .bind(chrono::Utc::now().timestamp())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
