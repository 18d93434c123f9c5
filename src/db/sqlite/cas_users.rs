use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use super::common::{account_id_from_db, account_id_to_db};
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::CasUserRepo,
    },
    models::{AccountId, CasUserMapping},
};

pub struct SqliteCasUserRepo {
    pool: SqlitePool,
}

impl SqliteCasUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CasUserRepo for SqliteCasUserRepo {
    async fn get_by_account(&self, account_id: AccountId) -> DbResult<Option<CasUserMapping>> {
        let username: Option<String> =
            sqlx::query_scalar("SELECT username FROM cas_users WHERE account_id = ?")
                .bind(account_id_to_db(account_id)?)
                .fetch_optional(&self.pool)
                .await?;

        Ok(username.map(|username| CasUserMapping {
            account_id,
            username,
        }))
    }

    async fn get_by_username(&self, username: &str) -> DbResult<Option<CasUserMapping>> {
        let row = sqlx::query("SELECT account_id, username FROM cas_users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| {
            Ok(CasUserMapping {
                account_id: account_id_from_db(row.get("account_id"))?,
                username: row.get("username"),
            })
        })
        .transpose()
    }

    async fn upsert(&self, mapping: CasUserMapping) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO cas_users (account_id, username)
            VALUES (?, ?)
            ON CONFLICT (account_id) DO UPDATE SET username = excluded.username
            "#,
        )
        .bind(account_id_to_db(mapping.account_id)?)
        .bind(&mapping.username)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => DbError::Conflict(
                format!("CAS username '{}' is already assigned", mapping.username),
            ),
            _ => DbError::from(e),
        })?;

        Ok(())
    }

    async fn delete(&self, account_id: AccountId) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM cas_users WHERE account_id = ?")
            .bind(account_id_to_db(account_id)?)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> DbResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cas_users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}
