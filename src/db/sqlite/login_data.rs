use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use super::common::parse_timestamp;
use crate::{
    db::{error::DbResult, repos::LoginDataRepo},
    models::{LoginData, SessionId},
};

pub struct SqliteLoginDataRepo {
    pool: SqlitePool,
}

impl SqliteLoginDataRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn from_row(row: SqliteRow) -> DbResult<LoginData> {
        Ok(LoginData {
            session_id: SessionId(row.get("session_id")),
            ticket: row.get("ticket"),
            created: parse_timestamp(row.get("created"))?,
        })
    }
}

#[async_trait]
impl LoginDataRepo for SqliteLoginDataRepo {
    async fn insert(&self, record: LoginData) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO cas_login_data (session_id, ticket, created)
            VALUES (?, ?, ?)
            ON CONFLICT (session_id) DO UPDATE SET
                ticket = excluded.ticket,
                created = excluded.created
            "#,
        )
        .bind(record.session_id.as_str())
        .bind(&record.ticket)
        .bind(record.created.timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, session_id: &SessionId) -> DbResult<Option<LoginData>> {
        let row = sqlx::query(
            "SELECT session_id, ticket, created FROM cas_login_data WHERE session_id = ?",
        )
        .bind(session_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::from_row).transpose()
    }

    async fn get_by_ticket(&self, ticket: &str) -> DbResult<Option<LoginData>> {
        let row = sqlx::query(
            "SELECT session_id, ticket, created FROM cas_login_data WHERE ticket = ? LIMIT 1",
        )
        .bind(ticket)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::from_row).transpose()
    }

    async fn count(&self) -> DbResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cas_login_data")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn delete(&self, session_id: &SessionId) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM cas_login_data WHERE session_id = ?")
            .bind(session_id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM cas_login_data WHERE created <= ?")
            .bind(cutoff.timestamp())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
