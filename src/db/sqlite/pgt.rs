use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use super::common::parse_timestamp;
use crate::{
    db::{error::DbResult, repos::PgtRepo},
    models::PgtRecord,
};

pub struct SqlitePgtRepo {
    pool: SqlitePool,
}

impl SqlitePgtRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PgtRepo for SqlitePgtRepo {
    async fn insert(&self, record: PgtRecord) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO cas_pgt (ticket, pgt, timestamp)
            VALUES (?, ?, ?)
            ON CONFLICT (ticket) DO UPDATE SET
                pgt = excluded.pgt,
                timestamp = excluded.timestamp
            "#,
        )
        .bind(&record.ticket)
        .bind(&record.pgt)
        .bind(record.timestamp.timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn take(&self, ticket: &str) -> DbResult<Option<PgtRecord>> {
        let row = sqlx::query(
            r#"
            DELETE FROM cas_pgt
            WHERE ticket = ?
            RETURNING ticket, pgt, timestamp
            "#,
        )
        .bind(ticket)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| {
            Ok(PgtRecord {
                ticket: row.get("ticket"),
                pgt: row.get("pgt"),
                timestamp: parse_timestamp(row.get("timestamp"))?,
            })
        })
        .transpose()
    }

    async fn count(&self) -> DbResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cas_pgt")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn delete_stored_before(&self, cutoff: DateTime<Utc>) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM cas_pgt WHERE timestamp <= ?")
            .bind(cutoff.timestamp())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
