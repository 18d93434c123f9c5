use chrono::{DateTime, Utc};

use crate::{
    db::error::{DbError, DbResult},
    models::AccountId,
};

/// Parse a unix-seconds column back into a timestamp.
pub fn parse_timestamp(secs: i64) -> DbResult<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| DbError::Internal(format!("Invalid timestamp in database: {}", secs)))
}

pub fn account_id_to_db(id: AccountId) -> DbResult<i64> {
    i64::try_from(id.0)
        .map_err(|_| DbError::Validation(format!("Account id {} is out of range", id)))
}

pub fn account_id_from_db(id: i64) -> DbResult<AccountId> {
    u64::try_from(id)
        .map(AccountId)
        .map_err(|_| DbError::Internal(format!("Invalid account id in database: {}", id)))
}
