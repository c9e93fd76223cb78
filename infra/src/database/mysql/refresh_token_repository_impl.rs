//! MySQL implementation of the RefreshTokenLedger trait.
//!
//! Rows are keyed by the SHA-256 digest of the token value. Rotation runs in
//! an InnoDB transaction: the row is read with `SELECT ... FOR UPDATE` and
//! consumed with a conditional update whose affected row count decides
//! whether this transaction won.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySql, MySqlPool, Row, Transaction};

use garage_core::domain::entities::token::RefreshTokenEntry;
use garage_core::errors::DomainError;
use garage_core::repositories::{LedgerTransaction, RefreshTokenLedger};

use super::{db_error, parse_uuid};

const SELECT_ENTRY: &str = r#"
    SELECT token_hash, jti, identity_id, created_at, expires_at, used_at
    FROM refresh_tokens
    WHERE token_hash = ?
"#;

const INSERT_ENTRY: &str = r#"
    INSERT INTO refresh_tokens (token_hash, jti, identity_id, created_at, expires_at, used_at)
    VALUES (?, ?, ?, ?, ?, ?)
"#;

/// Build an entry from its raw column values
fn entry_from_columns(
    token_hash: String,
    jti: &str,
    identity_id: &str,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    used_at: Option<DateTime<Utc>>,
) -> Result<RefreshTokenEntry, DomainError> {
    Ok(RefreshTokenEntry {
        token_hash,
        jti: parse_uuid(jti, "jti")?,
        identity_id: parse_uuid(identity_id, "identity_id")?,
        created_at,
        expires_at,
        used_at,
    })
}

fn row_to_entry(row: &sqlx::mysql::MySqlRow) -> Result<RefreshTokenEntry, DomainError> {
    let jti: String = row.try_get("jti").map_err(db_error("Failed to get jti"))?;
    let identity_id: String = row
        .try_get("identity_id")
        .map_err(db_error("Failed to get identity_id"))?;

    entry_from_columns(
        row.try_get("token_hash")
            .map_err(db_error("Failed to get token_hash"))?,
        &jti,
        &identity_id,
        row.try_get("created_at")
            .map_err(db_error("Failed to get created_at"))?,
        row.try_get("expires_at")
            .map_err(db_error("Failed to get expires_at"))?,
        row.try_get("used_at").map_err(db_error("Failed to get used_at"))?,
    )
}

/// MySQL implementation of RefreshTokenLedger
pub struct MySqlRefreshTokenLedger {
    pool: MySqlPool,
}

impl MySqlRefreshTokenLedger {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshTokenLedger for MySqlRefreshTokenLedger {
    async fn save_refresh_token(
        &self,
        entry: RefreshTokenEntry,
    ) -> Result<RefreshTokenEntry, DomainError> {
        sqlx::query(INSERT_ENTRY)
            .bind(&entry.token_hash)
            .bind(entry.jti.to_string())
            .bind(entry.identity_id.to_string())
            .bind(entry.created_at)
            .bind(entry.expires_at)
            .bind(entry.used_at)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to save refresh token"))?;

        Ok(entry)
    }

    async fn find_refresh_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenEntry>, DomainError> {
        let row = sqlx::query(SELECT_ENTRY)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find refresh token"))?;

        row.as_ref().map(row_to_entry).transpose()
    }

    async fn begin(&self) -> Result<Box<dyn LedgerTransaction>, DomainError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin ledger transaction"))?;

        Ok(Box::new(MySqlLedgerTransaction { tx: Some(tx) }))
    }
}

/// Open InnoDB transaction over the ledger
///
/// Rolled back when dropped before `commit`.
pub struct MySqlLedgerTransaction {
    tx: Option<Transaction<'static, MySql>>,
}

impl MySqlLedgerTransaction {
    fn tx(&mut self) -> Result<&mut Transaction<'static, MySql>, DomainError> {
        self.tx.as_mut().ok_or_else(|| DomainError::Internal {
            message: "Transaction already committed".to_string(),
        })
    }
}

#[async_trait]
impl LedgerTransaction for MySqlLedgerTransaction {
    async fn find_for_update(
        &mut self,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenEntry>, DomainError> {
        let query = format!("{} FOR UPDATE", SELECT_ENTRY.trim_end());
        let tx = self.tx()?;

        let row = sqlx::query(&query)
            .bind(token_hash)
            .fetch_optional(&mut **tx)
            .await
            .map_err(db_error("Failed to lock refresh token"))?;

        row.as_ref().map(row_to_entry).transpose()
    }

    async fn mark_used(
        &mut self,
        token_hash: &str,
        used_at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let tx = self.tx()?;

        let result = sqlx::query(
            "UPDATE refresh_tokens SET used_at = ? WHERE token_hash = ? AND used_at IS NULL",
        )
        .bind(used_at)
        .bind(token_hash)
        .execute(&mut **tx)
        .await
        .map_err(db_error("Failed to mark refresh token used"))?;

        Ok(result.rows_affected() == 1)
    }

    async fn insert(&mut self, entry: &RefreshTokenEntry) -> Result<(), DomainError> {
        let tx = self.tx()?;

        sqlx::query(INSERT_ENTRY)
            .bind(&entry.token_hash)
            .bind(entry.jti.to_string())
            .bind(entry.identity_id.to_string())
            .bind(entry.created_at)
            .bind(entry.expires_at)
            .bind(entry.used_at)
            .execute(&mut **tx)
            .await
            .map_err(db_error("Failed to insert refresh token"))?;

        Ok(())
    }

    async fn commit(&mut self) -> Result<(), DomainError> {
        let tx = self.tx.take().ok_or_else(|| DomainError::Internal {
            message: "Transaction already committed".to_string(),
        })?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit ledger transaction"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    #[test]
    fn test_entry_from_columns() {
        let jti = Uuid::new_v4();
        let identity_id = Uuid::new_v4();
        let created_at = Utc::now();
        let expires_at = created_at + Duration::days(7);

        let entry = entry_from_columns(
            "digest".to_string(),
            &jti.to_string(),
            &identity_id.to_string(),
            created_at,
            expires_at,
            None,
        )
        .unwrap();

        assert_eq!(entry.jti, jti);
        assert_eq!(entry.identity_id, identity_id);
        assert!(entry.is_active_at(created_at));
    }

    #[test]
    fn test_entry_with_corrupt_jti_is_internal_error() {
        let result = entry_from_columns(
            "digest".to_string(),
            "garbage",
            &Uuid::new_v4().to_string(),
            Utc::now(),
            Utc::now(),
            None,
        );

        assert!(matches!(result, Err(DomainError::Internal { .. })));
    }

    #[test]
    fn test_lock_query() {
        let query = format!("{} FOR UPDATE", SELECT_ENTRY.trim_end());
        assert!(query.trim_end().ends_with("WHERE token_hash = ? FOR UPDATE"));
    }
}
