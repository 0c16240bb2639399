use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::Result;
use crate::modules::identifiers::models::IdentifierKind;

/// Durable set of every identifier ever issued.
///
/// Entries are never removed, so a cancelled request's numbers stay burned.
#[async_trait]
pub trait IdentifierRegistry: Send + Sync {
    /// Atomically claim `value`; false when it was already taken
    async fn reserve(&self, kind: IdentifierKind, value: &str) -> Result<bool>;
}

/// MySQL registry backed by a unique (kind, value) index
pub struct MySqlIdentifierRegistry {
    pool: MySqlPool,
}

impl MySqlIdentifierRegistry {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentifierRegistry for MySqlIdentifierRegistry {
    async fn reserve(&self, kind: IdentifierKind, value: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT IGNORE INTO identifier_registry (kind, value, reserved_at)
            VALUES (?, ?, UTC_TIMESTAMP(3))
            "#,
        )
        .bind(kind.as_str())
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
