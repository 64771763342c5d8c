//! Insert/commit/rollback seam over the `events` table.

use async_trait::async_trait;
use sqlx::{Connection, PgConnection};
use tracing::{debug, info};

use super::SeedError;
use crate::config::DatabaseConfig;
use crate::generators::GeneratedEvent;

/// SQLSTATE codes the seeder recovers from.
pub mod sqlstate {
    pub const UNIQUE_VIOLATION: &str = "23505";
    pub const IN_FAILED_SQL_TRANSACTION: &str = "25P02";
    pub const RAISE_EXCEPTION: &str = "P0001";
    pub const CHECK_VIOLATION: &str = "23514";
}

/// Result of a single insert attempt that did not fail fatally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsertOutcome {
    /// Row accepted; the transaction still needs a commit.
    Inserted,
    /// A unique constraint rejected the row.
    UniqueViolation,
    /// The transaction was already aborted by an earlier error.
    AbortedTransaction,
    /// A server-side rule raised an exception.
    RaisedException,
    /// A check constraint rejected the row.
    CheckViolation,
}

/// Maps a SQLSTATE code to a recoverable outcome. `None` means the error is fatal.
pub fn classify_sqlstate(code: &str) -> Option<InsertOutcome> {
    match code {
        sqlstate::UNIQUE_VIOLATION => Some(InsertOutcome::UniqueViolation),
        sqlstate::IN_FAILED_SQL_TRANSACTION => Some(InsertOutcome::AbortedTransaction),
        sqlstate::RAISE_EXCEPTION => Some(InsertOutcome::RaisedException),
        sqlstate::CHECK_VIOLATION => Some(InsertOutcome::CheckViolation),
        _ => None,
    }
}

/// Destination for generated events.
#[async_trait]
pub trait EventStore: Send {
    /// Attempts to insert one event inside the current transaction.
    async fn insert(&mut self, event: &GeneratedEvent) -> Result<InsertOutcome, SeedError>;

    /// Commits the current transaction.
    async fn commit(&mut self) -> Result<(), SeedError>;

    /// Rolls back the current transaction.
    async fn rollback(&mut self) -> Result<(), SeedError>;

    /// Closes the underlying connection. Further calls fail.
    async fn close(&mut self) -> Result<(), SeedError>;
}

/// Postgres store over a single connection.
///
/// The first statement after a commit or rollback opens a transaction, so a
/// failed insert leaves the transaction aborted until it is rolled back.
pub struct PgEventStore {
    conn: Option<PgConnection>,
    in_transaction: bool,
}

impl PgEventStore {
    /// Opens one connection. No retry.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, SeedError> {
        let options = config.connect_options()?;
        let conn = PgConnection::connect_with(&options).await?;
        Ok(Self::from_connection(conn))
    }

    pub fn from_connection(conn: PgConnection) -> Self {
        Self {
            conn: Some(conn),
            in_transaction: false,
        }
    }

    /// Applies the bundled `events` schema migrations.
    pub async fn migrate(&mut self) -> Result<(), SeedError> {
        let conn = self.conn.as_mut().ok_or(SeedError::ConnectionClosed)?;
        sqlx::migrate!("./migrations").run(conn).await?;
        info!("Applied events migrations");
        Ok(())
    }

    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn insert(&mut self, event: &GeneratedEvent) -> Result<InsertOutcome, SeedError> {
        let conn = self.conn.as_mut().ok_or(SeedError::ConnectionClosed)?;

        if !self.in_transaction {
            sqlx::query("BEGIN").execute(&mut *conn).await?;
            self.in_transaction = true;
        }

        let result = sqlx::query(
            r#"
            INSERT INTO events (title, event_date, start_time, end_time)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&event.title)
        .bind(event.event_date)
        .bind(event.start_time)
        .bind(event.end_time)
        .execute(&mut *conn)
        .await;

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(sqlx::Error::Database(db_err)) => {
                let outcome = db_err.code().as_deref().and_then(classify_sqlstate);
                match outcome {
                    Some(outcome) => {
                        debug!(?outcome, message = db_err.message(), "insert rejected");
                        Ok(outcome)
                    }
                    None => Err(SeedError::Database(sqlx::Error::Database(db_err))),
                }
            }
            Err(e) => Err(SeedError::Database(e)),
        }
    }

    async fn commit(&mut self) -> Result<(), SeedError> {
        let conn = self.conn.as_mut().ok_or(SeedError::ConnectionClosed)?;
        if self.in_transaction {
            sqlx::query("COMMIT").execute(&mut *conn).await?;
            self.in_transaction = false;
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), SeedError> {
        let conn = self.conn.as_mut().ok_or(SeedError::ConnectionClosed)?;
        if self.in_transaction {
            sqlx::query("ROLLBACK").execute(&mut *conn).await?;
            self.in_transaction = false;
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<(), SeedError> {
        if let Some(conn) = self.conn.take() {
            // Anything still open was never committed.
            self.in_transaction = false;
            conn.close().await?;
        }
        Ok(())
    }
}
