#[macro_use]
mod crud;
mod schema;

pub mod accommodations;
pub mod activities;
pub mod cities;
pub mod expenses;
pub mod flights;
pub mod itinerary_days;
pub mod sessions;
pub mod users;


pub use crud::{Record, RecordStore, DEFAULT_LIMIT};

use async_trait::async_trait;
use deadpool::managed::{HookError, HookErrorCause};
use deadpool_diesel::sqlite::Hook;
use diesel::{connection::SimpleConnection, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness};
use thiserror::Error;
use tracing::{event, Level};

pub type Pool = deadpool_diesel::sqlite::Pool;

pub const MIGRATIONS: EmbeddedMigrations = diesel_migrations::embed_migrations!();

#[derive(Debug, Error)]
pub enum Error {
    #[error("Database Error: {0}")]
    Db(#[from] diesel::result::Error),

    #[error("Database Pool Error: {0}")]
    Pool(#[from] deadpool_diesel::PoolError),

    #[error("Database Error: {0}")]
    Interact(String),

    #[error("Migration Error: {0}")]
    Migration(String),
}

impl From<deadpool_diesel::InteractError> for Error {
    fn from(e: deadpool_diesel::InteractError) -> Self {
        Error::Interact(e.to_string())
    }
}

/// Applied to every new pooled connection. Writers wait for the lock instead of failing
/// with SQLITE_BUSY, and WAL lets readers continue while a write is in progress.
const CONNECTION_PRAGMAS: &str = "PRAGMA busy_timeout = 5000;
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;";

fn configure_connection() -> Hook {
    Hook::async_fn(|conn, _| {
        Box::pin(async move {
            let result = conn
                .interact(|conn| conn.batch_execute(CONNECTION_PRAGMAS))
                .await;

            match result {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(HookError::Abort(HookErrorCause::Backend(
                    deadpool_diesel::Error::from(e),
                ))),
                Err(e) => Err(HookError::Abort(HookErrorCause::Message(e.to_string()))),
            }
        })
    })
}

pub fn connect(conn_str: &str, max_connections: usize) -> Result<Pool, impl std::error::Error> {
    let manager =
        deadpool_diesel::sqlite::Manager::new(conn_str, deadpool_diesel::Runtime::Tokio1);
    Pool::builder(manager)
        .max_size(max_connections)
        .post_create(configure_connection())
        .build()
}

/// Bring the schema up to date.
pub async fn run_migrations(pool: &Pool) -> Result<(), Error> {
    let applied = pool
        .interact(|conn| {
            conn.run_pending_migrations(MIGRATIONS)
                .map(|versions| versions.len())
                .map_err(|e| Error::Migration(e.to_string()))
        })
        .await?;

    event!(Level::INFO, applied, "migrations complete");
    Ok(())
}

#[async_trait]
pub trait PoolExt<F, RETVAL, ERR>
where
    F: (FnOnce(&mut SqliteConnection) -> Result<RETVAL, ERR>) + Send + 'static,
    RETVAL: Send + 'static,
    ERR: Send + 'static,
{
    async fn interact(&self, f: F) -> Result<RETVAL, ERR>;
}

#[async_trait]
impl<F, RETVAL, ERR> PoolExt<F, RETVAL, ERR> for Pool
where
    F: (FnOnce(&mut SqliteConnection) -> Result<RETVAL, ERR>) + Send + 'static,
    RETVAL: Send + 'static,
    ERR: From<diesel::result::Error>
        + From<deadpool_diesel::PoolError>
        + From<deadpool_diesel::InteractError>
        + Send
        + 'static,
{
    async fn interact(&self, f: F) -> Result<RETVAL, ERR> {
        let conn = self.get().await?;
        let result = conn.interact(move |conn| f(conn)).await??;
        Ok(result)
    }
}
