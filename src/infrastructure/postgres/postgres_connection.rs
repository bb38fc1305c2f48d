use std::time::Duration;

use anyhow::{Context, Result};
use diesel::{
    Connection, PgConnection,
    connection::CacheSize,
    r2d2::{ConnectionManager, CustomizeConnection, Error as R2d2Error, Pool},
};
use tracing::info;

use crate::config::config_model::Database;

const CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Transaction-mode poolers (pgbouncer, supavisor) reject named prepared statements.
#[derive(Debug, Default)]
struct NoStatementCache;

impl CustomizeConnection<PgConnection, R2d2Error> for NoStatementCache {
    fn on_acquire(&self, conn: &mut PgConnection) -> std::result::Result<(), R2d2Error> {
        conn.set_prepared_statement_cache_size(CacheSize::Disabled);
        Ok(())
    }
}

pub fn establish_connection(database: &Database) -> Result<PgPool> {
    let manager = ConnectionManager::<PgConnection>::new(&database.url);

    let pool = Pool::builder()
        .max_size(database.max_connections)
        .connection_timeout(CONNECTION_TIMEOUT)
        .connection_customizer(Box::new(NoStatementCache))
        .build(manager)
        .context("failed to build the postgres connection pool")?;

    info!(max_connections = database.max_connections, "postgres pool ready");
    Ok(pool)
}
