use anyhow::{Context, Result};
use diesel::connection::SimpleConnection;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use diesel::SqliteConnection;

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

const SCHEMA: &str = include_str!("../migrations/2020-04-01-000000_create_tables/up.sql");

#[derive(Debug)]
struct ConnectionOptions;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(r2d2::Error::QueryError)
    }
}

pub fn create_connection_pool(database_url: &str) -> Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    // every connection to ":memory:" opens its own database
    let max_size = if database_url == ":memory:" { 1 } else { 10 };
    let pool = r2d2::Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(ConnectionOptions))
        .build(manager)
        .context("Failed to create pool")?;
    let mut conn = pool.get()?;
    run_migrations(&mut conn)?;
    Ok(pool)
}

pub fn run_migrations(conn: &mut SqliteConnection) -> Result<()> {
    conn.batch_execute(SCHEMA)
        .context("Failed to apply database schema")?;
    Ok(())
}

#[cfg(test)]
pub fn create_test_pool() -> DbPool {
    create_connection_pool(":memory:").expect("in-memory pool")
}
