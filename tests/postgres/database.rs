//! Throwaway databases on the server named by the environment.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use uuid::Uuid;

/// Environment variable holding an administrative connection URL.
pub const DATABASE_URL_ENV: &str = "SCRIPTORIUM_TEST_DATABASE_URL";

/// SQL creating the annotation schema.
pub const CREATE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-03-02-000000_create_annotation_tables/up.sql");

/// Database created for a single test and dropped afterwards.
pub struct TemporaryDatabase {
    admin_url: String,
    name: String,
    url: String,
}

impl TemporaryDatabase {
    /// Creates a migrated database, or returns `None` when no server is
    /// configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created or migrated.
    pub fn create() -> eyre::Result<Option<Self>> {
        let Ok(admin_url) = std::env::var(DATABASE_URL_ENV) else {
            return Ok(None);
        };
        let name = format!("scriptorium_test_{}", Uuid::new_v4().simple());
        let url = sibling_url(&admin_url, &name)?;

        let mut admin = PgConnection::establish(&admin_url)?;
        admin.batch_execute(&format!("CREATE DATABASE {}", quote_identifier(&name)))?;
        let database = Self {
            admin_url,
            name,
            url,
        };

        let mut connection = PgConnection::establish(&database.url)?;
        connection.batch_execute(CREATE_SCHEMA_SQL)?;
        Ok(Some(database))
    }

    /// Returns the connection URL of the temporary database.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    fn drop_database(&self) -> eyre::Result<()> {
        let mut admin = PgConnection::establish(&self.admin_url)?;
        admin.batch_execute(&format!(
            "DROP DATABASE IF EXISTS {} WITH (FORCE)",
            quote_identifier(&self.name)
        ))?;
        Ok(())
    }
}

impl Drop for TemporaryDatabase {
    fn drop(&mut self) {
        drop(self.drop_database());
    }
}

/// Replaces the database name in a connection URL.
fn sibling_url(admin_url: &str, database: &str) -> eyre::Result<String> {
    let (location, query) = admin_url
        .split_once('?')
        .map_or((admin_url, None), |(head, tail)| (head, Some(tail)));
    let (server, _) = location
        .rsplit_once('/')
        .ok_or_else(|| eyre::eyre!("{DATABASE_URL_ENV} has no database path"))?;
    Ok(query.map_or_else(
        || format!("{server}/{database}"),
        |params| format!("{server}/{database}?{params}"),
    ))
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
