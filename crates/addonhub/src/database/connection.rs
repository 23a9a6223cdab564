/*
 *  Copyright 2025 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! SQLite connection management.
//!
//! This module provides an async connection pool implementation using
//! `deadpool-diesel` for managing database connections. It handles pooling,
//! connection lifecycle, and migration execution.
//!
//! # Example
//!
//! ```rust,no_run
//! use addonhub::database::Database;
//!
//! # async fn example() -> Result<(), addonhub::StorageError> {
//! let db = Database::new("path/to/catalog.db");
//! db.run_migrations().await?;
//! # Ok(())
//! # }
//! ```

use deadpool_diesel::sqlite::{Manager, Pool, Runtime};
use thiserror::Error;
use tracing::info;

/// Errors raised by catalog storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The pool could not hand out a connection, or the pooled worker died.
    #[error("connection pool error: {0}")]
    ConnectionPool(String),

    /// A query failed inside the database.
    #[error("database error: {0}")]
    Query(#[from] diesel::result::Error),

    /// Insert collided with the unique composer-name constraint.
    #[error("addon with composer name '{0}' already exists")]
    ComposerNameTaken(String),

    /// Schema migrations could not be applied.
    #[error("migration error: {0}")]
    Migration(String),
}

/// A pool of SQLite connections to the catalog database.
///
/// `Database` is `Clone`; each clone references the same underlying pool and
/// can be shared freely between components.
#[derive(Clone)]
pub struct Database {
    pool: Pool,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Database(sqlite)")
    }
}

impl Database {
    /// Creates a new connection pool for the given SQLite location.
    ///
    /// Accepts a plain file path, a `sqlite://` URL or a `file:` URI
    /// (including `file:name?mode=memory&cache=shared` for tests).
    ///
    /// # Panics
    ///
    /// Panics if the connection pool cannot be created.
    pub fn new(connection_string: &str) -> Self {
        let connection_url = Self::build_sqlite_url(connection_string);
        let manager = Manager::new(connection_url, Runtime::Tokio1);
        // SQLite has limited concurrent write support even with WAL mode.
        // Using a single connection avoids "database is locked" errors.
        let pool = Pool::builder(manager)
            .max_size(1)
            .build()
            .expect("Failed to create SQLite connection pool");

        info!("SQLite connection pool initialized (size: 1)");

        Self { pool }
    }

    /// Checks out a connection from the pool.
    pub async fn conn(&self) -> Result<deadpool::managed::Object<Manager>, StorageError> {
        self.pool
            .get()
            .await
            .map_err(|e| StorageError::ConnectionPool(e.to_string()))
    }

    /// Strips the `sqlite://` prefix if present.
    fn build_sqlite_url(connection_string: &str) -> String {
        if let Some(path) = connection_string.strip_prefix("sqlite://") {
            path.to_string()
        } else {
            connection_string.to_string()
        }
    }

    /// Runs pending schema migrations and sets connection pragmas.
    pub async fn run_migrations(&self) -> Result<(), StorageError> {
        use diesel::prelude::*;
        use diesel_migrations::MigrationHarness;

        let conn = self.conn().await?;
        conn.interact(|conn| -> Result<(), StorageError> {
            // WAL mode allows concurrent reads during writes.
            diesel::sql_query("PRAGMA journal_mode=WAL;").execute(conn)?;
            // busy_timeout makes SQLite wait instead of immediately failing on locks.
            diesel::sql_query("PRAGMA busy_timeout=30000;").execute(conn)?;
            // The catalog schema relies on cascading deletes.
            diesel::sql_query("PRAGMA foreign_keys=ON;").execute(conn)?;

            conn.run_pending_migrations(crate::database::MIGRATIONS)
                .map_err(|e| StorageError::Migration(e.to_string()))?;
            Ok(())
        })
        .await
        .map_err(|e| StorageError::ConnectionPool(e.to_string()))??;

        info!("Catalog schema migrations applied");
        Ok(())
    }
}
