//! Database operations and SQLite management for plans and reminders.
//!
//! Low-level persistence for the scheduling core: connection handling,
//! schema management, and the query interfaces for action plans and
//! reminders. Mutating paths (activation, check-in) run inside immediate
//! transactions so SQLite's single-writer lock gives the per-plan mutual
//! exclusion the check-in state machine requires.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod migrations;
pub mod plan_queries;
pub mod reminder_queries;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}
