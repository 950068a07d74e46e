//! Common test utilities for database-backed integration tests
//!
//! Each `TestDatabase` owns a temporary directory holding a fresh SQLite file
//! (with migrations applied) and a `source/` directory for annex fixtures.
//! Everything is removed when the value is dropped, so tests can run in
//! parallel without interfering with each other.
//!
//! # Usage
//!
//! ```no_run
//! use common::TestDatabase;
//!
//! #[test]
//! fn my_test() {
//!     let test_db = TestDatabase::new().expect("Failed to create test database");
//!     test_db.write_annex("Annex_1.csv", &["ID,Definition", "EH_AD,EHAM EHRD"]);
//!     let mut conn = test_db.connection();
//!     // ...
//! }
//! ```

#![allow(dead_code)]

use anyhow::{Context, Result};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use rad_compiler::db::{establish_connection, run_migrations};

pub struct TestDatabase {
    dir: TempDir,
    database_path: PathBuf,
    source_dir: PathBuf,
}

impl TestDatabase {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("Failed to create temp dir")?;
        let database_path = dir.path().join("rad_test.db");
        let source_dir = dir.path().join("source");
        fs::create_dir_all(&source_dir).context("Failed to create source dir")?;

        let mut conn = establish_connection(&database_path.to_string_lossy())?;
        run_migrations(&mut conn)?;

        Ok(Self {
            dir,
            database_path,
            source_dir,
        })
    }

    pub fn database_path(&self) -> String {
        self.database_path.to_string_lossy().into_owned()
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// New connection to the test database.
    pub fn connection(&self) -> SqliteConnection {
        establish_connection(&self.database_path()).expect("Failed to connect to test database")
    }

    /// Writes a CSV fixture into the source directory, one line per entry.
    pub fn write_annex(&self, file_name: &str, lines: &[&str]) {
        let mut contents = lines.join("\n");
        contents.push('\n');
        fs::write(self.source_dir.join(file_name), contents).expect("Failed to write fixture");
    }

    /// Row count of a table by its SQL name.
    pub fn count(&self, table: &str) -> i64 {
        #[derive(QueryableByName)]
        struct Count {
            #[diesel(sql_type = diesel::sql_types::BigInt)]
            n: i64,
        }

        let mut conn = self.connection();
        diesel::sql_query(format!("SELECT COUNT(*) AS n FROM {table}"))
            .get_result::<Count>(&mut conn)
            .expect("Failed to count rows")
            .n
    }
}
