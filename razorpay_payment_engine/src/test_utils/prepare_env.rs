use std::{ops::Deref, sync::Arc};

use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};
use tempfile::TempDir;

use crate::{traits::PaymentGatewayDatabase, SqliteDatabase};

pub async fn prepare_test_env(url: &str) {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
    create_database(url).await;
    run_migrations(url).await;
}

/// A migrated database in its own temporary directory.
///
/// The directory, and the database file with it, is removed once the last clone of this handle is dropped. APIs
/// under test take a plain [`SqliteDatabase`] from [`TestDatabase::handle`], so keep the `TestDatabase` itself in
/// scope for as long as the database is used.
#[derive(Clone)]
pub struct TestDatabase {
    db: SqliteDatabase,
    _dir: Arc<TempDir>,
}

impl TestDatabase {
    pub fn handle(&self) -> SqliteDatabase {
        self.db.clone()
    }
}

impl Deref for TestDatabase {
    type Target = SqliteDatabase;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

/// Creates an empty, migrated database in a fresh temporary directory.
pub async fn fresh_database() -> TestDatabase {
    let dir = tempfile::tempdir().expect("Error creating temporary directory");
    let url = format!("sqlite://{}", dir.path().join("rpg_test.db").display());
    prepare_test_env(&url).await;
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating connection to database");
    TestDatabase { db, _dir: Arc::new(dir) }
}

pub async fn run_migrations(url: &str) {
    let mut db = SqliteDatabase::new_with_url(url, 5).await.expect("Error creating connection to database");
    db.migrate().await.expect("Error running DB migrations");
    db.close().await.expect("Error closing migration connection");
    info!("🚀️ Migrations complete");
}

pub async fn create_database(url: &str) {
    if Sqlite::database_exists(url).await.unwrap_or(false) {
        if let Err(e) = Sqlite::drop_database(url).await {
            warn!("Error dropping database {url}: {e:?}");
        }
    }
    Sqlite::create_database(url).await.expect("Error creating database");
    info!("Created Sqlite database {url}");
}
