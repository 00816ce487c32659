//! Database migration runner for Collecta.
//!
//! Usage:
//!   migrator up      - Run all pending migrations
//!   migrator down    - Rollback last migration
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop all tables and re-run migrations
//!
//! The database URL comes from `DATABASE_URL` when set, otherwise from
//! `COLLECTA__DATABASE__URL` or the config files.

use anyhow::Context;
use collecta_db::migration::Migrator;
use collecta_shared::AppConfig;
use sea_orm_migration::cli;

const DATABASE_URL: &str = "DATABASE_URL";

fn main() -> anyhow::Result<()> {
    if std::env::var_os(DATABASE_URL).is_none() {
        let config = AppConfig::load().context("failed to load configuration")?;
        export_database_url(&config.database.url);
    }

    // Run the migrator CLI (it sets up its own tracing)
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?
        .block_on(cli::run_cli(Migrator));
    Ok(())
}

#[allow(unsafe_code)]
fn export_database_url(url: &str) {
    // SAFETY: runs before the runtime starts, while main is the only thread.
    unsafe { std::env::set_var(DATABASE_URL, url) };
}
