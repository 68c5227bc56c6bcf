//! # barber-db: Database Layer for Barbearia POS
//!
//! This crate provides database access for the barbershop tracker.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Barbearia POS Data Flow                           │
//! │                                                                         │
//! │  HTTP handler (/historico)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     barber-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repository   │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│   (sale.rs)   │    │  (embedded)  │  │   │
//! │  │   │  SqlitePool   │    │ WHERE builder │    │ 001_sales    │  │   │
//! │  │   │               │    │ day/month sum │    │ 002_soft_del │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (barbearia.db)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use barber_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("barbearia.db")).await?;
//! let today = db.sales().totals(Some("vini"), today).await?.today;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::sale::{NewSale, SaleRepository, SortOrder};

/// Installs the stderr log subscriber used by the maintenance binaries.
pub fn init_cli_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,barber=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
