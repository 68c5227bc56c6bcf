//! # Legacy CSV Import
//!
//! Loads a sales file in the download layout (the flat file the shop kept
//! before the database) into the `sales` table.
//!
//! ## Usage
//! ```bash
//! cargo run -p barber-db --bin import-csv -- vendas.csv
//! cargo run -p barber-db --bin import-csv -- vendas.csv --db ./data/barbearia.db
//! cargo run -p barber-db --bin import-csv -- vendas.csv --dry-run
//! ```
//!
//! Rows with a bad date or amount are skipped and listed; the rest are
//! written in one transaction.

use anyhow::{bail, Context};
use barber_core::export::read_sales_csv;
use barber_db::{init_cli_logging, Database, DbConfig, NewSale};
use chrono::Utc;
use std::env;
use tracing::warn;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_cli_logging();

    let args: Vec<String> = env::args().collect();

    let mut file: Option<String> = None;
    let mut db_path = String::from("./barbearia.db");
    let mut dry_run = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--dry-run" => dry_run = true,
            "--help" | "-h" => {
                println!("Usage: import-csv <FILE> [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./barbearia.db)");
                println!("      --dry-run      Parse and report without writing");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => file = Some(other.to_string()),
        }
        i += 1;
    }

    let Some(file) = file else {
        bail!("missing CSV file argument (see --help)");
    };

    let data = std::fs::read(&file).with_context(|| format!("reading {}", file))?;
    let import = read_sales_csv(&data).with_context(|| format!("parsing {}", file))?;

    for (line, reason) in &import.rejected {
        warn!(line = *line, %reason, "Skipping row");
    }

    println!("File:     {}", file);
    println!("Valid:    {}", import.sales.len());
    println!("Rejected: {}", import.rejected.len());

    if dry_run {
        println!("Dry run, nothing written.");
        return Ok(());
    }

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let now = Utc::now();
    let batch: Vec<NewSale> = import
        .sales
        .into_iter()
        .map(|sale| NewSale::from_import(sale, now))
        .collect();

    let written = db.sales().insert_many(&batch).await?;
    println!("Imported {} sales into {}", written, db_path);

    db.close().await;
    Ok(())
}
