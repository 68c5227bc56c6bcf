//! # Demo Sales Generator
//!
//! Fills a database with a few weeks of plausible sales for development.
//!
//! ## Usage
//! ```bash
//! # 30 days of sales (default)
//! cargo run -p barber-db --bin seed
//!
//! # Custom number of days
//! cargo run -p barber-db --bin seed -- --days 90
//!
//! # Specify database path
//! cargo run -p barber-db --bin seed -- --db ./data/barbearia.db
//! ```
//!
//! Every day gets a handful of sales per barber, spread over opening hours
//! (09:00 to 19:00). Prices come from a small fixed table, so reruns on a
//! fresh file produce the same amounts.

use barber_core::{Money, SaleDraft, DEFAULT_PRODUCTS};
use barber_db::{init_cli_logging, Database, DbConfig, NewSale};
use chrono::{Duration, Local, NaiveTime, Utc};
use std::env;

const BARBERS: &[&str] = &["mairon", "vini", "artur"];

const CLIENTS: &[&str] = &[
    "João", "Pedro", "Lucas", "Mateus", "Gabriel", "Rafael", "Bruno", "Felipe", "Gustavo",
    "Thiago", "", "Carlos", "Eduardo", "André",
];

/// (haircut, beard, eyebrow) in cents.
const SERVICES: &[(i64, i64, i64)] = &[
    (3500, 0, 0),
    (3500, 2000, 0),
    (3000, 2000, 1000),
    (0, 2500, 0),
    (4000, 0, 1000),
];

const PRODUCT_PRICES: &[i64] = &[1990, 1500, 2500];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_cli_logging();

    let args: Vec<String> = env::args().collect();

    let mut days: i64 = 30;
    let mut db_path = String::from("./barbearia.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--days" | "-n" => {
                if i + 1 < args.len() {
                    days = args[i + 1].parse().unwrap_or(30);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Barbearia POS demo data");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -n, --days <N>     Days of history ending today (default: 30)");
                println!("  -d, --db <PATH>    Database file path (default: ./barbearia.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Barbearia POS demo data");
    println!("=======================");
    println!("Database: {}", db_path);
    println!("Days:     {}", days);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    let existing = db.sales().count().await?;
    if existing > 0 {
        println!("Database already has {} sales, skipping.", existing);
        println!("Delete the database file to regenerate.");
        return Ok(());
    }

    let today = Local::now().date_naive();
    let mut batch = Vec::new();
    let mut seed = 0usize;

    for offset in (0..days.max(1)).rev() {
        let date = today - Duration::days(offset);
        for barber in BARBERS {
            let per_day = 2 + seed % 4;
            for slot in 0..per_day {
                let hour = 9 + ((seed + slot * 3) % 10) as u32;
                let minute = ((seed * 7) % 4) as u32 * 15;
                let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default();
                batch.push(NewSale::stamped(
                    demo_draft(barber, seed),
                    date.and_time(time),
                    Utc::now(),
                ));
                seed += 1;
            }
        }
    }

    let start = std::time::Instant::now();
    let written = db.sales().insert_many(&batch).await?;

    println!("Generated {} sales in {:?}", written, start.elapsed());

    let totals = db.sales().totals(None, today).await?;
    println!("  Today: R$ {}", totals.today);
    println!("  Month: R$ {}", totals.month);

    db.close().await;
    Ok(())
}

fn demo_draft(barber: &str, seed: usize) -> SaleDraft {
    let (haircut, beard, eyebrow) = SERVICES[seed % SERVICES.len()];

    // Roughly one sale in four includes a product.
    let product = (seed % 4 == 0).then(|| seed % DEFAULT_PRODUCTS.len());
    let discount = if seed % 9 == 0 { 500 } else { 0 };

    SaleDraft {
        client: CLIENTS[seed % CLIENTS.len()].to_string(),
        barber: barber.to_string(),
        haircut: Money::from_cents(haircut),
        beard: Money::from_cents(beard),
        eyebrow: Money::from_cents(eyebrow),
        product_name: product.map(|p| DEFAULT_PRODUCTS[p].to_string()),
        product_price: Money::from_cents(product.map_or(0, |p| PRODUCT_PRICES[p])),
        discount: Money::from_cents(discount),
    }
}
