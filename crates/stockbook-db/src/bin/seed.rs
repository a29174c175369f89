//! # Seed Data Generator
//!
//! Populates the database with sample stock for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./stockbook_dev.db with 90 days of history (default)
//! cargo run -p stockbook-db --bin seed
//!
//! # Longer history
//! cargo run -p stockbook-db --bin seed -- --days 365
//!
//! # Specify database path
//! cargo run -p stockbook-db --bin seed -- --db ./data/stockbook.db
//! ```
//!
//! ## Generated Data
//! - Stores: main warehouse, shop floor, cold room
//! - Units: kg, litre, piece, box
//! - Products per store, some without a unit, a few close to expiry
//! - Transactions: one opening delivery per product, then a sale or
//!   restock every few days
//!
//! Output is deterministic: the same `--days` always yields the same rows.

use chrono::{Duration, Local, NaiveDate};
use std::env;
use stockbook_core::{NewProduct, NewStore, NewTransaction, NewUnit};
use stockbook_db::{Database, DbConfig};

/// Stores with the products kept in each, as (name, unit index).
/// `None` leaves the product without a unit.
const STORES: &[(&str, &str, &[(&str, Option<usize>)])] = &[
    (
        "Main Warehouse",
        "Bulk dry goods",
        &[
            ("Rice", Some(0)),
            ("Flour", Some(0)),
            ("Sugar", Some(0)),
            ("Lentils", Some(0)),
            ("Cooking Oil", Some(1)),
            ("Tea", Some(3)),
        ],
    ),
    (
        "Shop Floor",
        "Front of house shelves",
        &[
            ("Soap", Some(2)),
            ("Matches", Some(3)),
            ("Candles", Some(2)),
            ("Batteries", None),
        ],
    ),
    (
        "Cold Room",
        "Chilled and perishable",
        &[
            ("Milk", Some(1)),
            ("Yogurt", Some(2)),
            ("Cheese", Some(0)),
            ("Butter", Some(2)),
        ],
    ),
];

const UNITS: &[(&str, &str)] = &[
    ("kg", "Kilogram"),
    ("litre", "Litre"),
    ("piece", "Single item"),
    ("box", "Boxed pack"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut days: i64 = 90;
    let mut db_path = String::from("./stockbook_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--days" | "-n" => {
                if i + 1 < args.len() {
                    days = args[i + 1].parse().unwrap_or(90);
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
                println!("Stockbook Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -n, --days <N>     Days of transaction history (default: 90)");
                println!("  -d, --db <PATH>    Database file path (default: ./stockbook_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Stockbook Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!("History:  {} days", days);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Schema ready");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();
    let today = Local::now().date_naive();
    let first_day = today - Duration::days(days.max(1));

    let mut unit_ids = Vec::with_capacity(UNITS.len());
    for (name, description) in UNITS {
        let unit = db
            .units()
            .create(&NewUnit {
                name: name.to_string(),
                description: description.to_string(),
            })
            .await?;
        unit_ids.push(unit.id);
    }
    println!("✓ Created {} units", unit_ids.len());

    let mut product_count = 0usize;
    let mut transaction_count = 0usize;

    for (store_idx, (store_name, store_description, products)) in STORES.iter().enumerate() {
        let store = db
            .stores()
            .create(&NewStore {
                name: store_name.to_string(),
                description: store_description.to_string(),
            })
            .await?;

        for (product_idx, (product_name, unit_idx)) in products.iter().enumerate() {
            let seed = store_idx * 100 + product_idx;
            let product = db
                .products()
                .create(&generate_product(
                    product_name,
                    store.id,
                    unit_idx.map(|idx| unit_ids[idx]),
                    first_day,
                    today,
                    seed,
                ))
                .await?;
            product_count += 1;

            for txn in generate_history(product.id, first_day, today, seed) {
                if let Err(e) = db.transactions().create(&txn).await {
                    eprintln!("Failed to insert transaction for {}: {}", product.name, e);
                    continue;
                }
                transaction_count += 1;
            }
        }

        println!("  Seeded store '{}'", store_name);
    }

    let elapsed = start.elapsed();
    println!();
    println!(
        "✓ Generated {} products and {} transactions in {:?}",
        product_count, transaction_count, elapsed
    );

    // Verify balances
    println!();
    println!("Current balances:");
    for row in db.ledger().products_with_balances(None).await? {
        println!(
            "  {:<14} {:>6} {}",
            row.product.name,
            row.balance,
            row.product.unit_name.unwrap_or_default()
        );
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds one product. Every fifth product expires within two weeks.
fn generate_product(
    name: &str,
    store_id: i64,
    unit_id: Option<i64>,
    first_day: NaiveDate,
    today: NaiveDate,
    seed: usize,
) -> NewProduct {
    let shelf_life = if seed % 5 == 0 {
        Duration::days(7 + (seed % 7) as i64)
    } else {
        Duration::days(120 + ((seed * 31) % 240) as i64)
    };

    NewProduct {
        name: name.to_string(),
        store_id: Some(store_id),
        unit_id,
        created_date: Some(first_day),
        expiry_date: Some(today + shelf_life),
        description: None,
    }
}

/// Opening delivery on the first day, then alternating sales and restocks.
///
/// Sales never exceed what has been delivered, so balances stay positive.
fn generate_history(
    product_id: i64,
    first_day: NaiveDate,
    today: NaiveDate,
    seed: usize,
) -> Vec<NewTransaction> {
    let opening = 50 + ((seed * 13) % 150) as i64;
    let step = 2 + (seed % 4) as i64;

    let mut history = vec![NewTransaction::increase(product_id, opening).on(first_day)];
    let mut on_hand = opening;
    let mut day = first_day + Duration::days(step);
    let mut tick = seed;

    while day <= today {
        tick = tick.wrapping_mul(7).wrapping_add(3);

        if tick % 4 == 0 || on_hand < 10 {
            let restock = 20 + (tick % 40) as i64;
            history.push(NewTransaction::increase(product_id, restock).on(day));
            on_hand += restock;
        } else {
            let sold = (1 + (tick % 15) as i64).min(on_hand);
            history.push(NewTransaction::decrease(product_id, sold).on(day));
            on_hand -= sold;
        }

        day += Duration::days(step);
    }

    history
}
