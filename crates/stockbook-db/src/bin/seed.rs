//! # Seed Data Generator
//!
//! Populates the database with development data: a couple of principals, a
//! product catalog, and opening stock recorded through the ledger engine
//! (products are created empty; the seed never writes quantity directly).
//!
//! ## Usage
//! ```bash
//! # Seed the default development database
//! cargo run -p stockbook-db --bin seed
//!
//! # Specify database path
//! cargo run -p stockbook-db --bin seed -- --db ./data/stockbook.db
//! ```

use std::env;

use tracing_subscriber::EnvFilter;

use stockbook_core::{MovementRequest, MovementType, NewProduct};
use stockbook_db::{Database, DbConfig};

/// Catalog fixtures: (sku, name, category, price_cents, threshold, opening stock).
const PRODUCTS: &[(&str, &str, &str, i64, i64, i64)] = &[
    ("KB-MX-01", "Mechanical Keyboard", "Electronics", 8999, 5, 24),
    ("MS-OPT-02", "Optical Mouse", "Electronics", 1999, 10, 60),
    ("MON-27-03", "27in Monitor", "Electronics", 24999, 3, 7),
    ("CBL-USBC-04", "USB-C Cable 2m", "Accessories", 1299, 20, 150),
    ("DSK-STND-05", "Laptop Stand", "Accessories", 3499, 5, 12),
    ("NB-A5-06", "A5 Notebook", "Stationery", 499, 25, 200),
    ("PEN-GEL-07", "Gel Pen 10-Pack", "Stationery", 899, 15, 80),
    ("CHR-ERG-08", "Ergonomic Chair", "Furniture", 34999, 2, 4),
    ("LMP-LED-09", "LED Desk Lamp", "Furniture", 2799, 5, 3),
    ("HDP-BT-10", "Bluetooth Headphones", "Electronics", 12999, 5, 0),
];

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./stockbook_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
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
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count(None).await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        db.close().await;
        return Ok(());
    }

    let admin = db.users().insert("warehouse-admin").await?;
    db.users().insert("floor-clerk").await?;
    println!("✓ Created 2 users");

    println!();
    println!("Generating catalog and opening stock...");

    let ledger = db.ledger();
    let mut stocked = 0;

    for &(sku, name, category, price_cents, threshold, opening) in PRODUCTS {
        let product = db
            .products()
            .insert(&NewProduct {
                sku: sku.to_string(),
                name: name.to_string(),
                category: category.to_string(),
                price_cents,
                low_stock_threshold: Some(threshold),
                description: None,
            })
            .await?;

        // Opening stock goes through the ledger like any other movement
        if opening > 0 {
            ledger
                .record_movement(
                    Some(&admin.id),
                    &MovementRequest {
                        product_id: product.id.clone(),
                        movement_type: MovementType::In,
                        quantity: opening,
                        reason: Some("Opening stock".to_string()),
                    },
                )
                .await?;
            stocked += 1;
        }
    }

    println!("✓ Inserted {} products ({} stocked)", PRODUCTS.len(), stocked);

    // Show the dashboard the way the API would see it
    let stats = ledger.get_stats().await?;
    println!();
    println!("Dashboard snapshot:");
    println!("  Total products: {}", stats.total_products);
    println!("  Low stock:      {}", stats.low_stock_count);
    for p in &stats.low_stock_products {
        println!(
            "    {} ({}) - {} on hand, threshold {}",
            p.name, p.sku, p.quantity, p.low_stock_threshold
        );
    }
    println!("  Recent movements: {}", stats.recent_movements.len());

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
