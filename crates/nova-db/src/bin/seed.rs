//! # Seed Data Writer
//!
//! Writes the fresh-install floor plan, store room, staff directory and
//! currency into a database file.
//!
//! ## Usage
//! ```bash
//! # Seed ./novaresto_dev.db (skipped if it already holds state)
//! cargo run -p nova-db --bin seed
//!
//! # Specify database path, overwrite existing state
//! cargo run -p nova-db --bin seed -- --db ./data/novaresto.db --force
//! ```

use nova_core::{Restaurant, StateKey};
use nova_db::{apply_writes, pending_writes, Database, DbConfig};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./novaresto_dev.db");
    let mut force = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--force" | "-f" => force = true,
            "--help" | "-h" => {
                println!("NovaResto Seed Data Writer");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./novaresto_dev.db)");
                println!("  -f, --force        Overwrite existing state");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 NovaResto Seed Data Writer");
    println!("============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.state().keys().await?;
    if !existing.is_empty() && !force {
        println!("⚠ Database already holds state: {}", existing.join(", "));
        println!("  Pass --force to overwrite it.");
        return Ok(());
    }

    let restaurant = Restaurant::seeded();
    let keys = StateKey::ALL.into_iter().filter(|k| *k != StateKey::Session);
    let writes = pending_writes(&restaurant, keys)?;
    let count = writes.len();
    let failed = apply_writes(&db, writes).await;

    // A stale session would point at a user the fresh directory may not have
    if force {
        db.state().delete(StateKey::Session.as_str()).await?;
    }

    println!();
    println!("✓ Wrote {} of {} keys", count - failed, count);
    println!(
        "  {} tables, {} inventory lines, {} users",
        restaurant.tables().len(),
        restaurant.inventory().len(),
        restaurant.directory().users().len()
    );

    db.close().await;
    Ok(())
}
