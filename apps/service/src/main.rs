//! # NovaResto Service Entry Point
//!
//! Headless boot: opens the state database, loads every persisted key,
//! restores the last session and prints the resulting status as JSON.
//!
//! ```text
//! $ NOVA_DB_PATH=./novaresto.db nova-service
//! {
//!   "restaurantName": "NovaResto",
//!   "currencySymbol": "€",
//!   "tables": 6,
//!   ...
//! }
//! ```

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let status = nova_service::run().await?;
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
