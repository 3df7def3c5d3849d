//! # Catalog
//!
//! Static menu plus the seed data a fresh install starts from.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ Catalog (read-only)          │      seed_tables()     ──► floor plan
//! │  m1 Margherita Pizza  Main   │      seed_inventory()  ──► store room
//! │  m2 Caesar Salad      Starter│      seed_users()      ──► directory
//! │  m3 Ribeye Steak      Main   │
//! │  m4 Tiramisu          Dessert│   Seeds are only defaults: persisted
//! │  m5 Red Wine (Glass)  Drinks │   state replaces them at boot.
//! └──────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::types::{InventoryItem, MenuItem, Role, Table, TableStatus, User};

/// Read-only menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    menu: Vec<MenuItem>,
}

impl Catalog {
    pub fn new(menu: Vec<MenuItem>) -> Self {
        Catalog { menu }
    }

    /// The house menu.
    pub fn seeded() -> Self {
        let item = |id: &str, name: &str, price_cents: i64, category: &str, n: u8| MenuItem {
            id: id.to_string(),
            name: name.to_string(),
            price_cents,
            category: category.to_string(),
            image: format!("https://picsum.photos/200/200?random={n}"),
        };

        Catalog::new(vec![
            item("m1", "Margherita Pizza", 1250, "Main", 1),
            item("m2", "Caesar Salad", 890, "Starter", 2),
            item("m3", "Ribeye Steak", 2800, "Main", 3),
            item("m4", "Tiramisu", 750, "Dessert", 4),
            item("m5", "Red Wine (Glass)", 600, "Drinks", 5),
        ])
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.menu
    }

    pub fn menu_item(&self, id: &str) -> Option<&MenuItem> {
        self.menu.iter().find(|item| item.id == id)
    }

    /// Category labels in first-seen order, without duplicates.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for item in &self.menu {
            if !seen.contains(&item.category.as_str()) {
                seen.push(&item.category);
            }
        }
        seen
    }

    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a MenuItem> + 'a {
        self.menu.iter().filter(move |item| item.category == category)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::seeded()
    }
}

// =============================================================================
// Seed Data
// =============================================================================

/// Floor plan of a fresh install.
pub fn seed_tables() -> Vec<Table> {
    [
        ("t1", 1, 2, TableStatus::Available),
        ("t2", 2, 4, TableStatus::Available),
        ("t3", 3, 4, TableStatus::Available),
        ("t4", 4, 6, TableStatus::Reserved),
        ("t5", 5, 2, TableStatus::Dirty),
        ("t6", 6, 8, TableStatus::Available),
    ]
    .into_iter()
    .map(|(id, number, capacity, status)| {
        let mut table = Table::new(id, number, capacity);
        table.status = status;
        table
    })
    .collect()
}

/// Store room of a fresh install.
pub fn seed_inventory() -> Vec<InventoryItem> {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();

    vec![
        InventoryItem::new("i1", "Flour", 50.0, "kg", 10.0, date(2023, 10, 1)),
        InventoryItem::new("i2", "Tomatoes", 5.0, "kg", 15.0, date(2023, 10, 25)),
        InventoryItem::new("i3", "Beef Strips", 12.0, "kg", 5.0, date(2023, 10, 20)),
        InventoryItem::new("i4", "Red Wine", 24.0, "bottles", 12.0, date(2023, 9, 15)),
    ]
}

/// Default staff accounts. Credentials are plaintext PINs.
pub fn seed_users() -> Vec<User> {
    [
        ("u1", "Admin Principal", "admin", "1234", Role::Admin, "admin@novaresto.com"),
        ("u2", "Jean Manager", "jmanager", "456", Role::Gerant, "jean@novaresto.com"),
        ("u3", "Chef Bernard", "chefbernie", "789", Role::Cuisinier, "bernard@novaresto.com"),
        ("u4", "Sara Service", "saraservice", "000", Role::Serveur, "sara@novaresto.com"),
    ]
    .into_iter()
    .map(|(id, name, username, credential, role, email)| User {
        id: id.to_string(),
        name: name.to_string(),
        username: username.to_string(),
        credential: credential.to_string(),
        role,
        email: email.to_string(),
        active: true,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_lookup() {
        let catalog = Catalog::seeded();
        assert_eq!(catalog.items().len(), 5);
        assert_eq!(catalog.menu_item("m1").unwrap().price_cents, 1250);
        assert!(catalog.menu_item("m9").is_none());
    }

    #[test]
    fn test_categories_first_seen_order() {
        let catalog = Catalog::seeded();
        assert_eq!(
            catalog.categories(),
            vec!["Main", "Starter", "Dessert", "Drinks"]
        );
        let mains: Vec<_> = catalog.by_category("Main").map(|m| m.id.as_str()).collect();
        assert_eq!(mains, vec!["m1", "m3"]);
    }

    #[test]
    fn test_seed_tables_hold_no_orders() {
        let tables = seed_tables();
        assert_eq!(tables.len(), 6);
        assert!(tables.iter().all(|t| t.current_order_id().is_none()));
        assert!(tables.iter().all(|t| t.status() != TableStatus::Occupied));
        assert_eq!(tables[3].status(), TableStatus::Reserved);
        assert_eq!(tables[4].status(), TableStatus::Dirty);
    }

    #[test]
    fn test_seed_inventory_has_one_critical_line() {
        let critical: Vec<_> = seed_inventory()
            .into_iter()
            .filter(|i| i.stock() < i.min_stock)
            .map(|i| i.name)
            .collect();
        assert_eq!(critical, vec!["Tomatoes".to_string()]);
    }

    #[test]
    fn test_seed_users_cover_every_role() {
        let users = seed_users();
        for role in Role::ALL {
            assert!(users.iter().any(|u| u.role == role));
        }
    }
}
