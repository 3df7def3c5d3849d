//! # Access Control
//!
//! Static role → view policy and the operations gated by it.
//!
//! ## Policy
//! ```text
//! ┌───────────┬───────────┬─────┬─────────┬───────────┬──────────────┬──────────┐
//! │ Role      │ DASHBOARD │ POS │ KITCHEN │ INVENTORY │ AI_ASSISTANT │ SETTINGS │
//! ├───────────┼───────────┼─────┼─────────┼───────────┼──────────────┼──────────┤
//! │ ADMIN     │     ✓     │  ✓  │    ✓    │     ✓     │      ✓       │    ✓     │
//! │ GERANT    │     ✓     │  ✓  │    ✓    │     ✓     │      ✓       │    ✗     │
//! │ CUISINIER │     ✓     │  ✗  │    ✓    │     ✓     │      ✗       │    ✗     │
//! │ SERVEUR   │     ✓     │  ✓  │    ✗    │     ✗     │      ✗       │    ✗     │
//! └───────────┴───────────┴─────┴─────────┴───────────┴──────────────┴──────────┘
//! ```
//!
//! Both `Role` and `View` are closed enums and [`permits`] matches them
//! per view, so a new view does not compile until it has a policy row.
//! Every function here is pure and total.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::types::Role;

// =============================================================================
// Views
// =============================================================================

/// A top-level screen of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum View {
    Dashboard,
    Pos,
    Kitchen,
    Inventory,
    AiAssistant,
    Settings,
}

impl View {
    /// Navigation order.
    pub const ALL: [View; 6] = [
        View::Dashboard,
        View::Pos,
        View::Kitchen,
        View::Inventory,
        View::AiAssistant,
        View::Settings,
    ];

    /// Where a denied navigation lands.
    pub const FALLBACK: View = View::Dashboard;

    pub fn as_str(&self) -> &'static str {
        match self {
            View::Dashboard => "DASHBOARD",
            View::Pos => "POS",
            View::Kitchen => "KITCHEN",
            View::Inventory => "INVENTORY",
            View::AiAssistant => "AI_ASSISTANT",
            View::Settings => "SETTINGS",
        }
    }

    /// Sidebar label.
    pub fn label(&self) -> &'static str {
        match self {
            View::Dashboard => "Tableau de bord",
            View::Pos => "Service (POS)",
            View::Kitchen => "Cuisine (KDS)",
            View::Inventory => "Stocks",
            View::AiAssistant => "Nova AI Assistant",
            View::Settings => "Réglages",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|view| view.as_str() == s)
            .ok_or(())
    }
}

// =============================================================================
// Operations
// =============================================================================

/// An engine operation a UI action may reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    /// Open a table in the POS; starts an order.
    SelectTable,
    SubmitOrder,
    ModifyOrder,
    CloseOrder,
    BusTable,
    ReserveTable,
    AdvanceTicket,
    AdjustStock,
    ForecastStock,
    AskAssistant,
    ConfigureFloor,
    ManageUsers,
    ChangeCurrency,
}

impl Operation {
    pub const ALL: [Operation; 13] = [
        Operation::SelectTable,
        Operation::SubmitOrder,
        Operation::ModifyOrder,
        Operation::CloseOrder,
        Operation::BusTable,
        Operation::ReserveTable,
        Operation::AdvanceTicket,
        Operation::AdjustStock,
        Operation::ForecastStock,
        Operation::AskAssistant,
        Operation::ConfigureFloor,
        Operation::ManageUsers,
        Operation::ChangeCurrency,
    ];

    /// The view that hosts the operation.
    pub fn view(&self) -> View {
        match self {
            Operation::SelectTable
            | Operation::SubmitOrder
            | Operation::ModifyOrder
            | Operation::CloseOrder
            | Operation::BusTable
            | Operation::ReserveTable => View::Pos,
            Operation::AdvanceTicket => View::Kitchen,
            Operation::AdjustStock | Operation::ForecastStock => View::Inventory,
            Operation::AskAssistant => View::AiAssistant,
            Operation::ConfigureFloor | Operation::ManageUsers | Operation::ChangeCurrency => {
                View::Settings
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::SelectTable => "SELECT_TABLE",
            Operation::SubmitOrder => "SUBMIT_ORDER",
            Operation::ModifyOrder => "MODIFY_ORDER",
            Operation::CloseOrder => "CLOSE_ORDER",
            Operation::BusTable => "BUS_TABLE",
            Operation::ReserveTable => "RESERVE_TABLE",
            Operation::AdvanceTicket => "ADVANCE_TICKET",
            Operation::AdjustStock => "ADJUST_STOCK",
            Operation::ForecastStock => "FORECAST_STOCK",
            Operation::AskAssistant => "ASK_ASSISTANT",
            Operation::ConfigureFloor => "CONFIGURE_FLOOR",
            Operation::ManageUsers => "MANAGE_USERS",
            Operation::ChangeCurrency => "CHANGE_CURRENCY",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or(())
    }
}

// =============================================================================
// Policy
// =============================================================================

/// Whether `role` may open `view`.
pub fn permits(role: Role, view: View) -> bool {
    use Role::*;

    match view {
        View::Dashboard => true,
        View::Pos => matches!(role, Admin | Gerant | Serveur),
        View::Kitchen | View::Inventory => matches!(role, Admin | Gerant | Cuisinier),
        View::AiAssistant => matches!(role, Admin | Gerant),
        View::Settings => matches!(role, Admin),
    }
}

/// Whether `role` may perform `operation`.
///
/// A cook can read the floor but never opens a ticket.
pub fn permits_operation(role: Role, operation: Operation) -> bool {
    if operation == Operation::SelectTable && role == Role::Cuisinier {
        return false;
    }
    permits(role, operation.view())
}

/// String-keyed check for callers that hold raw identifiers.
///
/// Accepts view names (`"SETTINGS"`) and operation names
/// (`"SELECT_TABLE"`). Unknown role or resource denies.
pub fn permits_named(role: &str, resource: &str) -> bool {
    let Ok(role) = role.parse::<Role>() else {
        return false;
    };
    if let Ok(view) = resource.parse::<View>() {
        return permits(role, view);
    }
    match resource.parse::<Operation>() {
        Ok(operation) => permits_operation(role, operation),
        Err(()) => false,
    }
}

/// Views shown in the navigation menu for `role`, in menu order.
pub fn visible_views(role: Role) -> Vec<View> {
    View::ALL.into_iter().filter(|v| permits(role, *v)).collect()
}

// =============================================================================
// Navigation
// =============================================================================

/// Outcome of a navigation request. Denial carries where to go instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Navigation {
    Granted { view: View },
    Denied { requested: View, fallback: View },
}

impl Navigation {
    /// The view to actually render.
    pub fn view(&self) -> View {
        match self {
            Navigation::Granted { view } => *view,
            Navigation::Denied { fallback, .. } => *fallback,
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, Navigation::Granted { .. })
    }
}

/// Resolves a navigation request for `role`.
pub fn navigate(role: Role, requested: View) -> Navigation {
    if permits(role, requested) {
        Navigation::Granted { view: requested }
    } else {
        Navigation::Denied {
            requested,
            fallback: View::FALLBACK,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_table() {
        let expected = [
            (Role::Admin, [true, true, true, true, true, true]),
            (Role::Gerant, [true, true, true, true, true, false]),
            (Role::Cuisinier, [true, false, true, true, false, false]),
            (Role::Serveur, [true, true, false, false, false, false]),
        ];
        for (role, row) in expected {
            for (view, allowed) in View::ALL.into_iter().zip(row) {
                assert_eq!(permits(role, view), allowed, "{role} on {view}");
            }
        }
    }

    #[test]
    fn test_documented_permits() {
        assert!(!permits(Role::Serveur, View::Settings));
        assert!(permits(Role::Admin, View::Settings));
        assert!(!permits(Role::Cuisinier, View::Pos));
    }

    #[test]
    fn test_cook_cannot_select_table() {
        assert!(!permits_operation(Role::Cuisinier, Operation::SelectTable));
        assert!(permits_operation(Role::Serveur, Operation::SelectTable));
        assert!(permits_operation(Role::Cuisinier, Operation::AdvanceTicket));
        assert!(!permits_operation(Role::Serveur, Operation::AdvanceTicket));
    }

    #[test]
    fn test_settings_operations_admin_only() {
        for op in [
            Operation::ConfigureFloor,
            Operation::ManageUsers,
            Operation::ChangeCurrency,
        ] {
            assert!(permits_operation(Role::Admin, op));
            assert!(!permits_operation(Role::Gerant, op));
        }
    }

    #[test]
    fn test_permits_named_denies_unknown() {
        assert!(permits_named("ADMIN", "SETTINGS"));
        assert!(permits_named("SERVEUR", "SELECT_TABLE"));
        assert!(!permits_named("CUISINIER", "SELECT_TABLE"));
        assert!(!permits_named("OWNER", "DASHBOARD"));
        assert!(!permits_named("ADMIN", "REPORTS"));
        assert!(!permits_named("", ""));
    }

    #[test]
    fn test_visible_views() {
        assert_eq!(visible_views(Role::Serveur), vec![View::Dashboard, View::Pos]);
        assert_eq!(
            visible_views(Role::Cuisinier),
            vec![View::Dashboard, View::Kitchen, View::Inventory]
        );
        assert_eq!(visible_views(Role::Admin).len(), 6);
    }

    #[test]
    fn test_navigate_falls_back_to_dashboard() {
        let nav = navigate(Role::Serveur, View::Settings);
        assert_eq!(
            nav,
            Navigation::Denied {
                requested: View::Settings,
                fallback: View::Dashboard,
            }
        );
        assert_eq!(nav.view(), View::Dashboard);

        let nav = navigate(Role::Gerant, View::Kitchen);
        assert!(nav.is_granted());
        assert_eq!(nav.view(), View::Kitchen);
    }

    #[test]
    fn test_view_wire_name() {
        assert_eq!(
            serde_json::to_string(&View::AiAssistant).unwrap(),
            "\"AI_ASSISTANT\""
        );
    }
}
