//! # Table Engine
//!
//! Occupancy state machine for dining tables.
//!
//! ## State Machine
//! ```text
//!                    reserve()
//!        ┌──────────────────────────────┐
//!        │                              ▼
//!  ┌───────────┐   release()     ┌───────────┐
//!  │ AVAILABLE │◄────────────────│ RESERVED  │
//!  └─────┬─────┘                 └─────┬─────┘
//!        │ occupy(order)               │ occupy(order)
//!        │ (order engine)              │ (order engine)
//!        ▼                             ▼
//!  ┌─────────────────────────────────────────┐
//!  │                OCCUPIED                 │  current_order_id = Some(order)
//!  └────────────────────┬────────────────────┘
//!                       │ vacate()  (order closed, PAID or CANCELLED)
//!                       ▼
//!                 ┌───────────┐   clean()
//!                 │   DIRTY   │───────────────► AVAILABLE
//!                 └───────────┘
//! ```
//!
//! `occupy` and `vacate` are crate-private: only the order engine calls
//! them, as one half of a joint order/table transition.

use tracing::debug;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Table, TableStatus};
use crate::validation::{validate_table_capacity, validate_table_number};

// =============================================================================
// Transitions
// =============================================================================

impl Table {
    /// Binds an order. AVAILABLE and RESERVED tables accept; anything else
    /// is rejected and the table is left as it was.
    pub(crate) fn occupy(&mut self, order_id: &str) -> CoreResult<()> {
        match self.status {
            TableStatus::Available | TableStatus::Reserved => {
                debug!(table_id = %self.id, from = %self.status, order_id, "Table occupied");
                self.status = TableStatus::Occupied;
                self.current_order_id = Some(order_id.to_string());
                Ok(())
            }
            TableStatus::Occupied => Err(CoreError::TableOccupied {
                table_id: self.id.clone(),
                order_id: self.current_order_id.clone(),
            }),
            TableStatus::Dirty => Err(self.invalid("seat guests")),
        }
    }

    /// Releases the bound order. The table needs bussing afterwards.
    pub(crate) fn vacate(&mut self) -> CoreResult<()> {
        if self.status != TableStatus::Occupied {
            return Err(self.invalid("vacate"));
        }
        debug!(table_id = %self.id, "Table vacated, waiting for bussing");
        self.status = TableStatus::Dirty;
        self.current_order_id = None;
        Ok(())
    }

    /// AVAILABLE → RESERVED.
    pub fn reserve(&mut self) -> CoreResult<()> {
        self.transition(TableStatus::Available, TableStatus::Reserved, "reserve")
    }

    /// RESERVED → AVAILABLE.
    pub fn release(&mut self) -> CoreResult<()> {
        self.transition(TableStatus::Reserved, TableStatus::Available, "release")
    }

    /// DIRTY → AVAILABLE (bussing acknowledged).
    pub fn clean(&mut self) -> CoreResult<()> {
        self.transition(TableStatus::Dirty, TableStatus::Available, "clean")
    }

    fn transition(
        &mut self,
        from: TableStatus,
        to: TableStatus,
        action: &'static str,
    ) -> CoreResult<()> {
        if self.status != from {
            return Err(self.invalid(action));
        }
        debug!(table_id = %self.id, %from, %to, "Table transition");
        self.status = to;
        Ok(())
    }

    fn invalid(&self, action: &'static str) -> CoreError {
        CoreError::InvalidTableTransition {
            table_id: self.id.clone(),
            current: self.status,
            action,
        }
    }
}

// =============================================================================
// Floor Configuration
// =============================================================================

/// Number for a newly added table: one past the highest, or 1.
pub fn next_table_number(tables: &[Table]) -> u32 {
    tables.iter().map(|t| t.number).max().map_or(1, |n| n + 1)
}

pub fn find_table<'a>(tables: &'a [Table], id: &str) -> CoreResult<&'a Table> {
    tables
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| CoreError::TableNotFound(id.to_string()))
}

pub fn find_table_mut<'a>(tables: &'a mut [Table], id: &str) -> CoreResult<&'a mut Table> {
    tables
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| CoreError::TableNotFound(id.to_string()))
}

/// Validates number and capacity for a table being added or edited.
///
/// `editing` is the id of the table being changed, so it does not collide
/// with its own number.
pub fn validate_table_layout(
    tables: &[Table],
    number: u32,
    capacity: u32,
    editing: Option<&str>,
) -> CoreResult<()> {
    validate_table_number(number)?;
    validate_table_capacity(capacity)?;

    let taken = tables
        .iter()
        .any(|t| t.number == number && Some(t.id.as_str()) != editing);
    if taken {
        return Err(ValidationError::Duplicate {
            field: "table number".to_string(),
            value: number.to_string(),
        }
        .into());
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn table(status: TableStatus) -> Table {
        let mut t = Table::new("t1", 1, 4);
        t.status = status;
        t
    }

    #[test]
    fn test_occupy_from_available_and_reserved() {
        for status in [TableStatus::Available, TableStatus::Reserved] {
            let mut t = table(status);
            t.occupy("o1").unwrap();
            assert_eq!(t.status(), TableStatus::Occupied);
            assert_eq!(t.current_order_id(), Some("o1"));
        }
    }

    #[test]
    fn test_occupy_rejects_occupied_without_change() {
        let mut t = table(TableStatus::Available);
        t.occupy("o1").unwrap();

        let err = t.occupy("o2").unwrap_err();
        assert!(matches!(err, CoreError::TableOccupied { .. }));
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(t.current_order_id(), Some("o1"));
    }

    #[test]
    fn test_occupy_rejects_dirty() {
        let mut t = table(TableStatus::Dirty);
        assert!(t.occupy("o1").is_err());
        assert_eq!(t.status(), TableStatus::Dirty);
        assert!(t.current_order_id().is_none());
    }

    #[test]
    fn test_vacate_then_clean() {
        let mut t = table(TableStatus::Available);
        t.occupy("o1").unwrap();
        t.vacate().unwrap();
        assert_eq!(t.status(), TableStatus::Dirty);
        assert!(t.current_order_id().is_none());

        t.clean().unwrap();
        assert_eq!(t.status(), TableStatus::Available);
    }

    #[test]
    fn test_reserve_release() {
        let mut t = table(TableStatus::Available);
        t.reserve().unwrap();
        assert_eq!(t.status(), TableStatus::Reserved);
        assert!(t.reserve().is_err());
        t.release().unwrap();
        assert_eq!(t.status(), TableStatus::Available);
        assert!(t.release().is_err());
    }

    #[test]
    fn test_clean_requires_dirty() {
        let mut t = table(TableStatus::Reserved);
        let err = t.clean().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Table t1 is RESERVED, cannot clean"
        );
    }

    #[test]
    fn test_next_table_number() {
        assert_eq!(next_table_number(&[]), 1);
        let tables = vec![Table::new("a", 3, 2), Table::new("b", 7, 2)];
        assert_eq!(next_table_number(&tables), 8);
    }

    #[test]
    fn test_validate_table_layout() {
        let tables = vec![Table::new("a", 1, 2), Table::new("b", 2, 4)];
        assert!(validate_table_layout(&tables, 3, 4, None).is_ok());
        assert!(validate_table_layout(&tables, 2, 4, None).is_err());
        assert!(validate_table_layout(&tables, 2, 6, Some("b")).is_ok());
        assert!(validate_table_layout(&tables, 3, 0, None).is_err());
        assert!(validate_table_layout(&tables, 0, 2, None).is_err());
    }
}
