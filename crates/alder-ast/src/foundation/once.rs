//! Write-once cells for resolution state.
//!
//! Every fact the analyzer learns about a node is recorded in an
//! [`OnceRef`]: created unassigned with its owning node, assigned exactly
//! once by exactly one rule application, and read any number of times
//! afterwards. There is no API to clear or replace an assignment, which is
//! what makes rule readiness monotonic: once a cell reports assigned it
//! reports assigned forever, with the same value.
//!
//! Assigning an already-assigned cell is a programming error in the engine,
//! not a recoverable diagnostic, and panics.

use std::fmt;

/// A cell holding at most one assignment of a value.
#[derive(Clone, Default)]
pub struct OnceRef<T> {
    slot: Option<T>,
}

impl<T> OnceRef<T> {
    /// Create an unassigned cell.
    pub fn new() -> Self {
        Self { slot: None }
    }

    /// Whether the cell has been assigned.
    pub fn is_assigned(&self) -> bool {
        self.slot.is_some()
    }

    /// Assign the value.
    ///
    /// # Panics
    /// Panics if the cell is already assigned.
    pub fn assign(&mut self, value: T) {
        assert!(
            self.slot.is_none(),
            "OnceRef assigned twice; rule effects must assign each cell exactly once"
        );
        self.slot = Some(value);
    }

    /// Read the value if assigned.
    pub fn get(&self) -> Option<&T> {
        self.slot.as_ref()
    }

    /// Read the value.
    ///
    /// # Panics
    /// Panics if the cell is unassigned. Callers gate on `is_assigned` (or
    /// use [`OnceRef::get`]) when the cell may still be pending.
    pub fn item(&self) -> &T {
        self.slot
            .as_ref()
            .expect("OnceRef read before assignment")
    }
}

impl<T: fmt::Debug> fmt::Debug for OnceRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.slot {
            Some(v) => write!(f, "OnceRef({v:?})"),
            None => write!(f, "OnceRef(<unassigned>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_once() {
        let mut cell = OnceRef::new();
        assert!(!cell.is_assigned());
        assert_eq!(cell.get(), None);

        cell.assign(7);
        assert!(cell.is_assigned());
        assert_eq!(cell.get(), Some(&7));
        assert_eq!(*cell.item(), 7);
    }

    #[test]
    #[should_panic(expected = "assigned twice")]
    fn test_double_assign_panics() {
        let mut cell = OnceRef::new();
        cell.assign(1);
        cell.assign(2);
    }

    #[test]
    #[should_panic(expected = "read before assignment")]
    fn test_item_before_assign_panics() {
        let cell: OnceRef<i32> = OnceRef::new();
        let _ = cell.item();
    }
}
