//! Shift store enforcing the at-most-one-active-shift invariant.

use tokio::sync::RwLock;

use super::ShiftId;
use super::shift::Shift;
use crate::error::MonitorError;

/// Central store for shift records.
///
/// `create` re-checks the single-active invariant under the store's own
/// write lock; callers additionally serialize the full check-then-act
/// sequence through the shift service's lifecycle mutex.
#[derive(Debug, Default)]
pub struct ShiftLedger {
    shifts: RwLock<Vec<Shift>>,
}

impl ShiftLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the shift with the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::ShiftNotFound`] if no shift with the
    /// given ID exists.
    pub async fn get(&self, shift_id: ShiftId) -> Result<Shift, MonitorError> {
        let shifts = self.shifts.read().await;
        shifts
            .iter()
            .find(|s| s.id == shift_id)
            .cloned()
            .ok_or(MonitorError::ShiftNotFound(shift_id))
    }

    /// Returns the currently active shift, if any.
    pub async fn get_active(&self) -> Option<Shift> {
        let shifts = self.shifts.read().await;
        shifts.iter().find(|s| s.active).cloned()
    }

    /// Returns the next shift sequence number (`max + 1`, or 1 if none).
    pub async fn next_shift_number(&self) -> u64 {
        let shifts = self.shifts.read().await;
        shifts
            .iter()
            .map(|s| s.shift_number)
            .max()
            .map_or(1, |n| n.saturating_add(1))
    }

    /// Stores a new shift record.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::ShiftAlreadyActive`] if the new shift is
    /// marked active while another active shift exists.
    pub async fn create(&self, shift: Shift) -> Result<Shift, MonitorError> {
        let mut shifts = self.shifts.write().await;
        if shift.active
            && let Some(active) = shifts.iter().find(|s| s.active)
        {
            return Err(MonitorError::ShiftAlreadyActive {
                shift_id: active.id,
                name: active.name.clone(),
            });
        }
        shifts.push(shift.clone());
        Ok(shift)
    }

    /// Replaces the stored record for the shift with the same ID.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::ShiftNotFound`] if no shift with the
    /// given ID exists.
    pub async fn update(&self, shift: Shift) -> Result<Shift, MonitorError> {
        let mut shifts = self.shifts.write().await;
        let slot = shifts
            .iter_mut()
            .find(|s| s.id == shift.id)
            .ok_or(MonitorError::ShiftNotFound(shift.id))?;
        *slot = shift.clone();
        Ok(shift)
    }

    /// Returns all shifts ordered by shift number descending (newest
    /// first).
    pub async fn list_all(&self) -> Vec<Shift> {
        let shifts = self.shifts.read().await;
        let mut all: Vec<Shift> = shifts.clone();
        drop(shifts);
        all.sort_by(|a, b| b.shift_number.cmp(&a.shift_number));
        all
    }
}
