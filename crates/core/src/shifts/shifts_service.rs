use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use log::{debug, error, info, warn};

use crate::errors::{Error, Result};
use crate::metrics::{aggregate_metrics, monthly_received_trend, DashboardMetrics, MonthlyAmount};

use super::shifts_model::{DeleteOutcome, SaveOutcome, Shift, ShiftInput, StoreState};
use super::shifts_normalizer::normalize_all;
use super::shifts_traits::{DeleteConfirmation, ShiftRepositoryTrait, ShiftServiceTrait};

struct StoreInner {
    shifts: Arc<Vec<Shift>>,
    /// Generation of the fetch whose result is in `shifts`.
    applied_generation: u64,
    in_flight: usize,
    last_error: Option<String>,
}

/// Owns the in-memory shift collection.
///
/// The collection is only ever replaced wholesale by a successful fetch.
/// Writes go straight to the repository and are followed by a refetch;
/// nothing is merged locally.
pub struct ShiftService {
    repository: Arc<dyn ShiftRepositoryTrait>,
    inner: RwLock<StoreInner>,
    next_generation: AtomicU64,
}

/// Marks an operation as in flight for as long as it is alive.
struct InFlight<'a> {
    service: &'a ShiftService,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut inner = self.service.write();
        inner.in_flight = inner.in_flight.saturating_sub(1);
    }
}

impl ShiftService {
    pub fn new(repository: Arc<dyn ShiftRepositoryTrait>) -> Self {
        ShiftService {
            repository,
            inner: RwLock::new(StoreInner {
                shifts: Arc::new(Vec::new()),
                applied_generation: 0,
                in_flight: 0,
                last_error: None,
            }),
            next_generation: AtomicU64::new(0),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) -> InFlight<'_> {
        self.write().in_flight += 1;
        InFlight { service: self }
    }

    fn record_error(&self, context: &str, err: &Error) {
        let message = format!("{} Error: {}", context, err.user_message());
        error!("{}", message);
        self.write().last_error = Some(message);
    }

    fn find(&self, shift_id: &str) -> Option<Shift> {
        self.read()
            .shifts
            .iter()
            .find(|shift| shift.id == shift_id)
            .cloned()
    }
}

#[async_trait]
impl ShiftServiceTrait for ShiftService {
    fn get_shifts(&self) -> Arc<Vec<Shift>> {
        Arc::clone(&self.read().shifts)
    }

    fn get_state(&self) -> StoreState {
        let inner = self.read();
        StoreState {
            loading: inner.in_flight > 0,
            last_error: inner.last_error.clone(),
            generation: inner.applied_generation,
            shift_count: inner.shifts.len(),
        }
    }

    fn clear_error(&self) {
        self.write().last_error = None;
    }

    fn get_metrics(&self) -> DashboardMetrics {
        aggregate_metrics(&self.get_shifts())
    }

    fn get_monthly_trend(&self) -> Vec<MonthlyAmount> {
        monthly_received_trend(&self.get_shifts())
    }

    async fn fetch_all(&self) -> Result<()> {
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let _in_flight = self.begin();
        debug!("Fetching shifts (generation {})", generation);

        let records = match self.repository.load_shifts().await {
            Ok(records) => records,
            Err(e) => {
                if generation > self.read().applied_generation {
                    self.record_error("Failed to load shifts.", &e);
                }
                return Err(e);
            }
        };

        let shifts = normalize_all(&records);
        let mut inner = self.write();
        if generation < inner.applied_generation {
            debug!(
                "Discarding shifts from generation {}; generation {} already applied",
                generation, inner.applied_generation
            );
            return Ok(());
        }
        debug!(
            "Loaded {} shifts (generation {})",
            shifts.len(),
            generation
        );
        inner.shifts = Arc::new(shifts);
        inner.applied_generation = generation;
        inner.last_error = None;
        Ok(())
    }

    async fn save(&self, input: ShiftInput) -> Result<SaveOutcome> {
        let _in_flight = self.begin();
        self.clear_error();

        let is_update = input
            .existing_id()
            .map(|id| self.find(id).is_some())
            .unwrap_or(false);
        let shift = input.into_shift();

        let result = if is_update {
            self.repository.update_shift(&shift).await
        } else {
            self.repository.add_shift(&shift).await
        };
        if let Err(e) = result {
            self.record_error("Failed to save the shift.", &e);
            return Err(e);
        }

        let outcome = if is_update {
            SaveOutcome::Updated
        } else {
            SaveOutcome::Created
        };
        info!("Shift {} saved ({:?})", shift.id, outcome);

        // The write already succeeded; a failed refresh is recorded for
        // display but does not undo the save.
        if let Err(e) = self.fetch_all().await {
            warn!("Refresh after saving shift {} failed: {}", shift.id, e);
        }
        Ok(outcome)
    }

    async fn delete(
        &self,
        shift_id: &str,
        confirmation: &dyn DeleteConfirmation,
    ) -> Result<DeleteOutcome> {
        let Some(target) = self.find(shift_id) else {
            return Err(Error::NotFound(shift_id.to_string()));
        };
        if !confirmation.confirm_delete(Some(&target)).await {
            debug!("Delete of shift {} cancelled", shift_id);
            return Ok(DeleteOutcome::Cancelled);
        }

        let _in_flight = self.begin();
        if let Err(e) = self.repository.delete_shift(shift_id).await {
            self.record_error("Failed to delete the shift.", &e);
            return Err(e);
        }
        info!("Shift {} deleted", shift_id);

        if let Err(e) = self.fetch_all().await {
            warn!("Refresh after deleting shift {} failed: {}", shift_id, e);
        }
        Ok(DeleteOutcome::Deleted)
    }
}
