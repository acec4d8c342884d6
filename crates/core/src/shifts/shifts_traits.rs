use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::Result;
use crate::metrics::{DashboardMetrics, MonthlyAmount};
use crate::shifts::shifts_model::{DeleteOutcome, SaveOutcome, Shift, ShiftInput, StoreState};

/// Trait for the backing store of shifts.
///
/// Reads return the store's raw rows; normalization happens in the service.
#[async_trait]
pub trait ShiftRepositoryTrait: Send + Sync {
    async fn load_shifts(&self) -> Result<Vec<Value>>;
    async fn add_shift(&self, shift: &Shift) -> Result<()>;
    async fn update_shift(&self, shift: &Shift) -> Result<()>;
    async fn delete_shift(&self, shift_id: &str) -> Result<()>;
}

/// Asks the user to confirm a destructive action.
#[async_trait]
pub trait DeleteConfirmation: Send + Sync {
    async fn confirm_delete(&self, shift: Option<&Shift>) -> bool;
}

/// Fixed answer, for callers that collected the confirmation up front.
#[async_trait]
impl DeleteConfirmation for bool {
    async fn confirm_delete(&self, _shift: Option<&Shift>) -> bool {
        *self
    }
}

/// Trait for shift store operations
#[async_trait]
pub trait ShiftServiceTrait: Send + Sync {
    /// Current collection snapshot.
    fn get_shifts(&self) -> Arc<Vec<Shift>>;
    fn get_state(&self) -> StoreState;
    fn clear_error(&self);
    fn get_metrics(&self) -> DashboardMetrics;
    fn get_monthly_trend(&self) -> Vec<MonthlyAmount>;
    async fn fetch_all(&self) -> Result<()>;
    async fn save(&self, input: ShiftInput) -> Result<SaveOutcome>;
    async fn delete(
        &self,
        shift_id: &str,
        confirmation: &dyn DeleteConfirmation,
    ) -> Result<DeleteOutcome>;
}
