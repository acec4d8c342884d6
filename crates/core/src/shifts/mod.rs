//! Shifts module - domain models, normalization, store controller and traits.

mod shifts_model;
mod shifts_normalizer;
mod shifts_service;
mod shifts_traits;

pub use shifts_model::{
    DeleteOutcome, PaymentStatus, SaveOutcome, Shift, ShiftDate, ShiftInput, StoreState,
    TaxStatus,
};
pub use shifts_normalizer::{normalize, normalize_all, parse_amount};
pub use shifts_service::ShiftService;
pub use shifts_traits::{DeleteConfirmation, ShiftRepositoryTrait, ShiftServiceTrait};
