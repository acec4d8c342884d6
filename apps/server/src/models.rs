use serde::{Deserialize, Serialize};
use shiftbook_core::{
    metrics::{MonthlyAmount, TrendChart},
    DeleteOutcome, SaveOutcome, Shift,
};

/// Shift as the dashboard table shows it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftView {
    #[serde(flatten)]
    pub shift: Shift,
    pub display_date: String,
    /// Stored salary differs from `hours * rate`.
    pub salary_mismatch: bool,
}

impl From<&Shift> for ShiftView {
    fn from(shift: &Shift) -> Self {
        Self {
            display_date: shift.display_date(),
            salary_mismatch: shift.salary_mismatch(),
            shift: shift.clone(),
        }
    }
}

pub fn shift_views(shifts: &[Shift]) -> Vec<ShiftView> {
    shifts.iter().map(ShiftView::from).collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub outcome: SaveOutcome,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub outcome: DeleteOutcome,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendResponse {
    pub months: Vec<MonthlyAmount>,
    pub chart: TrendChart,
}
