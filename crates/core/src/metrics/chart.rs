//! Layout of the monthly received-payments line chart.
//!
//! Maps `(index, amount)` pairs onto a fixed logical canvas. Pure and
//! deterministic: the same trend always produces the same coordinates.

use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::metrics_model::MonthlyAmount;

/// Fractions of the vertical range that get a grid line and label.
const TICK_RATIOS: [f64; 3] = [0.0, 0.5, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Default for ChartLayout {
    fn default() -> Self {
        ChartLayout {
            width: 700.0,
            height: 300.0,
            padding: 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
    /// Month without the century, e.g. `24-04`.
    pub label: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisTick {
    pub y: f64,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendChart {
    pub layout: ChartLayout,
    pub points: Vec<ChartPoint>,
    pub ticks: Vec<AxisTick>,
    /// SVG path data through every point.
    pub path: String,
}

impl ChartLayout {
    fn plot_width(&self) -> f64 {
        self.width - 2.0 * self.padding
    }

    fn plot_height(&self) -> f64 {
        self.height - 2.0 * self.padding
    }

    /// Horizontal position of point `index` out of `count`. A lone point is
    /// centred.
    pub fn x_for(&self, index: usize, count: usize) -> f64 {
        if count <= 1 {
            return self.padding + self.plot_width() / 2.0;
        }
        self.padding + (index as f64 / (count - 1) as f64) * self.plot_width()
    }

    /// Vertical position of `amount` on a `[min, max]` scale. A flat range is
    /// drawn through the vertical centre.
    pub fn y_for(&self, amount: f64, min: f64, max: f64) -> f64 {
        let range = max - min;
        if range == 0.0 {
            return self.height - self.padding - self.plot_height() / 2.0;
        }
        self.height - self.padding - ((amount - min) / range) * self.plot_height()
    }

    /// Lays out a trend series. The vertical scale always includes zero.
    pub fn plot(&self, trend: &[MonthlyAmount]) -> TrendChart {
        if trend.is_empty() {
            return TrendChart {
                layout: *self,
                points: Vec::new(),
                ticks: Vec::new(),
                path: String::new(),
            };
        }

        let amounts: Vec<f64> = trend
            .iter()
            .map(|entry| entry.amount.to_f64().unwrap_or(0.0))
            .collect();
        let max = amounts.iter().copied().fold(f64::MIN, f64::max);
        let min = amounts.iter().copied().fold(0.0, f64::min);

        let points: Vec<ChartPoint> = trend
            .iter()
            .zip(&amounts)
            .enumerate()
            .map(|(index, (entry, amount))| ChartPoint {
                x: self.x_for(index, trend.len()),
                y: self.y_for(*amount, min, max),
                label: entry.month.get(2..).unwrap_or(&entry.month).to_string(),
                amount: entry.amount,
            })
            .collect();

        let ticks = TICK_RATIOS
            .iter()
            .map(|ratio| AxisTick {
                y: self.height - self.padding - ratio * self.plot_height(),
                value: (min + ratio * (max - min)).round() as i64,
            })
            .collect();

        let path = points
            .iter()
            .enumerate()
            .map(|(index, point)| {
                let command = if index == 0 { 'M' } else { 'L' };
                format!("{} {} {}", command, point.x, point.y)
            })
            .collect::<Vec<_>>()
            .join(" ");

        TrendChart {
            layout: *self,
            points,
            ticks,
            path,
        }
    }
}
