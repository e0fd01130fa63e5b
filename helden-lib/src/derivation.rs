//! Percentage changes derived from a measurement series.
//!
//! Records are never stored: they are recomputed from the current series and
//! gate state on every read. Changes are always computed from the true
//! weights, only the raw weight itself is withheld while the gate is closed.

use chrono::NaiveDate;
use getset::CopyGetters;
use serde::Serialize;

use crate::session::{
    entities::{Measurement, Weight},
    gate::GateState,
};

/// Direction of a change. A change of exactly zero counts as [`Trend::Down`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Down,
    Up,
}

impl Trend {
    pub fn of(change: f64) -> Self {
        if change > 0.0 { Self::Up } else { Self::Down }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct DerivedRecord {
    date: NaiveDate,
    #[serde(skip)]
    weight: Weight,
    /// Percent change against the preceding measurement, `0` for the first one.
    change_from_prev: f64,
    /// Percent change against the start weight.
    change_from_start: f64,
    /// The raw weight, present only while the gate is open.
    display_weight: Option<Weight>,
}

impl DerivedRecord {
    pub fn prev_trend(&self) -> Trend {
        Trend::of(self.change_from_prev)
    }

    pub fn start_trend(&self) -> Trend {
        Trend::of(self.change_from_start)
    }
}

/// Derive one record per measurement, in series order.
pub fn derive(start: Weight, series: &[Measurement], visibility: GateState) -> Vec<DerivedRecord> {
    let previous = std::iter::once(None).chain(series.iter().map(Some));

    series
        .iter()
        .zip(previous)
        .map(|(measurement, prev)| {
            let weight = measurement.weight();
            let prev_weight = prev.map_or(weight, Measurement::weight);

            DerivedRecord {
                date: measurement.date(),
                weight,
                change_from_prev: percent_change(prev_weight, weight),
                change_from_start: percent_change(start, weight),
                display_weight: visibility.is_open().then_some(weight),
            }
        })
        .collect()
}

/// Percent change from `from` to `to`, rounded to two decimals.
pub fn percent_change(from: Weight, to: Weight) -> f64 {
    round2((to.get() - from.get()) / from.get() * 100.0)
}

/// Format a change with an explicit sign for gains, e.g. `+1.25%` or `-0.50%`.
pub fn format_change(change: f64) -> String {
    if change > 0.0 {
        format!("+{change:.2}%")
    } else {
        format!("{change:.2}%")
    }
}

fn round2(value: f64) -> f64 {
    // Adding zero turns a negative zero into a positive one
    (value * 100.0).round() / 100.0 + 0.0
}
