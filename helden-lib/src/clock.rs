//! Source of the calendar date stamped onto new measurements.

use std::fmt::Debug;

use chrono::{Local, NaiveDate};

pub trait Clock: Debug + Send {
    fn today(&self) -> NaiveDate;
}

/// The host's local calendar date.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
