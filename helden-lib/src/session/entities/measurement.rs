use std::str::FromStr;

use chrono::NaiveDate;
use derive_more::Display;
use getset::CopyGetters;
use serde::Serialize;

use crate::ValidationError;

/// A body weight. Always positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize)]
#[serde(transparent)]
pub struct Weight(f64);

impl Weight {
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(ValidationError::NotPositive(value))
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl FromStr for Weight {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value = trimmed
            .parse::<f64>()
            .map_err(|_| ValidationError::NotANumber(trimmed.to_string()))?;

        Self::new(value)
    }
}

/// One weight observation, stamped with the day it was recorded on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Measurement {
    date: NaiveDate,
    weight: Weight,
}

impl Measurement {
    pub(crate) fn new(date: NaiveDate, weight: Weight) -> Self {
        Self { date, weight }
    }
}
