use chrono::NaiveDate;
use getset::CopyGetters;
use serde::Serialize;
use tracing::debug;

use crate::{
    Error, Result, ValidationError,
    derivation::{self, DerivedRecord},
    session::{
        entities::{Measurement, ProfileId, Weight},
        gate::GateState,
    },
};

/// A tracked person with their own measurement history and private code.
///
/// Only the id and name are serialized. The start weight, the measurements and
/// the code never leave the process through a profile.
#[derive(Debug, Clone, PartialEq, Serialize, CopyGetters)]
pub struct Profile {
    #[getset(get_copy = "pub")]
    id: ProfileId,
    name: String,
    #[serde(skip)]
    #[getset(get_copy = "pub")]
    start_weight: Option<Weight>,
    #[serde(skip)]
    visibility_code: String,
    #[serde(skip)]
    measurements: Vec<Measurement>,
}

impl Profile {
    pub(crate) fn new(id: ProfileId, name: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }

        Ok(Self {
            id,
            name: name.to_string(),
            start_weight: None,
            visibility_code: String::new(),
            measurements: Vec::new(),
        })
    }

    // Fields

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Measurements in the order they were entered.
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn has_code(&self) -> bool {
        !self.visibility_code.is_empty()
    }

    pub(crate) fn code_matches(&self, entered: &str) -> bool {
        self.visibility_code == entered
    }

    // Operations

    /// Set the baseline weight and the private code.
    ///
    /// The start weight can only be set once; later calls leave it untouched
    /// but still replace the code. The first measurement is seeded from the
    /// start weight only while the series is empty.
    pub(crate) fn commit_start_weight(
        &mut self,
        weight: Weight,
        code: &str,
        today: NaiveDate,
    ) -> Result<()> {
        if code.trim().is_empty() {
            return Err(Error::MissingCode);
        }

        // TODO: require the previous code before replacing it once profiles
        // outlive a single session.
        self.visibility_code = code.to_string();

        if self.start_weight.is_none() {
            self.start_weight = Some(weight);
            debug!("Set start weight of profile {}", self.id);
        }

        if self.measurements.is_empty() {
            self.measurements.push(Measurement::new(today, weight));
        }

        Ok(())
    }

    pub(crate) fn add_measurement(&mut self, weight: Weight, today: NaiveDate) -> Result<()> {
        if self.start_weight.is_none() {
            return Err(ValidationError::MissingStartWeight.into());
        }

        self.measurements.push(Measurement::new(today, weight));
        debug!(
            "Added measurement #{} to profile {}",
            self.measurements.len(),
            self.id
        );

        Ok(())
    }

    /// Derive percentage changes for every measurement of this profile.
    pub fn derive(&self, visibility: GateState) -> Vec<DerivedRecord> {
        match self.start_weight {
            Some(start) => derivation::derive(start, &self.measurements, visibility),
            None => Vec::new(),
        }
    }
}
