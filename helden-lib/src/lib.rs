//! Core of the Helden weight tracker.
//!
//! Profiles own an append-only series of weight measurements and a private
//! code. Percentage changes are always derived from the true values, while the
//! raw weights themselves only leave the [`Session`] once the visibility gate
//! has been opened with the active profile's code.

use thiserror::Error;

pub mod clock;
pub mod derivation;
pub mod fs;
pub mod session;

pub use session::{Session, SharedSession, View};

use crate::session::entities::ProfileId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Please create a private code")]
    MissingCode,
    #[error("No profile with id {0}")]
    ProfileNotFound(ProfileId),
    #[error("There is no profile to work with")]
    NoActiveProfile,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("Failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
    #[error("$HOME must exist")]
    NoHomeDir,
}

/// Input rejected before it could touch any state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("Weight must be a positive number, got {0}")]
    NotPositive(f64),
    #[error("Profile name must not be empty")]
    EmptyName,
    #[error("A start weight must be set before adding measurements")]
    MissingStartWeight,
}
