//! Domain entities tracked by a [`Session`](crate::Session).
//!
//! A [`Registry`] owns every [`Profile`], and each profile owns its own
//! append-only series of [`Measurement`]s.

mod measurement;
mod profile;
mod profile_id;
mod registry;

pub use measurement::{Measurement, Weight};
pub use profile::Profile;
pub use profile_id::ProfileId;
pub use registry::Registry;
