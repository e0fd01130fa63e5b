use derive_more::{Display, From};
use serde::Serialize;

/// Stable identifier of a [`Profile`](super::Profile).
///
/// Ids are handed out monotonically by the [`Registry`](super::Registry) and
/// never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Serialize)]
#[serde(transparent)]
pub struct ProfileId(u64);

impl ProfileId {
    /// Id given to the first profile of an empty registry.
    pub const FIRST: Self = Self(1);

    pub fn get(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}
