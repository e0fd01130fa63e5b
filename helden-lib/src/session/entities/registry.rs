use tracing::debug;

use crate::{
    Error, Result,
    session::entities::{Profile, ProfileId},
};

/// Every profile of a session, plus which one is active.
///
/// The active profile is tracked by id rather than by a flag on each profile,
/// so at most one profile is ever active.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    profiles: Vec<Profile>,
    active: Option<ProfileId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new, inactive profile with the next free id.
    pub fn add_profile(&mut self, name: &str) -> Result<Profile> {
        let profile = Profile::new(self.next_id(), name)?;
        self.profiles.push(profile.clone());

        debug!("Added profile {}: {}", profile.id(), profile.name());

        Ok(profile)
    }

    /// Make the profile with the given id the active one.
    pub fn switch_active(&mut self, id: ProfileId) -> Result<()> {
        if self.get(id).is_none() {
            return Err(Error::ProfileNotFound(id));
        }

        self.active = Some(id);
        debug!("Switched active profile to {id}");

        Ok(())
    }

    /// The explicitly activated profile, if a switch has happened yet.
    pub fn active(&self) -> Option<&Profile> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn active_id(&self) -> Option<ProfileId> {
        self.active
    }

    pub fn is_active(&self, id: ProfileId) -> bool {
        self.active == Some(id)
    }

    /// The active profile, falling back to the first one before any switch.
    pub fn active_or_first(&self) -> Option<&Profile> {
        self.active().or_else(|| self.profiles.first())
    }

    pub(crate) fn active_or_first_mut(&mut self) -> Option<&mut Profile> {
        let id = self
            .active
            .or_else(|| self.profiles.first().map(Profile::id))?;
        self.get_mut(id)
    }

    pub fn get(&self, id: ProfileId) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.id() == id)
    }

    fn get_mut(&mut self, id: ProfileId) -> Option<&mut Profile> {
        self.profiles.iter_mut().find(|p| p.id() == id)
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    fn next_id(&self) -> ProfileId {
        self.profiles
            .iter()
            .map(Profile::id)
            .max()
            .map_or(ProfileId::FIRST, ProfileId::next)
    }
}
