use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    Error, Result,
    clock::{Clock, SystemClock},
    derivation::DerivedRecord,
    session::{
        config::{Cfg, CoreConfig},
        entities::{Profile, ProfileId, Registry, Weight},
        gate::{GateResult, GateState, VisibilityGate},
        message::StatusMessage,
    },
};

pub mod config;
pub mod entities;
pub mod gate;
pub mod message;

/// A [`Session`] behind the single lock that serializes all mutations.
pub type SharedSession = Arc<Mutex<Session>>;

/// Central access point for all session state.
///
/// The [`Session`] owns the profile registry, the visibility gate and the
/// transient input buffers, and keeps them consistent: whenever the active
/// profile changes the gate is closed and every buffer is cleared. State lives
/// only as long as the session does.
#[derive(Debug)]
pub struct Session {
    registry: Registry,
    gate: VisibilityGate,
    pending_weight: String,
    message: Option<StatusMessage>,
    clock: Box<dyn Clock>,
    cfg: Cfg,
}

/// Everything a presentation layer needs to render the active profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub profile: Option<Profile>,
    /// Whether the start weight form should be offered.
    pub needs_start_weight: bool,
    /// The start weight, present only while the gate is open.
    pub start_weight: Option<Weight>,
    pub records: Vec<DerivedRecord>,
    pub gate: GateState,
    pub status: Option<StatusMessage>,
    pub message: Option<&'static str>,
}

impl Session {
    pub fn new(cfg: Cfg) -> Self {
        Self::with_clock(cfg, SystemClock)
    }

    /// Create a session that stamps measurements with dates from `clock`.
    ///
    /// The configured default profiles are added and the first one is
    /// activated.
    pub fn with_clock(cfg: Cfg, clock: impl Clock + 'static) -> Self {
        let mut registry = Registry::new();
        for name in &cfg.read().default_profiles {
            if let Err(err) = registry.add_profile(name) {
                warn!("Skipping default profile {name:?}: {err}");
            }
        }

        if let Some(first) = registry.profiles().first().map(Profile::id) {
            // The id was just taken from the registry
            let _ = registry.switch_active(first);
        }

        Self {
            registry,
            gate: VisibilityGate::default(),
            pending_weight: String::new(),
            message: None,
            clock: Box::new(clock),
            cfg,
        }
    }

    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn cfg(&self) -> &Cfg {
        &self.cfg
    }

    // Profiles

    pub fn add_profile(&mut self, name: &str) -> Result<Profile> {
        self.registry
            .add_profile(name)
            .inspect_err(|err| warn!("Rejected new profile: {err}"))
    }

    /// Make another profile active, closing the gate and clearing all input.
    ///
    /// Unknown ids leave the session untouched.
    pub fn switch_active(&mut self, id: ProfileId) -> Result<()> {
        self.registry
            .switch_active(id)
            .inspect_err(|err| warn!("Ignoring profile switch: {err}"))?;
        self.reset_transient();

        Ok(())
    }

    /// The active profile, or the first profile if none has been activated.
    pub fn active_profile(&self) -> Option<&Profile> {
        self.registry.active_or_first()
    }

    // Measurements

    /// Set the active profile's start weight and private code.
    pub fn commit_start_weight(&mut self, weight: f64, code: &str) -> Result<&Profile> {
        let weight = Weight::new(weight)?;
        let today = self.clock.today();
        let profile = self
            .registry
            .active_or_first_mut()
            .ok_or(Error::NoActiveProfile)?;

        if let Err(err) = profile.commit_start_weight(weight, code, today) {
            if matches!(err, Error::MissingCode) {
                self.message = Some(StatusMessage::MissingCode);
            }
            warn!("Rejected start weight: {err}");
            return Err(err);
        }

        self.message = Some(StatusMessage::StartWeightSaved);
        Ok(profile)
    }

    /// Like [`Session::commit_start_weight`], reading the weight from the
    /// pending input buffer.
    pub fn commit_pending_start_weight(&mut self, code: &str) -> Result<&Profile> {
        let weight = self.pending_weight.parse::<Weight>()?;
        self.commit_start_weight(weight.get(), code)
    }

    /// Append a measurement for today to the active profile.
    pub fn add_measurement(&mut self, weight: f64) -> Result<&Profile> {
        let weight = Weight::new(weight)?;
        let today = self.clock.today();
        let profile = self
            .registry
            .active_or_first_mut()
            .ok_or(Error::NoActiveProfile)?;

        profile
            .add_measurement(weight, today)
            .inspect_err(|err| warn!("Rejected measurement: {err}"))?;

        Ok(profile)
    }

    pub fn pending_weight(&self) -> &str {
        &self.pending_weight
    }

    pub fn set_pending_weight(&mut self, text: &str) {
        self.pending_weight = text.to_string();
    }

    /// Add the pending weight as a measurement, clearing the buffer on success.
    pub fn add_pending_measurement(&mut self) -> Result<&Profile> {
        let weight = self.pending_weight.parse::<Weight>()?;
        self.add_measurement(weight.get())?;
        self.pending_weight.clear();

        self.active_profile().ok_or(Error::NoActiveProfile)
    }

    // Visibility

    /// Check a code against the active profile's private code.
    pub fn submit_code(&mut self, entered: &str) -> GateResult {
        let result = self.gate.submit(entered, self.registry.active_or_first());
        self.message = Some(result.message);

        result
    }

    /// Hide raw weights again.
    pub fn hide(&mut self) {
        self.gate.close();
        self.message = None;
    }

    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    pub fn entered_code(&self) -> &str {
        self.gate.entered_code()
    }

    pub fn message(&self) -> Option<StatusMessage> {
        self.message
    }

    /// The current status message in the configured language.
    pub fn message_text(&self) -> Option<&'static str> {
        let language = self.cfg.read().language;
        self.message.map(|m| m.text(language))
    }

    // Views

    /// Derived records of the active profile under the current gate state.
    pub fn derive_active(&self) -> Vec<DerivedRecord> {
        self.active_profile()
            .map(|p| p.derive(self.gate.state()))
            .unwrap_or_default()
    }

    pub fn current_view(&self) -> View {
        let profile = self.active_profile();
        let gate = self.gate.state();

        View {
            profile: profile.cloned(),
            needs_start_weight: profile.is_some_and(|p| p.start_weight().is_none()),
            start_weight: profile
                .and_then(Profile::start_weight)
                .filter(|_| gate.is_open()),
            records: self.derive_active(),
            gate,
            status: self.message,
            message: self.message_text(),
        }
    }

    fn reset_transient(&mut self) {
        self.gate.close();
        self.pending_weight.clear();
        self.message = None;
        debug!("Cleared visibility gate and input buffers");
    }

    #[cfg(test)]
    /// Return a mock [`Session`] with the default configuration and a clock
    /// fixed at 2024-01-15.
    pub(crate) fn mock() -> Self {
        use crate::clock::FixedClock;

        Self::with_clock(
            CoreConfig::mock().into_handle(),
            FixedClock(test_today()),
        )
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(CoreConfig::default().into_handle())
    }
}

#[cfg(test)]
fn test_today() -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        ValidationError,
        clock::FixedClock,
        session::config::Language,
    };

    fn weight(value: f64) -> Weight {
        Weight::new(value).unwrap()
    }

    fn second_profile(session: &Session) -> ProfileId {
        session.registry().profiles().get(1).unwrap().id()
    }

    #[test]
    fn test_new_seeds_default_profiles() {
        let session = Session::mock();

        let names: Vec<_> = session
            .registry()
            .profiles()
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(names, vec!["User 1", "User 2"]);
        assert_eq!(session.registry().active_id(), Some(ProfileId::FIRST));
        assert_eq!(session.gate_state(), GateState::Closed);
    }

    #[test]
    fn test_new_without_default_profiles() {
        let cfg = CoreConfig {
            default_profiles: Vec::new(),
            ..CoreConfig::mock()
        };
        let mut session = Session::with_clock(cfg.into_handle(), FixedClock(test_today()));

        assert!(session.active_profile().is_none());
        assert!(matches!(
            session.add_measurement(80.0),
            Err(Error::NoActiveProfile)
        ));

        let anna = session.add_profile("Anna").unwrap();
        // Nothing has been switched to yet, so the first profile is used
        assert_eq!(session.registry().active(), None);
        assert_eq!(session.active_profile(), Some(&anna));
    }

    #[test]
    fn test_commit_start_weight() {
        let mut session = Session::mock();

        let profile = session.commit_start_weight(80.5, "abc").unwrap();

        assert_eq!(profile.start_weight(), Some(weight(80.5)));
        assert_eq!(profile.measurements().len(), 1);
        let seed = profile.measurements().first().unwrap();
        assert_eq!(seed.date(), test_today());
        assert_eq!(seed.weight(), weight(80.5));

        let records = session.derive_active();
        assert_eq!(records.len(), 1);
        assert_eq!(records.first().unwrap().change_from_start(), 0.0);
        assert_eq!(session.message(), Some(StatusMessage::StartWeightSaved));
    }

    #[test]
    fn test_add_measurement_after_start() {
        let mut session = Session::mock();
        session.commit_start_weight(80.5, "abc").unwrap();

        session.add_measurement(79.5).unwrap();

        let records = session.derive_active();
        assert_eq!(records.len(), 2);
        assert_eq!(records.get(1).unwrap().change_from_prev(), -1.24);
        assert_eq!(records.get(1).unwrap().change_from_start(), -1.24);
    }

    #[test]
    fn test_commit_start_weight_invalid_weight() {
        let mut session = Session::mock();

        assert!(matches!(
            session.commit_start_weight(0.0, "abc"),
            Err(Error::Validation(ValidationError::NotPositive(_)))
        ));
        let profile = session.active_profile().unwrap();
        assert_eq!(profile.start_weight(), None);
        assert!(profile.measurements().is_empty());
        assert!(!profile.has_code());
        assert_eq!(session.message(), None);
    }

    #[test]
    fn test_commit_start_weight_missing_code() {
        let mut session = Session::mock();

        assert!(matches!(
            session.commit_start_weight(80.5, ""),
            Err(Error::MissingCode)
        ));
        assert_eq!(session.active_profile().unwrap().start_weight(), None);
        assert_eq!(session.message(), Some(StatusMessage::MissingCode));
        assert_eq!(
            session.message_text(),
            Some("Please create a private code")
        );
    }

    #[test]
    fn test_commit_start_weight_again_replaces_code_only() {
        let mut session = Session::mock();
        session.commit_start_weight(80.5, "abc").unwrap();

        let profile = session.commit_start_weight(75.0, "new").unwrap();

        assert_eq!(profile.start_weight(), Some(weight(80.5)));
        assert_eq!(profile.measurements().len(), 1);
        assert!(!session.submit_code("abc").opened);
        assert!(session.submit_code("new").opened);
    }

    #[test]
    fn test_add_measurement_requires_start_weight() {
        let mut session = Session::mock();

        assert!(matches!(
            session.add_measurement(79.5),
            Err(Error::Validation(ValidationError::MissingStartWeight))
        ));
        assert!(session.derive_active().is_empty());
    }

    #[test]
    fn test_same_weight_twice() {
        let mut session = Session::mock();
        session.commit_start_weight(80.5, "abc").unwrap();

        session.add_measurement(79.0).unwrap();
        session.add_measurement(79.0).unwrap();

        let records = session.derive_active();
        assert_eq!(records.len(), 3);
        assert_eq!(records.get(1).unwrap().weight(), records.get(2).unwrap().weight());
        assert_eq!(records.get(2).unwrap().change_from_prev(), 0.0);
    }

    #[test]
    fn test_wrong_code() {
        let mut session = Session::mock();
        session.commit_start_weight(80.5, "abc").unwrap();

        let result = session.submit_code("wrong");

        assert!(!result.opened);
        assert_eq!(session.gate_state(), GateState::Closed);
        assert_eq!(session.message(), Some(StatusMessage::WrongCode));
        assert!(
            session
                .derive_active()
                .iter()
                .all(|r| r.display_weight().is_none())
        );
    }

    #[test]
    fn test_correct_code_then_switch_back_and_forth() {
        let mut session = Session::mock();
        session.commit_start_weight(80.5, "abc").unwrap();

        assert!(session.submit_code("abc").opened);
        assert_eq!(session.gate_state(), GateState::Open);
        assert_eq!(
            session.derive_active().first().unwrap().display_weight(),
            Some(weight(80.5))
        );

        let other = second_profile(&session);
        session.switch_active(other).unwrap();
        session.switch_active(ProfileId::FIRST).unwrap();

        assert_eq!(session.gate_state(), GateState::Closed);
        assert_eq!(session.derive_active().first().unwrap().display_weight(), None);
    }

    #[test]
    fn test_switch_clears_transient_state() {
        let mut session = Session::mock();
        session.commit_start_weight(80.5, "abc").unwrap();
        session.submit_code("abc");
        session.set_pending_weight("79");

        session.switch_active(second_profile(&session)).unwrap();

        assert_eq!(session.gate_state(), GateState::Closed);
        assert_eq!(session.entered_code(), "");
        assert_eq!(session.pending_weight(), "");
        assert_eq!(session.message(), None);
    }

    #[test]
    fn test_switch_unknown_profile() {
        let mut session = Session::mock();
        session.commit_start_weight(80.5, "abc").unwrap();
        session.submit_code("abc");

        assert!(matches!(
            session.switch_active(ProfileId::from(42)),
            Err(Error::ProfileNotFound(_))
        ));
        assert_eq!(session.registry().active_id(), Some(ProfileId::FIRST));
        assert_eq!(session.gate_state(), GateState::Open);
    }

    #[test]
    fn test_gate_closed_after_any_switch() {
        let mut session = Session::mock();
        let third = session.add_profile("Cleo").unwrap().id();

        for id in [ProfileId::FIRST, third, second_profile(&session), third] {
            let _ = session.commit_start_weight(70.0, "code");
            session.submit_code("code");
            session.switch_active(id).unwrap();
            assert_eq!(session.gate_state(), GateState::Closed);
        }
    }

    #[test]
    fn test_measurements_stay_with_their_profile() {
        let mut session = Session::mock();
        session.commit_start_weight(80.5, "abc").unwrap();

        session.switch_active(second_profile(&session)).unwrap();
        session.commit_start_weight(60.0, "xyz").unwrap();
        session.add_measurement(61.2).unwrap();

        assert_eq!(session.derive_active().len(), 2);
        session.switch_active(ProfileId::FIRST).unwrap();
        assert_eq!(session.derive_active().len(), 1);
    }

    #[test]
    fn test_hide() {
        let mut session = Session::mock();
        session.commit_start_weight(80.5, "abc").unwrap();
        session.submit_code("abc");

        session.hide();

        assert_eq!(session.gate_state(), GateState::Closed);
        assert_eq!(session.entered_code(), "");
        assert_eq!(session.message(), None);
    }

    #[test]
    fn test_pending_weight() {
        let mut session = Session::mock();
        session.set_pending_weight("80.5");
        session.commit_pending_start_weight("abc").unwrap();
        // Committing the start weight keeps the input
        assert_eq!(session.pending_weight(), "80.5");

        session.set_pending_weight(" 79.5 ");
        let profile = session.add_pending_measurement().unwrap();
        assert_eq!(profile.measurements().len(), 2);
        assert_eq!(session.pending_weight(), "");
    }

    #[test]
    fn test_pending_weight_rejected() {
        let mut session = Session::mock();
        session.commit_start_weight(80.5, "abc").unwrap();
        session.set_pending_weight("heavy");

        assert!(matches!(
            session.add_pending_measurement(),
            Err(Error::Validation(ValidationError::NotANumber(_)))
        ));
        assert_eq!(session.pending_weight(), "heavy");
        assert_eq!(session.derive_active().len(), 1);
    }

    #[test]
    fn test_current_view() {
        let mut session = Session::mock();

        let view = session.current_view();
        assert!(view.needs_start_weight);
        assert!(view.records.is_empty());

        session.commit_start_weight(80.5, "abc").unwrap();
        session.add_measurement(79.5).unwrap();

        let hidden = session.current_view();
        assert_eq!(hidden.profile.as_ref().map(Profile::id), Some(ProfileId::FIRST));
        assert!(!hidden.needs_start_weight);
        assert_eq!(hidden.start_weight, None);
        assert_eq!(hidden.records.len(), 2);
        assert_eq!(hidden.gate, GateState::Closed);

        session.submit_code("abc");
        let shown = session.current_view();
        assert_eq!(shown.start_weight, Some(weight(80.5)));
        assert_eq!(shown.records.get(1).unwrap().display_weight(), Some(weight(79.5)));
        assert_eq!(shown.status, Some(StatusMessage::CodeCorrect));
        assert_eq!(
            shown.message,
            Some("Code correct! Weight data is now shown.")
        );
    }

    #[test]
    fn test_message_language() {
        let mut session = Session::mock();
        session.cfg().write().language = Language::German;

        let _ = session.commit_start_weight(80.5, " ");

        assert_eq!(
            session.message_text(),
            Some("Bitte erstelle einen privaten Code")
        );
    }

    #[test]
    fn test_shared_session() {
        let shared = Session::mock().into_shared();

        shared.lock().commit_start_weight(80.5, "abc").unwrap();

        assert_eq!(shared.lock().derive_active().len(), 1);
    }
}
