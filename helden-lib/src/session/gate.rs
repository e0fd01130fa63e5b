//! Open/closed switch deciding whether raw weight values are exposed.
//!
//! This is a privacy toggle, not authentication: codes are compared as plain
//! strings and retries are unlimited.

use serde::Serialize;
use strum::Display;
use tracing::debug;

use crate::session::{entities::Profile, message::StatusMessage};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GateState {
    #[default]
    Closed,
    Open,
}

impl GateState {
    pub fn is_open(self) -> bool {
        self == Self::Open
    }
}

/// Outcome of a code submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateResult {
    pub opened: bool,
    pub message: StatusMessage,
}

#[derive(Debug, Default, Clone)]
pub struct VisibilityGate {
    state: GateState,
    entered_code: String,
}

impl VisibilityGate {
    pub fn state(&self) -> GateState {
        self.state
    }

    /// The last code submitted since the gate was closed.
    pub fn entered_code(&self) -> &str {
        &self.entered_code
    }

    /// Check `entered` against the profile's code.
    ///
    /// Every submission is evaluated afresh, so a wrong code closes an open gate.
    pub fn submit(&mut self, entered: &str, profile: Option<&Profile>) -> GateResult {
        self.entered_code = entered.to_string();

        if profile.is_some_and(|p| p.code_matches(entered)) {
            self.state = GateState::Open;
            debug!("Visibility gate opened");
            GateResult {
                opened: true,
                message: StatusMessage::CodeCorrect,
            }
        } else {
            self.state = GateState::Closed;
            GateResult {
                opened: false,
                message: StatusMessage::WrongCode,
            }
        }
    }

    /// Close the gate and forget the entered code.
    pub fn close(&mut self) {
        if self.state.is_open() {
            debug!("Visibility gate closed");
        }
        self.state = GateState::Closed;
        self.entered_code.clear();
    }
}
