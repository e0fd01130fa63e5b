use serde::Serialize;

use crate::session::config::Language;

/// Feedback shown to the user after a start weight commit or a code check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusMessage {
    StartWeightSaved,
    MissingCode,
    CodeCorrect,
    WrongCode,
}

impl StatusMessage {
    pub fn text(self, language: Language) -> &'static str {
        use StatusMessage::*;

        match (language, self) {
            (Language::English, StartWeightSaved) => "Start weight and code saved!",
            (Language::English, MissingCode) => "Please create a private code",
            (Language::English, CodeCorrect) => "Code correct! Weight data is now shown.",
            (Language::English, WrongCode) => "Wrong code. Weight data stays hidden.",
            (Language::German, StartWeightSaved) => "Startgewicht und Code gespeichert!",
            (Language::German, MissingCode) => "Bitte erstelle einen privaten Code",
            (Language::German, CodeCorrect) => "Code korrekt! Gewichtsdaten werden angezeigt.",
            (Language::German, WrongCode) => "Falscher Code. Gewichtsdaten bleiben versteckt.",
        }
    }

    /// Whether the message reports a rejected action.
    pub fn is_error(self) -> bool {
        matches!(self, Self::MissingCode | Self::WrongCode)
    }
}
