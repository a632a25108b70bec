//! Authorization status of a referral.
//!
//! The status is classified once per document from the status line and then drives
//! which positional rules apply to the date fields.

use crate::constants::STATUS_DROPDOWN;
use crate::error::IntakeError;
use serde::{Deserialize, Serialize};

/// The insurer's disposition on a referral.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthorizationState {
    Authorized,
    Denied,
    Referral,
    Canceled,
}

/// Status text fragments, checked in this order against the status line.
const STATUS_MARKERS: [(&str, AuthorizationState); 4] = [
    ("Denied", AuthorizationState::Denied),
    ("Covered Benefit", AuthorizationState::Authorized),
    ("No Approval Needed", AuthorizationState::Referral),
    ("Order Canceled", AuthorizationState::Canceled),
];

impl AuthorizationState {
    pub const ALL: [AuthorizationState; 4] = [
        AuthorizationState::Authorized,
        AuthorizationState::Denied,
        AuthorizationState::Referral,
        AuthorizationState::Canceled,
    ];

    /// Classify a status line by substring match.
    ///
    /// Returns `None` when the text carries none of the known markers; callers must treat
    /// that as an input-format error rather than proceed with extraction.
    pub fn classify(status_text: &str) -> Option<Self> {
        let text = status_text.trim();
        STATUS_MARKERS
            .iter()
            .find(|(marker, _)| text.contains(marker))
            .map(|(_, state)| *state)
    }

    /// Upper-case name as used in logs and serialised records.
    pub fn name(self) -> &'static str {
        match self {
            AuthorizationState::Authorized => "AUTHORIZED",
            AuthorizationState::Denied => "DENIED",
            AuthorizationState::Referral => "REFERRAL",
            AuthorizationState::Canceled => "CANCELED",
        }
    }

    /// Display label used by the sheet's status dropdown.
    pub fn label(self) -> &'static str {
        match self {
            AuthorizationState::Authorized => "Authorized",
            AuthorizationState::Referral => "Referral only",
            AuthorizationState::Denied => "Denied",
            AuthorizationState::Canceled => "Canceled",
        }
    }
}

impl std::fmt::Display for AuthorizationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts either the upper-case name (`DENIED`) or the dropdown label (`Referral only`).
impl std::str::FromStr for AuthorizationState {
    type Err = IntakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        AuthorizationState::ALL
            .into_iter()
            .find(|state| state.name() == value || state.label() == value)
            .ok_or_else(|| IntakeError::InvalidStatus {
                value: value.to_string(),
                accepted: STATUS_DROPDOWN.iter().map(|s| s.to_string()).collect(),
            })
    }
}
