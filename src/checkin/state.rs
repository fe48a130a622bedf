//! Check-in flow steps.
//!
//! The flow progresses linearly: Scan → Type → Induction → Form →
//! Instructions → Confirmation, with visitors skipping Induction.

use serde::{Deserialize, Serialize};

/// The pages of the check-in wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInStep {
    /// QR scan landing — verifies the token and seeds the session.
    Scan,
    /// Visitor-or-contractor selection.
    Type,
    /// Contractor-only induction question.
    Induction,
    /// Personal details form; submits the check-in to the backend.
    Form,
    /// Site instructions derived from type and induction status.
    Instructions,
    /// Summary page; dismissal ends the session.
    Confirmation,
}

impl CheckInStep {
    /// Route path for this step.
    pub const fn route(&self) -> &'static str {
        match self {
            Self::Scan => "/check-in/scan",
            Self::Type => "/check-in/type",
            Self::Induction => "/check-in/induction",
            Self::Form => "/check-in/form",
            Self::Instructions => "/check-in/instructions",
            Self::Confirmation => "/check-in/confirmation",
        }
    }
}

impl std::fmt::Display for CheckInStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Scan => "scan",
            Self::Type => "type",
            Self::Induction => "induction",
            Self::Form => "form",
            Self::Instructions => "instructions",
            Self::Confirmation => "confirmation",
        };
        write!(f, "{s}")
    }
}
