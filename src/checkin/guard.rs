//! Flow guard — precondition checks that run before any step logic.
//!
//! One declarative table maps each step to the flow keys it requires.
//! A missing key is not an error: the guard redirects to the configured
//! fallback route and the flow restarts. The induction step carries one
//! extra rule — a contractor-only page must never be reachable by a
//! visitor, who is redirected back to the type step instead.

use super::model::{CheckInSession, CheckInType, flow_keys};
use super::state::CheckInStep;

/// Result of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// All preconditions hold; render the step.
    Proceed,
    /// A precondition is missing; redirect to this route instead.
    Redirect(String),
}

/// Flow keys each step requires before it may render.
const fn required_keys(step: CheckInStep) -> &'static [&'static str] {
    match step {
        CheckInStep::Scan => &[],
        CheckInStep::Type => &[flow_keys::JOBSITE_ID],
        CheckInStep::Induction => &[flow_keys::JOBSITE_ID, flow_keys::CHECK_IN_TYPE],
        CheckInStep::Form => &[
            flow_keys::JOBSITE_ID,
            flow_keys::QR_TOKEN,
            flow_keys::CHECK_IN_TYPE,
        ],
        CheckInStep::Instructions => &[flow_keys::CHECK_IN_TYPE],
        CheckInStep::Confirmation => &[flow_keys::NAME, flow_keys::CHECK_IN_TYPE],
    }
}

/// Check a step's preconditions against the session.
///
/// Runs synchronously on the already-loaded session, before any derived
/// state is computed.
pub fn check(step: CheckInStep, session: &CheckInSession, fallback_route: &str) -> GuardOutcome {
    for key in required_keys(step) {
        if !session.has(key) {
            tracing::debug!(step = %step, missing = key, "Precondition missing, redirecting");
            return GuardOutcome::Redirect(fallback_route.to_string());
        }
    }

    // Wrong-role access is recovered by sending the visitor back to the
    // type step, not treated as fatal.
    if step == CheckInStep::Induction && session.check_in_type != Some(CheckInType::Contractor) {
        tracing::debug!("Non-contractor reached induction, redirecting to type step");
        return GuardOutcome::Redirect(CheckInStep::Type.route().to_string());
    }

    GuardOutcome::Proceed
}
