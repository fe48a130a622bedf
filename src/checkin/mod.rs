//! Check-in flow — the visitor/contractor jobsite check-in wizard.
//!
//! The flow is a linear sequence of guarded steps. Each step loads the
//! typed session from storage, checks its preconditions through the flow
//! guard, applies one transition, and saves the session back. Completion
//! clears every flow key in one batch.

pub mod guard;
pub mod manager;
pub mod model;
pub mod routes;
pub mod state;

pub use guard::GuardOutcome;
pub use manager::{
    CheckInDetails, CheckInManager, InstructionsPage, StartedCheckIn, StepView, SubmitOutcome,
    Transition,
};
pub use model::{
    CheckInSession, CheckInSummary, CheckInType, InstructionsView, StatusTone, flow_keys,
    instructions_view,
};
pub use routes::{CheckInRouteState, SESSION_HEADER, checkin_routes};
pub use state::CheckInStep;
