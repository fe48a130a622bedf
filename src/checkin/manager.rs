//! CheckInManager — coordinates session storage, the flow guard, and step
//! transitions.
//!
//! Every operation follows the same shape: load the session from the store,
//! run the guard for the step, apply the transition, save the session back.
//! Storage is only a serialization boundary; the flow's working memory is
//! the typed `CheckInSession`.

use std::sync::Arc;

use uuid::Uuid;

use crate::client::{CheckInClient, CheckInRequest, JobsiteInfo};
use crate::config::CheckInConfig;
use crate::error::Result;
use crate::store::SessionStore;

use super::guard::{self, GuardOutcome};
use super::model::{
    CheckInSession, CheckInSummary, CheckInType, InstructionsView, instructions_view,
};
use super::state::CheckInStep;

/// Result of a step action: either a precondition failed and the client
/// should redirect, or the action applied and the client should navigate
/// to the next step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Redirect(String),
    Next(&'static str),
}

/// Result of entering a step that renders something.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepView<T> {
    Redirect(String),
    Render(T),
}

/// A started check-in session, returned by the QR entry point.
#[derive(Debug, Clone)]
pub struct StartedCheckIn {
    pub session_id: String,
    pub jobsite: JobsiteInfo,
    pub next: &'static str,
}

/// Details captured by the form step.
#[derive(Debug, Clone)]
pub struct CheckInDetails {
    pub name: String,
    pub contact: String,
    pub company: Option<String>,
}

/// Result of submitting the details form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Redirect(String),
    /// The submission was rejected before reaching the backend.
    Invalid(&'static str),
    Next(&'static str),
}

/// Instructions page content: the derived status view plus the supervisor
/// contact block.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct InstructionsPage {
    #[serde(flatten)]
    pub view: InstructionsView,
    pub supervisor_name: String,
    pub supervisor_contact: String,
}

/// Coordinates the check-in flow.
pub struct CheckInManager {
    store: Arc<dyn SessionStore>,
    client: Arc<dyn CheckInClient>,
    config: CheckInConfig,
}

impl CheckInManager {
    pub fn new(
        store: Arc<dyn SessionStore>,
        client: Arc<dyn CheckInClient>,
        config: CheckInConfig,
    ) -> Self {
        Self {
            store,
            client,
            config,
        }
    }

    /// Fallback route used when a precondition is missing.
    pub fn home_route(&self) -> &str {
        &self.config.home_route
    }

    async fn load(&self, session_id: &str) -> Result<CheckInSession> {
        let values = self.store.load(session_id).await?;
        Ok(CheckInSession::from_map(&values))
    }

    async fn save(&self, session_id: &str, session: &CheckInSession) -> Result<()> {
        self.store.replace(session_id, session.to_map()).await?;
        Ok(())
    }

    fn guard(&self, step: CheckInStep, session: &CheckInSession) -> GuardOutcome {
        guard::check(step, session, &self.config.home_route)
    }

    /// QR entry point: verify the token, seed a fresh session with the
    /// jobsite details, and hand off to the type step.
    pub async fn begin(&self, token: &str) -> Result<StartedCheckIn> {
        let jobsite = self.client.verify_qr_token(token).await?;

        let session_id = Uuid::new_v4().to_string();
        let session = CheckInSession {
            qr_token: Some(token.to_string()),
            jobsite_id: Some(jobsite.id),
            jobsite_name: Some(jobsite.name.clone()),
            jobsite_address: jobsite.address.clone(),
            ..Default::default()
        };
        self.save(&session_id, &session).await?;

        tracing::info!(jobsite_id = jobsite.id, "Check-in session started");
        Ok(StartedCheckIn {
            session_id,
            jobsite,
            next: CheckInStep::Type.route(),
        })
    }

    /// Guard check for steps whose rendered content is static (type,
    /// induction, form).
    pub async fn enter_step(&self, session_id: &str, step: CheckInStep) -> Result<StepView<()>> {
        let session = self.load(session_id).await?;
        match self.guard(step, &session) {
            GuardOutcome::Redirect(route) => Ok(StepView::Redirect(route)),
            GuardOutcome::Proceed => Ok(StepView::Render(())),
        }
    }

    /// Type selection: contractors go on to induction, visitors skip it and
    /// go straight to the form.
    pub async fn select_type(
        &self,
        session_id: &str,
        choice: CheckInType,
    ) -> Result<Transition> {
        let mut session = self.load(session_id).await?;
        if let GuardOutcome::Redirect(route) = self.guard(CheckInStep::Type, &session) {
            return Ok(Transition::Redirect(route));
        }

        session.check_in_type = Some(choice);
        self.save(session_id, &session).await?;

        let next = match choice {
            CheckInType::Contractor => CheckInStep::Induction.route(),
            CheckInType::Visitor => CheckInStep::Form.route(),
        };
        Ok(Transition::Next(next))
    }

    /// Induction answer: records the status and moves on to the form.
    pub async fn record_induction(&self, session_id: &str, inducted: bool) -> Result<Transition> {
        let mut session = self.load(session_id).await?;
        if let GuardOutcome::Redirect(route) = self.guard(CheckInStep::Induction, &session) {
            return Ok(Transition::Redirect(route));
        }

        session.inducted = Some(inducted);
        self.save(session_id, &session).await?;
        Ok(Transition::Next(CheckInStep::Form.route()))
    }

    /// Form submission: records the person details, performs the backend
    /// check-in, and stores the resulting diary record for the confirmation
    /// page.
    ///
    /// Backend failures propagate as errors so the form can be retried; the
    /// session is left untouched in that case.
    pub async fn submit_details(
        &self,
        session_id: &str,
        details: CheckInDetails,
    ) -> Result<SubmitOutcome> {
        let mut session = self.load(session_id).await?;
        if let GuardOutcome::Redirect(route) = self.guard(CheckInStep::Form, &session) {
            return Ok(SubmitOutcome::Redirect(route));
        }

        // The guard established these; destructure rather than unwrap.
        let (Some(jobsite_id), Some(token), Some(check_in_type)) = (
            session.jobsite_id,
            session.qr_token.clone(),
            session.check_in_type,
        ) else {
            return Ok(SubmitOutcome::Redirect(self.config.home_route.clone()));
        };

        if details.name.trim().is_empty() || details.contact.trim().is_empty() {
            return Ok(SubmitOutcome::Invalid("Name and contact are required"));
        }

        let company = details.company.filter(|c| !c.trim().is_empty());
        if check_in_type == CheckInType::Contractor && company.is_none() {
            return Ok(SubmitOutcome::Invalid(
                "Company name is required for contractors",
            ));
        }

        let request = CheckInRequest {
            jobsite_id,
            token,
            name: details.name.clone(),
            contact: details.contact.clone(),
            check_in_type,
            company: match check_in_type {
                CheckInType::Contractor => company.clone(),
                CheckInType::Visitor => None,
            },
            inducted: match check_in_type {
                CheckInType::Contractor => session.inducted,
                CheckInType::Visitor => None,
            },
        };
        let record = match self.client.check_in(&request).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "Backend check-in failed");
                return Err(e.into());
            }
        };

        session.name = Some(details.name);
        session.contact = Some(details.contact);
        if check_in_type == CheckInType::Contractor {
            session.company = company;
        }
        session.success = Some(record.success);
        session.message = Some(record.message);
        session.recorded_jobsite_name = Some(record.jobsite_name);
        session.check_in_time = Some(record.check_in_time);
        session.diary_entry_id = Some(record.diary_entry_id);
        self.save(session_id, &session).await?;

        tracing::info!(
            jobsite_id,
            diary_entry_id = record.diary_entry_id,
            "Check-in recorded"
        );
        Ok(SubmitOutcome::Next(CheckInStep::Instructions.route()))
    }

    /// Instructions page: derived display state plus supervisor contact.
    pub async fn instructions(&self, session_id: &str) -> Result<StepView<InstructionsPage>> {
        let session = self.load(session_id).await?;
        if let GuardOutcome::Redirect(route) = self.guard(CheckInStep::Instructions, &session) {
            return Ok(StepView::Redirect(route));
        }

        // Guard guarantees the type is present.
        let Some(check_in_type) = session.check_in_type else {
            return Ok(StepView::Redirect(self.config.home_route.clone()));
        };
        Ok(StepView::Render(InstructionsPage {
            view: instructions_view(check_in_type, session.inducted),
            supervisor_name: self.config.supervisor_name.clone(),
            supervisor_contact: self.config.supervisor_contact.clone(),
        }))
    }

    /// Confirmation page: the rendered summary of the whole session.
    pub async fn confirmation(&self, session_id: &str) -> Result<StepView<CheckInSummary>> {
        let session = self.load(session_id).await?;
        if let GuardOutcome::Redirect(route) = self.guard(CheckInStep::Confirmation, &session) {
            return Ok(StepView::Redirect(route));
        }

        match session.summary() {
            Some(summary) => Ok(StepView::Render(summary)),
            None => Ok(StepView::Redirect(self.config.home_route.clone())),
        }
    }

    /// Dismissal of the confirmation page: clear every flow key in one
    /// batch and send the user home.
    pub async fn complete(&self, session_id: &str) -> Result<String> {
        self.store.clear(session_id).await?;
        tracing::info!("Check-in session completed and cleared");
        Ok(self.config.home_route.clone())
    }
}
