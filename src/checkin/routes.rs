//! REST endpoints driving the check-in wizard.
//!
//! Each GET renders a step (or answers with a 303 redirect when the flow
//! guard rejects it); each POST applies a step action and returns the next
//! route. The client carries its session id in the `x-checkin-session`
//! header — the server-side analog of the browser tab's session storage.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::{ApiError, Error};

use super::manager::{CheckInDetails, CheckInManager, StepView, SubmitOutcome, Transition};
use super::model::CheckInType;
use super::state::CheckInStep;

/// Header carrying the check-in session id.
pub const SESSION_HEADER: &str = "x-checkin-session";

/// Shared state for check-in routes.
#[derive(Clone)]
pub struct CheckInRouteState {
    pub manager: Arc<CheckInManager>,
}

fn session_id(state: &CheckInRouteState, headers: &HeaderMap) -> Result<String, Response> {
    match headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok()) {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        // No session at all is the same as a session missing every key.
        _ => Err(Redirect::to(state.manager.home_route()).into_response()),
    }
}

fn error_response(err: Error) -> Response {
    match err {
        Error::Api(ApiError::TokenRejected(_)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({"error": "Invalid or expired QR code"})),
        )
            .into_response(),
        Error::Api(e) => {
            tracing::warn!(error = %e, "Backend call failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({"error": "Failed to check in. Please try again."})),
            )
                .into_response()
        }
        e => {
            tracing::error!(error = %e, "Internal error in check-in flow");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn transition_response(transition: Transition) -> Response {
    match transition {
        Transition::Redirect(route) => Redirect::to(&route).into_response(),
        Transition::Next(route) => Json(serde_json::json!({"next": route})).into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct ScanRequest {
    token: String,
}

/// POST /api/check-in/scan
///
/// QR entry point: verifies the token and starts a session.
async fn post_scan(
    State(state): State<CheckInRouteState>,
    Json(body): Json<ScanRequest>,
) -> Response {
    match state.manager.begin(&body.token).await {
        Ok(started) => Json(serde_json::json!({
            "session_id": started.session_id,
            "jobsite": started.jobsite,
            "next": started.next,
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/check-in/type
async fn get_type(State(state): State<CheckInRouteState>, headers: HeaderMap) -> Response {
    let sid = match session_id(&state, &headers) {
        Ok(sid) => sid,
        Err(redirect) => return redirect,
    };
    match state.manager.enter_step(&sid, CheckInStep::Type).await {
        Ok(StepView::Redirect(route)) => Redirect::to(&route).into_response(),
        Ok(StepView::Render(())) => Json(serde_json::json!({
            "step": "type",
            "title": "Are you a visitor or contractor?",
            "options": ["visitor", "contractor"],
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
struct TypeRequest {
    check_in_type: CheckInType,
}

/// POST /api/check-in/type
async fn post_type(
    State(state): State<CheckInRouteState>,
    headers: HeaderMap,
    Json(body): Json<TypeRequest>,
) -> Response {
    let sid = match session_id(&state, &headers) {
        Ok(sid) => sid,
        Err(redirect) => return redirect,
    };
    match state.manager.select_type(&sid, body.check_in_type).await {
        Ok(transition) => transition_response(transition),
        Err(e) => error_response(e),
    }
}

/// GET /api/check-in/induction
async fn get_induction(State(state): State<CheckInRouteState>, headers: HeaderMap) -> Response {
    let sid = match session_id(&state, &headers) {
        Ok(sid) => sid,
        Err(redirect) => return redirect,
    };
    match state.manager.enter_step(&sid, CheckInStep::Induction).await {
        Ok(StepView::Redirect(route)) => Redirect::to(&route).into_response(),
        Ok(StepView::Render(())) => Json(serde_json::json!({
            "step": "induction",
            "title": "Have you been inducted into this site?",
            "note": "Site induction is required before starting work",
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
struct InductionRequest {
    inducted: bool,
}

/// POST /api/check-in/induction
async fn post_induction(
    State(state): State<CheckInRouteState>,
    headers: HeaderMap,
    Json(body): Json<InductionRequest>,
) -> Response {
    let sid = match session_id(&state, &headers) {
        Ok(sid) => sid,
        Err(redirect) => return redirect,
    };
    match state.manager.record_induction(&sid, body.inducted).await {
        Ok(transition) => transition_response(transition),
        Err(e) => error_response(e),
    }
}

/// GET /api/check-in/form
async fn get_form(State(state): State<CheckInRouteState>, headers: HeaderMap) -> Response {
    let sid = match session_id(&state, &headers) {
        Ok(sid) => sid,
        Err(redirect) => return redirect,
    };
    match state.manager.enter_step(&sid, CheckInStep::Form).await {
        Ok(StepView::Redirect(route)) => Redirect::to(&route).into_response(),
        Ok(StepView::Render(())) => Json(serde_json::json!({
            "step": "form",
            "title": "Please enter your details",
            "fields": ["name", "contact", "company"],
            "company_required_for": "contractor",
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
struct FormRequest {
    name: String,
    contact: String,
    #[serde(default)]
    company: Option<String>,
}

/// POST /api/check-in/form
///
/// Submits the check-in to the backend and stores the resulting record.
async fn post_form(
    State(state): State<CheckInRouteState>,
    headers: HeaderMap,
    Json(body): Json<FormRequest>,
) -> Response {
    let sid = match session_id(&state, &headers) {
        Ok(sid) => sid,
        Err(redirect) => return redirect,
    };
    let details = CheckInDetails {
        name: body.name,
        contact: body.contact,
        company: body.company,
    };
    match state.manager.submit_details(&sid, details).await {
        Ok(SubmitOutcome::Redirect(route)) => Redirect::to(&route).into_response(),
        Ok(SubmitOutcome::Invalid(message)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({"error": message})),
        )
            .into_response(),
        Ok(SubmitOutcome::Next(route)) => {
            Json(serde_json::json!({"next": route})).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET /api/check-in/instructions
async fn get_instructions(
    State(state): State<CheckInRouteState>,
    headers: HeaderMap,
) -> Response {
    let sid = match session_id(&state, &headers) {
        Ok(sid) => sid,
        Err(redirect) => return redirect,
    };
    match state.manager.instructions(&sid).await {
        Ok(StepView::Redirect(route)) => Redirect::to(&route).into_response(),
        Ok(StepView::Render(page)) => Json(page).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/check-in/confirmation
async fn get_confirmation(
    State(state): State<CheckInRouteState>,
    headers: HeaderMap,
) -> Response {
    let sid = match session_id(&state, &headers) {
        Ok(sid) => sid,
        Err(redirect) => return redirect,
    };
    match state.manager.confirmation(&sid).await {
        Ok(StepView::Redirect(route)) => Redirect::to(&route).into_response(),
        Ok(StepView::Render(summary)) => Json(summary).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/check-in/done
///
/// Confirmation dismissal: clears the whole session in one batch.
async fn post_done(State(state): State<CheckInRouteState>, headers: HeaderMap) -> Response {
    let sid = match session_id(&state, &headers) {
        Ok(sid) => sid,
        Err(redirect) => return redirect,
    };
    match state.manager.complete(&sid).await {
        Ok(home) => Json(serde_json::json!({"next": home})).into_response(),
        Err(e) => error_response(e),
    }
}

/// Build the check-in REST routes.
pub fn checkin_routes(state: CheckInRouteState) -> Router {
    Router::new()
        .route("/api/check-in/scan", post(post_scan))
        .route("/api/check-in/type", get(get_type).post(post_type))
        .route(
            "/api/check-in/induction",
            get(get_induction).post(post_induction),
        )
        .route("/api/check-in/form", get(get_form).post(post_form))
        .route("/api/check-in/instructions", get(get_instructions))
        .route("/api/check-in/confirmation", get(get_confirmation))
        .route("/api/check-in/done", post(post_done))
        .with_state(state)
}
