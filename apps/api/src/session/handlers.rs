use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::query::{CandidateProfile, CareerQuery};
use crate::errors::AppError;
use crate::session::state::{SlotStatus, Tab, ViewState};
use crate::session::SessionController;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub status: FlowStatus,
    pub state: ViewState,
}

/// Per-flow summary so pollers need not inspect every slot.
#[derive(Serialize)]
pub struct FlowStatus {
    pub roadmap: SlotStatus,
    pub insights: SlotStatus,
    pub positioning: SlotStatus,
    pub interview: SlotStatus,
}

impl SessionResponse {
    fn of(session: &SessionController) -> Self {
        let state = session.snapshot();
        Self {
            session_id: session.id(),
            created_at: session.created_at(),
            status: FlowStatus {
                roadmap: state.roadmap.status(),
                insights: state.insights.status(),
                positioning: state.positioning.status(),
                interview: state.interview.status(),
            },
            state,
        }
    }
}

#[derive(Deserialize)]
pub struct TabRequest {
    pub tab: Tab,
}

async fn find(state: &AppState, id: Uuid) -> Result<Arc<SessionController>, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionResponse>) {
    let session = state.sessions.create().await;
    (StatusCode::CREATED, Json(SessionResponse::of(&session)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = find(&state, id).await?;
    Ok(Json(SessionResponse::of(&session)))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {id} not found")))
    }
}

/// POST /api/v1/sessions/:id/generate
///
/// Starts the roadmap flow and returns immediately; poll the session for results.
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(query): Json<CareerQuery>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let session = find(&state, id).await?;
    session.submit(query)?;
    Ok((StatusCode::ACCEPTED, Json(SessionResponse::of(&session))))
}

/// POST /api/v1/sessions/:id/positioning
pub async fn handle_request_positioning(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(profile): Json<CandidateProfile>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let session = find(&state, id).await?;
    session.request_positioning(profile)?;
    Ok((StatusCode::ACCEPTED, Json(SessionResponse::of(&session))))
}

/// POST /api/v1/sessions/:id/interview
pub async fn handle_request_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let session = find(&state, id).await?;
    session.request_interview()?;
    Ok((StatusCode::ACCEPTED, Json(SessionResponse::of(&session))))
}

/// PUT /api/v1/sessions/:id/tab
pub async fn handle_set_tab(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<TabRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = find(&state, id).await?;
    session.set_tab(req.tab);
    Ok(Json(SessionResponse::of(&session)))
}

/// POST /api/v1/sessions/:id/reset
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = find(&state, id).await?;
    session.reset();
    Ok(Json(SessionResponse::of(&session)))
}

/// POST /api/v1/sessions/:id/positioning/reset
pub async fn handle_reset_positioning(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = find(&state, id).await?;
    session.reset_positioning();
    Ok(Json(SessionResponse::of(&session)))
}
