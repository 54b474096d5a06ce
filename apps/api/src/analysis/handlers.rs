//! One-shot analysis endpoints. Each call goes straight to the model and
//! returns the decoded result with its display extras; nothing is stored.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::analysis::display::{
    insights_view, salary_chart, summarize_positioning, ChartPoint, InsightsView,
    PositioningSummary, SalaryView,
};
use crate::analysis::insights::{fetch_local_insights, InsightsResult};
use crate::analysis::interview::{generate_interview_questions, InterviewQuestion};
use crate::analysis::positioning::{analyze_positioning, PositioningResult};
use crate::analysis::query::{require_all, CandidateProfile, CareerQuery};
use crate::analysis::roadmap::{generate_roadmap, RoadmapReport};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapResponse {
    #[serde(flatten)]
    pub report: RoadmapReport,
    pub salary_view: SalaryView,
    pub salary_caption: &'static str,
    pub salary_chart: Vec<ChartPoint>,
}

#[derive(Deserialize)]
pub struct ChartParams {
    #[serde(default)]
    pub view: SalaryView,
}

#[derive(Deserialize)]
pub struct InsightsRequest {
    pub role: String,
    pub location: String,
}

#[derive(Serialize)]
pub struct InsightsResponse {
    #[serde(flatten)]
    pub insights: InsightsResult,
    pub view: InsightsView,
}

#[derive(Deserialize)]
pub struct PositioningRequest {
    pub query: CareerQuery,
    pub profile: CandidateProfile,
}

#[derive(Serialize)]
pub struct PositioningResponse {
    #[serde(flatten)]
    pub result: PositioningResult,
    pub summary: PositioningSummary,
}

#[derive(Deserialize)]
pub struct InterviewRequest {
    pub role: String,
}

/// POST /api/v1/analysis/roadmap?view=annual|monthly
pub async fn handle_roadmap(
    State(state): State<AppState>,
    Query(params): Query<ChartParams>,
    Json(query): Json<CareerQuery>,
) -> Result<Json<RoadmapResponse>, AppError> {
    query.validate()?;
    let report = generate_roadmap(state.llm.as_ref(), &query).await?;
    let salary_chart = salary_chart(&report.data, params.view);
    Ok(Json(RoadmapResponse {
        report,
        salary_view: params.view,
        salary_caption: params.view.caption(),
        salary_chart,
    }))
}

/// POST /api/v1/analysis/insights
pub async fn handle_insights(
    State(state): State<AppState>,
    Json(req): Json<InsightsRequest>,
) -> Result<Json<InsightsResponse>, AppError> {
    require_all(&[("role", &req.role), ("location", &req.location)])?;
    let insights = fetch_local_insights(state.llm.as_ref(), &req.role, &req.location).await?;
    let view = insights_view(&insights);
    Ok(Json(InsightsResponse { insights, view }))
}

/// POST /api/v1/analysis/positioning
pub async fn handle_positioning(
    State(state): State<AppState>,
    Json(req): Json<PositioningRequest>,
) -> Result<Json<PositioningResponse>, AppError> {
    req.query.validate()?;
    req.profile.validate()?;
    let result = analyze_positioning(state.llm.as_ref(), &req.query, &req.profile).await?;
    let summary = summarize_positioning(&result);
    Ok(Json(PositioningResponse { result, summary }))
}

/// POST /api/v1/analysis/interview-questions
pub async fn handle_interview_questions(
    State(state): State<AppState>,
    Json(req): Json<InterviewRequest>,
) -> Result<Json<Vec<InterviewQuestion>>, AppError> {
    require_all(&[("role", &req.role)])?;
    let questions = generate_interview_questions(state.llm.as_ref(), &req.role).await?;
    Ok(Json(questions))
}
