use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::{AppState, SkillError};
use crate::models::{ConversationalResponse, SkillRequest};
use crate::services::DayWindow;

impl IntoResponse for ConversationalResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// POST /v1/ask
/// Offers every category as a quick reply. The body is ignored.
pub async fn ask_category(State(state): State<Arc<AppState>>) -> ConversationalResponse {
    state.shared.listings.prompt()
}

fn parse(payload: Result<Json<SkillRequest>, JsonRejection>) -> Result<SkillRequest, SkillError> {
    payload
        .map(|Json(request)| request)
        .map_err(|e| SkillError::MalformedBody(e.body_text()))
}

/// POST /v1/ask/category
/// Requires `action.params.cate`. Answers with a list card or a fallback text.
pub async fn show_category(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SkillRequest>, JsonRejection>,
) -> Result<ConversationalResponse, SkillError> {
    let request = parse(payload)?;
    let label = request.category_label()?;

    tracing::debug!(
        action = request.action.name.as_deref().unwrap_or("-"),
        label = %label,
        "Category listing requested"
    );

    Ok(state.shared.listings.listing(label).await)
}

/// POST /v1/search
/// Requires `action.params.keyword`. Searches notice titles on the board.
pub async fn search_notices(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SkillRequest>, JsonRejection>,
) -> Result<ConversationalResponse, SkillError> {
    let request = parse(payload)?;
    let keyword = request.search_keyword()?;

    tracing::debug!(keyword = %keyword, "Notice search requested");

    Ok(state.shared.listings.search(keyword).await)
}

/// POST /v1/last
pub async fn last_notice(State(state): State<Arc<AppState>>) -> ConversationalResponse {
    state.shared.listings.latest().await
}

async fn day_listing(state: &AppState, window: DayWindow) -> ConversationalResponse {
    let listings = &state.shared.listings;
    listings.day_listing(window, listings.today()).await
}

/// POST /v1/today
pub async fn today_notices(State(state): State<Arc<AppState>>) -> ConversationalResponse {
    day_listing(&state, DayWindow::Today).await
}

/// POST /v1/today2
/// Today's notices that did not fit on the first card.
pub async fn today_more_notices(State(state): State<Arc<AppState>>) -> ConversationalResponse {
    day_listing(&state, DayWindow::TodayMore).await
}

/// POST /v1/yesterday
pub async fn yesterday_notices(State(state): State<Arc<AppState>>) -> ConversationalResponse {
    day_listing(&state, DayWindow::Yesterday).await
}
