use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::AppState;
use crate::models::NoticeRecord;

/// GET /v1/notices/{num}
/// Newest `num` notices across every category as raw records, capped at the scan limit.
pub async fn get_notices(
    State(state): State<Arc<AppState>>,
    Path(num): Path<usize>,
) -> Json<Vec<NoticeRecord>> {
    Json(state.shared.listings.recent(num).await)
}
