use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/reservation-stats", get(reservation_stats))
}

/// GET /reservation-stats (administrator)
///
/// One row per ticket with its agent, client and agency; the route-level
/// middleware already guarantees the caller is an administrator.
async fn reservation_stats(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let stats = state.tickets.reservation_stats().await?;
    Ok(Json(json!({ "stats": stats })))
}
