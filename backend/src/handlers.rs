use crate::error::Error;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use shared::api::{NewOptionRequest, Snapshot};
use shared::store::{HistoryEntry, HistorySink, NewHistoryEntry, OptionSource};
use shared::wheel::WheelOption;

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn get_snapshot(State(state): State<AppState>) -> Json<Snapshot> {
    Json(state.snapshot().await)
}

pub async fn list_foods(State(state): State<AppState>) -> Json<Vec<WheelOption>> {
    Json(state.lock().await.foods.list())
}

pub async fn add_food(
    State(state): State<AppState>,
    Json(request): Json<NewOptionRequest>,
) -> Result<(StatusCode, Json<WheelOption>), Error> {
    let mut collections = state.lock().await;
    let option = collections.foods.add(&request.label).map_err(|e| {
        tracing::warn!("Rejected food '{}': {}", request.label, e);
        e
    })?;
    state.persist(collections.to_stored()).await;
    Ok((StatusCode::CREATED, Json(option)))
}

pub async fn remove_food(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, Error> {
    let mut collections = state.lock().await;
    collections.foods.remove(&id)?;
    state.persist(collections.to_stored()).await;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_history(State(state): State<AppState>) -> Json<Vec<HistoryEntry>> {
    Json(state.lock().await.history.list())
}

pub async fn append_history(
    State(state): State<AppState>,
    Json(entry): Json<NewHistoryEntry>,
) -> Result<(StatusCode, Json<HistoryEntry>), Error> {
    let mut collections = state.lock().await;
    let entry = collections.history.append(entry)?;
    tracing::info!("Recorded '{}' for {}", entry.label, entry.date);
    state.persist(collections.to_stored()).await;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn clear_history(State(state): State<AppState>) -> Result<StatusCode, Error> {
    let mut collections = state.lock().await;
    collections.history.clear()?;
    state.persist(collections.to_stored()).await;
    Ok(StatusCode::NO_CONTENT)
}
