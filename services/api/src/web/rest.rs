//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.
//!
//! Each handler loads the snapshot through the store, hands typed input to the
//! engine, and (for mutations) saves the result while holding the write lock.

use crate::error::ApiError;
use crate::web::protocol::{
    ChartQuery, ChartsResponse, DailyForm, DailyResponse, DashboardResponse, DateQuery,
    HistoryResponse, QuestInfo, UpsertResponse, WeightForm,
};
use crate::web::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Local;
use quest_tracker_core::domain::{Quest, DATE_FORMAT};
use quest_tracker_core::engine;
use quest_tracker_core::input::{parse_date, DailySubmission, DateRange, WeightUpdate};
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        dashboard_handler,
        get_daily_handler,
        upsert_daily_handler,
        update_weight_handler,
        history_handler,
        charts_handler,
        charts_form_handler,
        info_handler,
    ),
    components(
        schemas(
            DailyForm,
            WeightForm,
            ChartQuery,
            DashboardResponse,
            DailyResponse,
            UpsertResponse,
            HistoryResponse,
            ChartsResponse,
            QuestInfo,
        )
    ),
    tags(
        (name = "Quest Tracker API", description = "Daily fitness quests, body weight and level progression.")
    )
)]
pub struct ApiDoc;

/// Resolves the requested day, defaulting to today in local time.
fn selected_date(query: &DateQuery) -> Result<String, ApiError> {
    let date = match query.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => parse_date(raw)?,
        None => Local::now().date_naive(),
    };
    Ok(date.format(DATE_FORMAT).to_string())
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Current profile with its lifetime experience.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Current profile", body = DashboardResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn dashboard_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let snapshot = app_state.store.load().await?;
    Ok(Json(DashboardResponse {
        total_xp: engine::lifetime_xp(&snapshot.history),
        xp_to_next_level: engine::xp_to_next_level(&snapshot.profile),
        days_logged: snapshot.history.len(),
        profile: snapshot.profile,
    }))
}

/// The record for one day, or a blank template if the day has not been logged.
#[utoipa::path(
    get,
    path = "/daily",
    params(DateQuery),
    responses(
        (status = 200, description = "Record for the day", body = DailyResponse),
        (status = 400, description = "Malformed date")
    )
)]
pub async fn get_daily_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<DailyResponse>, ApiError> {
    let date = selected_date(&query)?;
    let snapshot = app_state.store.load().await?;
    let saved = snapshot.find(&date).is_some();
    let record = engine::record_for_date(&snapshot, &date);
    Ok(Json(DailyResponse {
        date,
        saved,
        record,
        profile: snapshot.profile,
    }))
}

/// Saves the quests (and optionally the weight) for one day and recomputes the level.
#[utoipa::path(
    post,
    path = "/daily",
    params(DateQuery),
    request_body = DailyForm,
    responses(
        (status = 200, description = "Day saved", body = UpsertResponse),
        (status = 400, description = "Malformed date, weight or quest name"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn upsert_daily_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
    Json(form): Json<DailyForm>,
) -> Result<Json<UpsertResponse>, ApiError> {
    let date = selected_date(&query)?;
    let submission = DailySubmission::parse(&date, form.weight.as_deref(), &form.daily_quests)?;

    let _guard = app_state.begin_write().await;
    let snapshot = app_state.store.load().await?;
    let outcome = engine::upsert_daily_record(&snapshot, &submission);
    app_state.store.save(&outcome.snapshot).await?;

    let total_xp = engine::lifetime_xp(&outcome.snapshot.history);
    info!(
        date = %outcome.record.date,
        day_xp = outcome.record.xp,
        level = outcome.snapshot.profile.level,
        "Saved daily quests"
    );
    Ok(Json(UpsertResponse {
        record: outcome.record,
        profile: outcome.snapshot.profile,
        total_xp,
    }))
}

/// Replaces the profile's current body weight.
#[utoipa::path(
    post,
    path = "/weight",
    request_body = WeightForm,
    responses(
        (status = 200, description = "Weight updated", body = DashboardResponse),
        (status = 400, description = "Weight is not a positive number")
    )
)]
pub async fn update_weight_handler(
    State(app_state): State<Arc<AppState>>,
    Json(form): Json<WeightForm>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let update = WeightUpdate::parse(&form.weight)?;

    let _guard = app_state.begin_write().await;
    let mut snapshot = app_state.store.load().await?;
    snapshot.profile = engine::update_weight(&snapshot.profile, update);
    app_state.store.save(&snapshot).await?;

    info!(weight = update.weight, "Updated current weight");
    Ok(Json(DashboardResponse {
        total_xp: engine::lifetime_xp(&snapshot.history),
        xp_to_next_level: engine::xp_to_next_level(&snapshot.profile),
        days_logged: snapshot.history.len(),
        profile: snapshot.profile,
    }))
}

/// Every logged day in the order it was first saved.
#[utoipa::path(
    get,
    path = "/history",
    responses((status = 200, description = "All records", body = HistoryResponse))
)]
pub async fn history_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let snapshot = app_state.store.load().await?;
    Ok(Json(HistoryResponse {
        history: snapshot.history,
    }))
}

async fn charts(app_state: &AppState, query: ChartQuery) -> Result<Json<ChartsResponse>, ApiError> {
    let range = DateRange::parse(query.start_date.as_deref(), query.end_date.as_deref())?;
    let snapshot = app_state.store.load().await?;
    let series = engine::chart_series(&snapshot.history, &range);
    Ok(Json(ChartsResponse {
        start_date: range.start,
        end_date: range.end,
        series,
    }))
}

/// Daily series plus weekly and monthly averages, optionally limited to a date range.
#[utoipa::path(
    get,
    path = "/charts",
    params(ChartQuery),
    responses(
        (status = 200, description = "Chart data", body = ChartsResponse),
        (status = 400, description = "Malformed date bound")
    )
)]
pub async fn charts_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ChartsResponse>, ApiError> {
    charts(&app_state, query).await
}

/// Same as `GET /charts`, with the range sent as a JSON body.
#[utoipa::path(
    post,
    path = "/charts",
    request_body = ChartQuery,
    responses(
        (status = 200, description = "Chart data", body = ChartsResponse),
        (status = 400, description = "Malformed date bound")
    )
)]
pub async fn charts_form_handler(
    State(app_state): State<Arc<AppState>>,
    Json(query): Json<ChartQuery>,
) -> Result<Json<ChartsResponse>, ApiError> {
    charts(&app_state, query).await
}

/// What each quest asks for.
#[utoipa::path(
    get,
    path = "/info",
    responses((status = 200, description = "Quest descriptions", body = Vec<QuestInfo>))
)]
pub async fn info_handler() -> Json<Vec<QuestInfo>> {
    Json(
        Quest::ALL
            .into_iter()
            .map(|q| QuestInfo {
                quest: q.to_string(),
                description: q.description().to_string(),
            })
            .collect(),
    )
}

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
