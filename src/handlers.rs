use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use http::header;

use crate::{
    AppState,
    error::ApiError,
    filter::{ScheduleFilter, Selections},
    ical::current_monday,
    models::{Day, Intensity, PricingTier, Program, ScheduledClass, SessionType, Trainer},
    render::{RESULTS_CONTAINER_ID, ResultsContainer, render_page, render_schedule},
    validation::parse_selection,
};

#[derive(Debug, Default, serde::Deserialize)]
pub struct ScheduleQuery {
    pub day: Option<String>,
    #[serde(rename = "type")]
    pub session_type: Option<String>,
    pub intensity: Option<String>,
}

#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct ScheduleResponse {
    pub filters: Selections,
    pub classes: Vec<ScheduledClass>,
}

impl ScheduleQuery {
    pub fn selections(&self) -> Result<Selections, ApiError> {
        Ok(Selections {
            day: parse_selection::<Day>(self.day.as_deref())?,
            session_type: parse_selection::<SessionType>(self.session_type.as_deref())?,
            intensity: parse_selection::<Intensity>(self.intensity.as_deref())?,
        })
    }
}

#[utoipa::path(get, path = "/", tag = "schedule")]
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Forge Schedule API",
        "endpoints": {
            "/schedule": "Class schedule page with day, type and intensity filters",
            "/schedule.ical": "Download the filtered schedule for this week as iCal",
            "/api/schedule": "Filtered class sessions as JSON",
            "/api/trainers": "Trainers as JSON",
            "/api/programs": "Programs as JSON",
            "/api/pricing": "Pricing tiers as JSON"
        }
    }))
}

#[utoipa::path(get, path = "/healthz/live", tag = "schedule")]
pub async fn healthz_live() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(get, path = "/healthz/ready", tag = "schedule")]
pub async fn healthz_ready() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(
    get,
    path = "/schedule",
    params(
        ("day" = Option<Day>, Query, description = "Day of week, or All"),
        ("type" = Option<SessionType>, Query, description = "Session type, or All"),
        ("intensity" = Option<Intensity>, Query, description = "Intensity, or All")
    ),
    responses(
        (status = 200, description = "Schedule page", content_type = "text/html"),
        (status = 400, description = "Unknown filter value")
    ),
    tag = "schedule"
)]
pub async fn schedule_page(
    State(state): State<AppState>,
    Query(query): Query<ScheduleQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let selections = query.selections()?;
    let catalog = &state.catalog;
    let filter = ScheduleFilter::with_selections(&catalog.classes, &catalog.trainers, selections);

    let mut container = ResultsContainer::new(RESULTS_CONTAINER_ID, state.transitions.as_ref());
    let body = render_schedule(&filter, &mut container, "schedule");
    Ok(Html(render_page("Class Schedule | Forge", &body)))
}

#[utoipa::path(
    get,
    path = "/api/schedule",
    params(
        ("day" = Option<Day>, Query, description = "Day of week, or All"),
        ("type" = Option<SessionType>, Query, description = "Session type, or All"),
        ("intensity" = Option<Intensity>, Query, description = "Intensity, or All")
    ),
    responses(
        (status = 200, description = "Current filters and matching sessions", body = ScheduleResponse),
        (status = 400, description = "Unknown filter value")
    ),
    tag = "schedule"
)]
pub async fn get_schedule(
    State(state): State<AppState>,
    Query(query): Query<ScheduleQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let selections = query.selections()?;
    let catalog = &state.catalog;
    let filter = ScheduleFilter::with_selections(&catalog.classes, &catalog.trainers, selections);
    Ok(Json(ScheduleResponse {
        filters: selections,
        classes: filter.entries().into_iter().map(ScheduledClass::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/trainers",
    responses((status = 200, description = "Trainers", body = [Trainer])),
    tag = "catalog"
)]
pub async fn get_trainers(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.catalog.trainers.clone())
}

#[utoipa::path(
    get,
    path = "/api/programs",
    responses((status = 200, description = "Programs", body = [Program])),
    tag = "catalog"
)]
pub async fn get_programs(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.catalog.programs.clone())
}

#[utoipa::path(
    get,
    path = "/api/pricing",
    responses((status = 200, description = "Pricing tiers", body = [PricingTier])),
    tag = "catalog"
)]
pub async fn get_pricing(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.catalog.pricing.clone())
}

#[utoipa::path(
    get,
    path = "/schedule.ical",
    params(
        ("day" = Option<Day>, Query, description = "Day of week, or All"),
        ("type" = Option<SessionType>, Query, description = "Session type, or All"),
        ("intensity" = Option<Intensity>, Query, description = "Intensity, or All")
    ),
    responses(
        (status = 200, description = "iCal file", content_type = "text/calendar"),
        (status = 400, description = "Unknown filter value"),
        (status = 404, description = "No classes found")
    ),
    tag = "schedule"
)]
pub async fn get_ical(
    State(state): State<AppState>,
    Query(query): Query<ScheduleQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let selections = query.selections()?;
    let catalog = &state.catalog;
    let filter = ScheduleFilter::with_selections(&catalog.classes, &catalog.trainers, selections);

    if filter.is_empty() {
        return Err(ApiError::NotFound("No classes found".into()));
    }

    let monday = current_monday(&state.timezone);
    let body = state.exporter.generate(&filter.entries(), monday);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/calendar"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=forge_schedule.ics",
            ),
        ],
        body,
    ))
}
