pub mod catalog;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod ical;
pub mod models;
pub mod openapi;
pub mod render;
pub mod settings;
pub mod validation;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, routing::get};
use handlers::{
    get_ical, get_pricing, get_programs, get_schedule, get_trainers, healthz_live, healthz_ready,
    root, schedule_page,
};
use http::Method;
use tower_http::LatencyUnit;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::catalog::Catalog;
use crate::ical::ICalExporter;
use crate::openapi::ApiDoc;
use crate::render::{AutoAnimate, TransitionHook};
use crate::settings::Settings;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub catalog: Arc<Catalog>,
    pub exporter: Arc<ICalExporter>,
    pub transitions: Arc<dyn TransitionHook + Send + Sync>,
    pub timezone: chrono_tz::Tz,
}

impl AppState {
    /// Loads and validates the catalog named by `settings`. Any invalid record
    /// is returned as an error.
    pub fn from_settings(settings: Settings) -> Result<Self, Box<dyn std::error::Error>> {
        let base = settings.normalized_base();
        let catalog = match &settings.catalog_path {
            Some(path) => Catalog::from_path(path, &base)?,
            None => Catalog::builtin(&base)?,
        };
        let timezone = settings.tz()?;
        let location = settings.site_url.host_str().unwrap_or("Forge").to_string();

        Ok(Self {
            catalog: Arc::new(catalog),
            exporter: Arc::new(ICalExporter::new("Forge Class Schedule", location)),
            transitions: Arc::new(AutoAnimate::new(settings.auto_animate_src.clone())),
            timezone,
            settings,
        })
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    let env_filter = if settings.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .without_time()
        .init();

    let state = AppState::from_settings(settings)?;
    let app = build_router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], state.settings.port));
    info!("Starting Forge Schedule on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    let api = Router::new()
        .route("/schedule", get(get_schedule))
        .route("/trainers", get(get_trainers))
        .route("/programs", get(get_programs))
        .route("/pricing", get(get_pricing))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET]),
        );

    let mut router = Router::new()
        .route("/", get(root))
        .route("/healthz/live", get(healthz_live))
        .route("/healthz/ready", get(healthz_ready))
        .route("/schedule", get(schedule_page))
        .route("/schedule.ical", get(get_ical))
        .nest("/api", api)
        .with_state(state.clone());

    if state.settings.enable_swagger {
        let openapi = ApiDoc::openapi();
        let swagger = SwaggerUi::new("/docs").url("/openapi.json", openapi);
        router = router.merge(swagger);
    }

    router.layer(trace_layer)
}
