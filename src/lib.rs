pub mod auth;
pub mod error;
pub mod export;
pub mod grid;
pub mod grouping;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod periods;
pub mod settings;
pub mod store;
pub mod validation;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use handlers::{
    get_attendance_csv, get_attendance_report, get_attendance_summary, get_class_grid,
    get_class_schedule, healthz_live, healthz_ready, root, submit_attendance,
};
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::export::CsvExporter;
use crate::handlers::{create_schedule, delete_schedule_group};
use crate::openapi::ApiDoc;
use crate::settings::Settings;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub store: Arc<Store>,
    pub exporter: Arc<CsvExporter>,
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    let env_filter = if settings.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .without_time()
        .init();

    let state = AppState {
        settings: settings.clone(),
        store: Arc::new(Store::new()),
        exporter: Arc::new(CsvExporter::new()),
    };

    let app = build_router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], state.settings.port));
    info!("Starting School Attendance API on {addr}");
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

    let mut router = Router::new()
        .route("/", get(root))
        .route("/healthz/live", get(healthz_live))
        .route("/healthz/ready", get(healthz_ready))
        .route(
            "/classes/{class}/schedule",
            get(get_class_schedule)
                .post(create_schedule)
                .delete(delete_schedule_group),
        )
        .route("/classes/{class}/grid", get(get_class_grid))
        .route("/classes/{class}/attendance", post(submit_attendance))
        .route("/attendance", get(get_attendance_report))
        .route("/attendance.csv", get(get_attendance_csv))
        .route("/attendance/summary", get(get_attendance_summary))
        .with_state(state.clone());

    if state.settings.enable_swagger {
        let openapi = ApiDoc::openapi();
        let swagger = SwaggerUi::new("/docs").url("/openapi.json", openapi);
        router = router.merge(swagger);
    }

    router.layer(trace_layer)
}
