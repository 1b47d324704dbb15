// Presta Conta - Web Server
// JSON API over the content portal with Axum

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use presta_conta::contact::{submit, ContactForm, ContactOutcome, WebhookClient};
use presta_conta::generator::pretty;
use presta_conta::views::{load_list, HomeView};
use presta_conta::{
    init_logging, Collection, DirectorySource, DocumentFilter, JsonGenerator, LoadState,
    MemoryStore, MonthYear, NoticeDetail, Portal, PortalConfig, Record, Session, StatusFilter,
    Year,
};

/// Shared application state
#[derive(Clone)]
struct AppState {
    portal: Arc<Portal<DirectorySource>>,
    webhook: WebhookClient,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

fn bad_request(message: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::err(message))).into_response()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// ============================================================================
// Query parameters
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StatusQuery {
    status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DocumentsQuery {
    tipo: Option<String>,
    ano: Option<String>,
    q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CalendarQuery {
    day: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    collection: String,
    json: String,
}

/// "todos" / empty means no filter
fn optional_filter(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != "todos" && v != "all")
}

fn document_filter(query: DocumentsQuery) -> Result<DocumentFilter, String> {
    let ano = match optional_filter(query.ano) {
        Some(text) => Some(Year::parse(&text).map_err(|e| e.to_string())?),
        None => None,
    };
    Ok(DocumentFilter {
        tipo: optional_filter(query.tipo),
        ano,
        term: query.q.unwrap_or_default(),
    })
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/home - Dashboard snapshot, built once all four loads settle
async fn get_home(State(state): State<AppState>) -> impl IntoResponse {
    let (notices, documents, photos, activities) = tokio::join!(
        load_blocking(state.portal.clone(), Collection::Notices),
        load_blocking(state.portal.clone(), Collection::Documents),
        load_blocking(state.portal.clone(), Collection::Photos),
        load_blocking(state.portal.clone(), Collection::Activities),
    );

    Json(ApiResponse::ok(HomeView::assemble(
        notices, documents, photos, activities, today(),
    )))
}

/// Run a file-reading portal call off the async runtime.
async fn blocking<T, F>(portal: &Arc<Portal<DirectorySource>>, task: F) -> Result<T, Response>
where
    T: Send + 'static,
    F: FnOnce(&Portal<DirectorySource>) -> T + Send + 'static,
{
    let portal = Arc::clone(portal);
    tokio::task::spawn_blocking(move || task(&portal))
        .await
        .map_err(|e| {
            error!(error = %e, "portal task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::err("internal error")),
            )
                .into_response()
        })
}

async fn load_blocking<R>(portal: Arc<Portal<DirectorySource>>, collection: Collection) -> LoadState<Vec<R>>
where
    R: Record + Send + 'static,
{
    tokio::task::spawn_blocking(move || load_list(portal.source(), collection))
        .await
        .unwrap_or_else(|e| {
            error!(%collection, error = %e, "load task failed");
            LoadState::Failed(e.to_string())
        })
}

/// GET /api/notices?q= - Notices, newest first
async fn get_notices(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> Response {
    let term = query.q.unwrap_or_default();
    match blocking(&state.portal, move |portal| portal.notices(&term)).await {
        Ok(view) => Json(ApiResponse::ok(view)).into_response(),
        Err(response) => response,
    }
}

/// GET /api/notices/:id - One notice
async fn get_notice(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let detail = match blocking(&state.portal, move |portal| portal.notice(&id)).await {
        Ok(detail) => detail,
        Err(response) => return response,
    };
    match detail {
        NoticeDetail::Found(notice) => Json(ApiResponse::ok(notice)).into_response(),
        NoticeDetail::NotFound => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::err("Aviso não encontrado")),
        )
            .into_response(),
        NoticeDetail::Unavailable { reason } => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::<()>::err(reason)),
        )
            .into_response(),
    }
}

/// GET /api/activities?status= - Activities grouped by month
async fn get_activities(State(state): State<AppState>, Query(query): Query<StatusQuery>) -> Response {
    let filter: StatusFilter = match query.status.as_deref().unwrap_or("").parse() {
        Ok(filter) => filter,
        Err(e) => return bad_request(e),
    };
    match blocking(&state.portal, move |portal| portal.activities(filter)).await {
        Ok(view) => Json(ApiResponse::ok(view)).into_response(),
        Err(response) => response,
    }
}

/// GET /api/documents?tipo=&ano=&q= - Documents grouped by year
async fn get_documents(State(state): State<AppState>, Query(query): Query<DocumentsQuery>) -> Response {
    let filter = match document_filter(query) {
        Ok(filter) => filter,
        Err(e) => return bad_request(e),
    };
    match blocking(&state.portal, move |portal| portal.documents(&filter)).await {
        Ok(view) => Json(ApiResponse::ok(view)).into_response(),
        Err(response) => response,
    }
}

/// GET /api/gallery - Photo events by month
async fn get_gallery(State(state): State<AppState>) -> Response {
    match blocking(&state.portal, |portal| portal.gallery()).await {
        Ok(view) => Json(ApiResponse::ok(view)).into_response(),
        Err(response) => response,
    }
}

/// GET /api/calendar/:year/:month?day= - Month grid
async fn get_calendar(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
    Query(query): Query<CalendarQuery>,
) -> Response {
    let Some(month) = MonthYear::new(year, month) else {
        return bad_request("month must be between 1 and 12 in a supported year");
    };
    let selected = match query.day {
        Some(day) => match NaiveDate::from_ymd_opt(month.year, month.month, day) {
            Some(date) => Some(date),
            None => return bad_request("day is outside the month"),
        },
        None => None,
    };
    let today = today();
    match blocking(&state.portal, move |portal| portal.calendar(month, selected, today)).await {
        Ok(view) => Json(ApiResponse::ok(view)).into_response(),
        Err(response) => response,
    }
}

/// GET /api/board - Board roster
async fn get_board(State(state): State<AppState>) -> Response {
    let roster = match blocking(&state.portal, |portal| portal.board()).await {
        Ok(roster) => roster,
        Err(response) => return response,
    };
    match roster {
        LoadState::Ready(roster) => Json(ApiResponse::ok(roster)).into_response(),
        other => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::<()>::err(other.error().unwrap_or("board unavailable"))),
        )
            .into_response(),
    }
}

/// POST /api/login - Check credentials, answer with the session user
async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Response {
    let credentials = match blocking(&state.portal, |portal| portal.credentials()).await {
        Ok(credentials) => credentials,
        Err(response) => return response,
    };
    let mut session = Session::new(MemoryStore::new());

    match session.login(&credentials, &request.username, &request.password) {
        Ok(user) => Json(ApiResponse::ok(user.clone())).into_response(),
        Err(e) => {
            warn!(username = %request.username, error = %e, "login rejected");
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<()>::err("Usuário ou senha inválidos")),
            )
                .into_response()
        }
    }
}

/// POST /api/contact - Validate and forward to the webhook
async fn contact(State(state): State<AppState>, Json(form): Json<ContactForm>) -> Response {
    let outcome = submit(&state.webhook, form).await;
    let status = match &outcome {
        ContactOutcome::Sent { .. } => StatusCode::OK,
        ContactOutcome::Invalid { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ContactOutcome::Failed { .. } => StatusCode::BAD_GATEWAY,
    };
    (
        status,
        Json(ApiResponse {
            success: outcome.is_sent(),
            data: Some(outcome),
            error: None,
        }),
    )
        .into_response()
}

/// GET /api/generator/:collection - Current resource, pretty-printed
async fn get_generator_source(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    let collection = match name.parse::<Collection>() {
        Ok(collection) => collection,
        Err(e) => return bad_request(e.to_string()),
    };
    let generator = match JsonGenerator::new(collection) {
        Ok(generator) => generator,
        Err(e) => return bad_request(e.to_string()),
    };

    let current = blocking(&state.portal, move |portal| {
        generator.load_current(portal.source())
    });
    match current.await {
        Err(response) => response,
        Ok(Ok(text)) => Json(ApiResponse::ok(text)).into_response(),
        Ok(Err(e)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::<()>::err(e.to_string())),
        )
            .into_response(),
    }
}

/// POST /api/generator - Validate edited JSON, answer with the file to download
async fn generate(Json(request): Json<GenerateRequest>) -> Response {
    let collection = match request.collection.parse::<Collection>() {
        Ok(collection) if collection.is_publishable() => collection,
        Ok(collection) => return bad_request(format!("{} cannot be published", collection)),
        Err(e) => return bad_request(e.to_string()),
    };

    match pretty(&request.json) {
        Ok(text) => {
            info!(%collection, bytes = text.len(), "json generated");
            let disposition = format!(
                "attachment; filename*=UTF-8''{}",
                urlencoding::encode(&collection.file_name())
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "application/json".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                text,
            )
                .into_response()
        }
        Err(e) => bad_request(e.to_string()),
    }
}

/// Credentials are never served as a static file, however the path is spelled.
async fn hide_credentials(request: Request, next: Next) -> Response {
    if names_credentials(request.uri().path()) {
        warn!(path = %request.uri().path(), "static request for credentials refused");
        return StatusCode::NOT_FOUND.into_response();
    }
    next.run(request).await
}

/// Resolve the path the way the file service does (percent-decoding, then
/// dropping empty and `.` segments) and compare its last segment.
fn names_credentials(path: &str) -> bool {
    let Ok(decoded) = urlencoding::decode(path) else {
        return true;
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let private = Collection::Credentials.file_name();
    segments
        .last()
        .is_some_and(|name| name.trim().eq_ignore_ascii_case(&private))
}

// ============================================================================
// Main Server
// ============================================================================

fn router(state: AppState, config: &PortalConfig) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/home", get(get_home))
        .route("/notices", get(get_notices))
        .route("/notices/:id", get(get_notice))
        .route("/activities", get(get_activities))
        .route("/documents", get(get_documents))
        .route("/gallery", get(get_gallery))
        .route("/calendar/:year/:month", get(get_calendar))
        .route("/board", get(get_board))
        .route("/login", post(login))
        .route("/contact", post(contact))
        .route("/generator", post(generate))
        .route("/generator/:collection", get(get_generator_source))
        .with_state(state);

    let static_files = Router::new()
        .nest_service("/data", ServeDir::new(&config.data_dir))
        .layer(middleware::from_fn(hide_credentials));

    Router::new()
        .nest("/api", api_routes)
        .merge(static_files)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let config = PortalConfig::from_env();

    println!("🌐 Presta Conta - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if !config.data_dir.is_dir() {
        eprintln!("❌ Data directory not found at {:?}", config.data_dir);
        eprintln!("   Set PORTAL_DATA_DIR to the folder holding avisos.json, atividades.json, ...");
        std::process::exit(1);
    }
    println!("✓ Data directory: {:?}", config.data_dir);

    if config.contact_webhook.is_none() {
        println!("⚠️  PORTAL_CONTACT_WEBHOOK not set, contact form submissions will fail");
    }

    let state = AppState {
        portal: Arc::new(Portal::new(DirectorySource::new(&config.data_dir))),
        webhook: WebhookClient::new(config.contact_webhook.clone()),
    };

    let app = router(state, &config);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    println!("\n🚀 Server running on http://{}", config.bind_addr);
    println!("   API:  http://{}/api/home", config.bind_addr);
    println!("   Data: http://{}/data/avisos.json", config.bind_addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app).await?;
    Ok(())
}
