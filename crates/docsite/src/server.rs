use crate::prelude::{eprintln, *};
use crate::render;
use crate::store::Store;
use crate::views;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use docsite_core::directory::parse_unit_path;
use docsite_core::limits::DisplayLimits;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Debug, clap::Args)]
pub struct ServeOptions {
    /// Port to listen on
    #[arg(short, long, env = "DOCSITE_PORT", default_value = "8080")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, env = "DOCSITE_HOST", default_value = "127.0.0.1")]
    pub host: String,
}

pub struct AppState {
    pub store: Store,
    pub limits: DisplayLimits,
}

#[derive(Debug, Default, Deserialize)]
pub struct UnitQuery {
    pub tab: Option<String>,
    pub page: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Error rendered as an HTML page with the matching status code
#[derive(Debug)]
pub struct AppError(Error);

impl<E: Into<Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        AppError(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Error::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            log::error!("{}", self.0);
        } else {
            log::debug!("{}", self.0);
        }

        let message = match status {
            StatusCode::INTERNAL_SERVER_ERROR => "Internal server error".to_string(),
            _ => self.0.to_string(),
        };

        (status, Html(render::error_page(status.as_u16(), &message))).into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(home_handler))
        .route("/search", get(search_handler))
        .route("/{*path}", get(unit_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn run(options: ServeOptions, global: crate::Global) -> Result<()> {
    let limits = crate::config::load_limits(global.config.as_deref())?;
    let store = Store::open(&global.db)
        .map_err(|e| eyre!("Failed to open database '{}': {}", global.db.display(), e))?;

    let addr = format!("{}:{}", options.host, options.port);

    if global.verbose {
        eprintln!("Serving {} on http://{}", global.db.display(), addr);
        eprintln!("Display limits: {:?}", limits);
    }

    let app_router = router(Arc::new(AppState { store, limits }));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    log::info!("listening on http://{addr}");

    axum::serve(listener, app_router)
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}

fn bad_query(rejection: QueryRejection) -> Error {
    Error::InvalidArgument(rejection.body_text())
}

async fn home_handler() -> Html<String> {
    Html(render::home_page())
}

async fn search_handler(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<SearchQuery>, QueryRejection>,
) -> std::result::Result<Html<String>, AppError> {
    let Query(query) = query.map_err(bad_query)?;
    Ok(Html(search_page(&state, query).await?))
}

async fn unit_handler(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    query: std::result::Result<Query<UnitQuery>, QueryRejection>,
) -> std::result::Result<Html<String>, AppError> {
    let Query(query) = query.map_err(bad_query)?;
    Ok(Html(unit_page(&state, &path, query).await?))
}

pub async fn search_page(state: &AppState, query: SearchQuery) -> StoreResult<String> {
    let q = query.q.unwrap_or_default().trim().to_string();
    if q.is_empty() {
        return Ok(render::home_page());
    }

    log::info!("search {q:?} page={:?}", query.page);

    let limits = state.limits;
    let view = state
        .store
        .run(move |store| views::search_view(store, &limits, &q, query.page, query.limit))
        .await?;

    Ok(render::search_page(&view))
}

pub async fn unit_page(state: &AppState, raw_path: &str, query: UnitQuery) -> StoreResult<String> {
    let (path, version) = parse_unit_path(raw_path)?;
    let limits = state.limits;

    log::info!("unit {path} version={version:?} tab={:?}", query.tab);

    match query.tab.as_deref() {
        Some("importedby") => {
            let view = state
                .store
                .run(move |store| {
                    views::imported_by_view(store, &limits, &path, version.as_deref(), query.page)
                })
                .await?;
            Ok(render::imported_by_page(&view))
        }
        None | Some("") | Some("main") => {
            let view = state
                .store
                .run(move |store| views::unit_view(store, &limits, &path, version.as_deref()))
                .await?;
            Ok(render::unit_page(&view))
        }
        Some(tab) => Err(Error::InvalidArgument(format!("unknown tab: {tab}"))),
    }
}
