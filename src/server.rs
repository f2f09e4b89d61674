use crate::config::AppConfig;
use crate::presenter::{render_page, AssetLocation, Presenter};
use crate::utils::error::{Result, SyncError};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use reqwest::Client;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct SiteState {
    config: Arc<AppConfig>,
    location: AssetLocation,
    client: Client,
}

impl SiteState {
    pub fn new(config: AppConfig) -> Self {
        let location = AssetLocation::resolve(&config.static_dir(), &config.site.publications_path);
        Self {
            config: Arc::new(config),
            location,
            client: Client::new(),
        }
    }
}

/// `/` renders the page per request; everything else comes from the static dir.
pub fn router(state: SiteState) -> Router {
    let static_dir = state.config.static_dir();
    Router::new()
        .route("/", get(index))
        .route("/index.html", get(index))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index(State(state): State<SiteState>) -> Response {
    // 每次 page view 載入一次，不重試
    let presenter = Presenter::load(&state.location, &state.client).await;
    tracing::debug!("Page view resolved to {}", presenter.state().name());

    match render_page(
        &state.config.site,
        &state.config.scholar_profile_url(),
        &presenter,
    ) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("❌ Failed to render page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.user_friendly_message()).into_response()
        }
    }
}

pub async fn serve(config: AppConfig) -> Result<()> {
    let bind = config.site.bind.clone();
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .map_err(|e| SyncError::ServerError {
            message: format!("cannot bind {}: {}", bind, e),
        })?;
    tracing::info!("🌐 Serving profile page on http://{}", bind);

    axum::serve(listener, router(SiteState::new(config)))
        .await
        .map_err(|e| SyncError::ServerError {
            message: e.to_string(),
        })
}
