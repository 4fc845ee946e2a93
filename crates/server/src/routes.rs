use std::{path::Path, sync::Arc};

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::{metrics, types::Health};
use service::file::image_store::UPLOAD_ROUTE;
use service::posts::PostRepository;

pub mod posts;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
}

impl AppState {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics_handler() -> (StatusCode, String) {
    metrics::encode_metrics()
}

/// Build the full application router: post API, uploaded images, health and metrics.
/// `max_body_bytes` caps JSON bodies on the post API, which carry inline images.
pub fn build_router(state: AppState, upload_dir: &Path, max_body_bytes: usize, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/api/posts", get(posts::list_posts).post(posts::create_post))
        .route("/api/posts/:id", put(posts::update_post).delete(posts::delete_post))
        .route("/api/posts/:id/like", post(posts::toggle_like))
        .route("/api/posts/:id/comments", post(posts::add_comment))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state);

    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler));

    public
        .merge(api)
        .nest_service(UPLOAD_ROUTE, ServeDir::new(upload_dir))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
