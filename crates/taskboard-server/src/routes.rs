use axum::{
    routing::{get, patch},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::handlers::comments as comment_handlers;
use crate::service::CommentService;

#[derive(Clone)]
pub struct AppState {
    pub comments: CommentService,
}

pub fn create_router(comments: CommentService) -> Router {
    let state = AppState { comments };

    let comment_routes = Router::new()
        .route(
            "/",
            get(comment_handlers::list_comments).post(comment_handlers::create_comment),
        )
        .route(
            "/:id",
            patch(comment_handlers::update_comment)
                .get(comment_handlers::get_comment)
                .delete(comment_handlers::delete_comment),
        );

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1/comments", comment_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
