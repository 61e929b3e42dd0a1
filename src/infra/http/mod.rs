mod error;
mod middleware;
mod posts;
mod system;

pub use error::ApiError;
pub use middleware::{REQUEST_ID_HEADER, RequestContext};

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::cors::CorsLayer;

use crate::application::{
    error::ErrorReport, identity::IdentityService, posts::PostService, repos::RepoError,
};

use self::middleware::{log_responses, set_request_context};

#[derive(Clone)]
pub struct HttpState {
    pub posts: Arc<PostService>,
    pub identity: Arc<IdentityService>,
    pub modded_message: Arc<str>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/posts", get(posts::list_posts))
        .route("/posts/{id}", get(posts::get_post))
        .route("/system", get(system::get_system))
        .route("/system/list", get(system::list_members))
        .route("/system/member/{id}", get(system::get_member))
        .route("/modded/message", get(modded_message))
        .route("/_health/db", get(db_health))
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
        .layer(CorsLayer::permissive())
}

async fn modded_message(State(state): State<HttpState>) -> String {
    state.modded_message.to_string()
}

async fn db_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.posts.health_check().await)
}

fn db_health_response(result: Result<(), RepoError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}
