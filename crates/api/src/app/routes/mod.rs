use axum::Router;

pub mod games;
pub mod system;

/// Router for all game endpoints.
pub fn router() -> Router {
    Router::new().merge(games::router())
}
