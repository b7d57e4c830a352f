use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use tictactoe_core::StreamId;
use tictactoe_game::Player;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/api/games", get(list_games).post(create_game))
        .route("/api/games/:id", get(get_game).post(play))
        .route("/api/games/:id/events", get(get_events))
}

/// The body is optional; an empty one means "default board side".
pub async fn create_game(
    Extension(services): Extension<Arc<AppServices>>,
    body: Bytes,
) -> axum::response::Response {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        dto::CreateGameRequest::default()
    } else {
        match dto::parse_json::<dto::CreateGameRequest>(&body) {
            Ok(r) => r,
            Err(response) => return response,
        }
    };

    let id = match services.create_game(request.board_side) {
        Ok(id) => id,
        Err(e) => return errors::dispatch_error_to_response(e),
    };

    tracing::info!(game_id = %id, "game created");
    (StatusCode::CREATED, Json(serde_json::json!({ "id": id }))).into_response()
}

pub async fn list_games(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    Json(services.games()).into_response()
}

pub async fn get_game(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = StreamId::new(id);
    match services.game(&id) {
        Some(view) => Json(view).into_response(),
        None => errors::game_not_found(&id),
    }
}

pub async fn play(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Bytes,
) -> axum::response::Response {
    let body = match dto::parse_json::<dto::PlayRequest>(&body) {
        Ok(r) => r,
        Err(response) => return response,
    };
    if body.player.trim().is_empty() {
        return errors::json_error(StatusCode::BAD_REQUEST, "Player name is required");
    }

    let id = StreamId::new(id);
    match services.play(&id, Player::new(body.player), body.cell) {
        Ok(_) => StatusCode::ACCEPTED.into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn get_events(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.events(&StreamId::new(id)) {
        Ok(events) => Json(events).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}
