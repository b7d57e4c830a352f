use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use tictactoe_core::{DomainError, StreamId};
use tictactoe_infra::command_dispatcher::DispatchError;

pub fn dispatch_error_to_response(err: DispatchError) -> axum::response::Response {
    match err {
        DispatchError::Domain(e) => domain_error_to_response(e),
        DispatchError::NotFound(id) => game_not_found(&id),
        DispatchError::StreamExists(id) => {
            json_error(StatusCode::CONFLICT, format!("Game with id={id} already exists"))
        }
        DispatchError::Store(e) => {
            tracing::error!(error = %e, "event store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let status = match &err {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::RuleViolation(_) => StatusCode::CONFLICT,
    };
    json_error(status, err.message())
}

pub fn game_not_found(id: &StreamId) -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        axum::Json(json!({
            "title": "Game not found",
            "description": format!("Game with id={id} not found"),
        })),
    )
        .into_response()
}

pub fn json_error(status: StatusCode, title: impl Into<String>) -> axum::response::Response {
    (status, axum::Json(json!({ "title": title.into() }))).into_response()
}
