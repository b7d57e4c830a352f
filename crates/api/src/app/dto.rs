use axum::http::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use tictactoe_game::Cell;

use crate::app::errors;

#[derive(Debug, Default, Deserialize)]
pub struct CreateGameRequest {
    pub board_side: Option<i64>,
}

/// Join or move, depending on whether `player` already sits at the table.
#[derive(Debug, Deserialize)]
pub struct PlayRequest {
    pub player: String,
    pub cell: Option<Cell>,
}

/// Decode a JSON body, answering malformed input with the usual `{"title"}` error.
pub fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, axum::response::Response> {
    serde_json::from_slice(body)
        .map_err(|e| errors::json_error(StatusCode::BAD_REQUEST, format!("Invalid request body: {e}")))
}
