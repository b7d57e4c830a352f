//! Games projection.
//!
//! Folds game events into one board-as-grid view per stream, ready to be served as-is.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use serde::Serialize;
use thiserror::Error;

use tictactoe_core::StreamId;
use tictactoe_events::{ConsumerError, EventConsumer};
use tictactoe_game::{GameEvent, GameState, MAX_BOARD_SIDE};

const CONSUMER_NAME: &str = "games_projection";

/// Read model: one game.
///
/// `board[row][col]` holds the index into `players` of the cell owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameView {
    pub state: GameState,
    pub board: Vec<Vec<Option<usize>>>,
    pub players: Vec<String>,
    pub winner: Option<String>,
}

impl GameView {
    fn empty(side: usize) -> Self {
        Self {
            state: GameState::Pending,
            board: vec![vec![None; side]; side],
            players: Vec::new(),
            winner: None,
        }
    }
}

/// An event that cannot have been produced by a valid game reached the projection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("no view for stream {0}")]
    UnknownStream(StreamId),

    #[error("player `{player}` has not joined stream {stream_id}")]
    UnknownPlayer { stream_id: StreamId, player: String },

    #[error("cell ({row}, {col}) is outside the board of stream {stream_id}")]
    CellOutsideBoard { stream_id: StreamId, row: i64, col: i64 },

    #[error("invalid board side {0}")]
    InvalidBoardSide(i64),

    #[error("projection lock poisoned")]
    Poisoned,
}

impl From<ProjectionError> for ConsumerError {
    fn from(value: ProjectionError) -> Self {
        ConsumerError::new(CONSUMER_NAME, value.to_string())
    }
}

/// Games projection.
///
/// Attached to the event store as a consumer; lives as long as the process.
#[derive(Debug, Default)]
pub struct GamesProjection {
    views: RwLock<HashMap<StreamId, GameView>>,
}

impl GamesProjection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Query the view of one game.
    pub fn get(&self, stream_id: &StreamId) -> Option<GameView> {
        self.views.read().ok()?.get(stream_id).cloned()
    }

    /// All views, ordered by stream id.
    pub fn list(&self) -> BTreeMap<StreamId, GameView> {
        self.views
            .read()
            .map(|views| views.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }

    fn grid_side(board_side: i64) -> Result<usize, ProjectionError> {
        if !(1..=MAX_BOARD_SIDE).contains(&board_side) {
            return Err(ProjectionError::InvalidBoardSide(board_side));
        }
        usize::try_from(board_side).map_err(|_| ProjectionError::InvalidBoardSide(board_side))
    }

    /// Fold one event into the view of `stream_id`.
    pub fn apply(&self, event: &GameEvent, stream_id: &StreamId) -> Result<(), ProjectionError> {
        // The grid is allocated before the lock is taken so a failed allocation cannot
        // poison the views.
        if let GameEvent::GameCreated(e) = event {
            let view = GameView::empty(Self::grid_side(e.board_side)?);
            let mut views = self.views.write().map_err(|_| ProjectionError::Poisoned)?;
            views.insert(stream_id.clone(), view);
            return Ok(());
        }

        let mut views = self.views.write().map_err(|_| ProjectionError::Poisoned)?;
        let view = views
            .get_mut(stream_id)
            .ok_or_else(|| ProjectionError::UnknownStream(stream_id.clone()))?;

        match event {
            GameEvent::GameCreated(_) => {}
            GameEvent::PlayerJoined(e) => {
                view.players.push(e.player.name().to_string());
            }
            GameEvent::GameStarted => {
                view.state = GameState::Playable;
            }
            GameEvent::PlayerMoved(e) => {
                let index = view
                    .players
                    .iter()
                    .position(|name| name == e.player.name())
                    .ok_or_else(|| ProjectionError::UnknownPlayer {
                        stream_id: stream_id.clone(),
                        player: e.player.name().to_string(),
                    })?;

                let slot = usize::try_from(e.cell.row)
                    .ok()
                    .zip(usize::try_from(e.cell.col).ok())
                    .and_then(|(row, col)| view.board.get_mut(row)?.get_mut(col))
                    .ok_or_else(|| ProjectionError::CellOutsideBoard {
                        stream_id: stream_id.clone(),
                        row: e.cell.row,
                        col: e.cell.col,
                    })?;
                *slot = Some(index);
            }
            GameEvent::GameFinished(e) => {
                view.state = GameState::Finished;
                view.winner = e.winner.as_ref().map(|p| p.name().to_string());
            }
        }

        Ok(())
    }
}

impl EventConsumer<GameEvent> for GamesProjection {
    fn consume(&self, event: &GameEvent, stream_id: &StreamId) -> Result<(), ConsumerError> {
        self.apply(event, stream_id).map_err(ConsumerError::from)
    }
}
