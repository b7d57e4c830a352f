//! Tic-tac-toe domain module (event-sourced).
//!
//! This crate contains the game rules, implemented purely as deterministic domain logic
//! (no IO, no HTTP, no storage).

pub mod board;
pub mod event;
pub mod game;
pub mod player;

pub use board::{Board, Cell, MAX_BOARD_SIDE};
pub use event::{GameCreated, GameEvent, GameFinished, PlayerJoined, PlayerMoved};
pub use game::{DEFAULT_BOARD_SIDE, Game, GameCommand, GameState, MAX_PLAYERS};
pub use player::Player;
