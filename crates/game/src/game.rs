use serde::{Deserialize, Serialize};

use tictactoe_core::{Aggregate, DomainError, DomainResult};

use crate::board::{Board, Cell};
use crate::event::{GameCreated, GameEvent, GameFinished, PlayerJoined, PlayerMoved};
use crate::player::Player;

/// Seats per game.
pub const MAX_PLAYERS: usize = 2;

/// Board side used when a game is created without one.
pub const DEFAULT_BOARD_SIDE: i64 = 3;

/// Lifecycle of a game. Transitions only move forward.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameState {
    #[default]
    Pending,
    Playable,
    Finished,
}

impl GameState {
    pub fn as_str(self) -> &'static str {
        match self {
            GameState::Pending => "PENDING",
            GameState::Playable => "PLAYABLE",
            GameState::Finished => "FINISHED",
        }
    }
}

impl core::fmt::Display for GameState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameCommand {
    Join { player: Player },
    Move { cell: Cell, player: Player },
}

/// Aggregate root: Game.
///
/// Built by replaying its stream; never kept alive between commands. Commands validate
/// against the replayed state, apply their events, and append them to `changes` for the
/// caller to persist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Game {
    state: GameState,
    board: Option<Board>,
    players: Vec<Player>,
    previous_player: Option<Player>,
    changes: Vec<GameEvent>,
    version: u64,
}

impl Game {
    /// Start a new game. The `GameCreated` event is both applied and left in `changes`.
    pub fn create(board_side: i64) -> DomainResult<Self> {
        let mut game = Self::default();
        game.record(GameEvent::GameCreated(GameCreated { board_side }))?;
        Ok(game)
    }

    /// Rebuild a game from its history (trusted, no rule checks).
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a GameEvent>) -> DomainResult<Self> {
        Self::rehydrate(events)
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn previous_player(&self) -> Option<&Player> {
        self.previous_player.as_ref()
    }

    pub fn has_player(&self, player: &Player) -> bool {
        self.players.contains(player)
    }

    /// Take a seat. Joining twice is a no-op; the second seat starts the game.
    pub fn join(&mut self, player: Player) -> DomainResult<()> {
        if self.has_player(&player) {
            return Ok(());
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(DomainError::rule("Maximum number of players reached"));
        }

        self.record(GameEvent::PlayerJoined(PlayerJoined { player }))?;
        if self.players.len() == MAX_PLAYERS {
            self.record(GameEvent::GameStarted)?;
        }
        Ok(())
    }

    /// Claim `cell` for `player`, finishing the game on a win or a full board.
    ///
    /// Turn order is enforced only by refusing two consecutive moves from the same player.
    pub fn play(&mut self, cell: Cell, player: Player) -> DomainResult<()> {
        if self.state != GameState::Playable {
            return Err(DomainError::rule("Game is not PLAYABLE"));
        }
        if self.previous_player.as_ref() == Some(&player) {
            return Err(DomainError::rule("Player already moved"));
        }
        self.board()
            .ok_or_else(|| DomainError::rule("Game has no board"))?
            .validate(&cell)?;

        self.record(GameEvent::PlayerMoved(PlayerMoved {
            cell,
            player: player.clone(),
        }))?;

        let board = self.board().ok_or_else(|| DomainError::rule("Game has no board"))?;
        let winner = if board.is_winning(&cell) {
            Some(Some(player))
        } else if !board.has_available_cells() {
            Some(None)
        } else {
            None
        };

        if let Some(winner) = winner {
            self.record(GameEvent::GameFinished(GameFinished { winner }))?;
        }
        Ok(())
    }

    fn record(&mut self, event: GameEvent) -> DomainResult<()> {
        self.apply(&event)?;
        self.changes.push(event);
        Ok(())
    }
}

impl Aggregate for Game {
    type Command = GameCommand;
    type Event = GameEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) -> Result<(), Self::Error> {
        match event {
            GameEvent::GameCreated(e) => {
                self.board = Some(Board::create(e.board_side)?);
                self.players.clear();
                self.state = GameState::Pending;
            }
            GameEvent::PlayerJoined(e) => {
                self.players.push(e.player.clone());
            }
            GameEvent::GameStarted => {
                self.state = GameState::Playable;
            }
            GameEvent::PlayerMoved(e) => {
                let board = self
                    .board
                    .as_mut()
                    .ok_or_else(|| DomainError::rule("Game has no board"))?;
                board.mark(e.cell, e.player.clone());
                self.previous_player = Some(e.player.clone());
            }
            GameEvent::GameFinished(_) => {
                self.state = GameState::Finished;
            }
        }

        self.version += 1;
        Ok(())
    }

    fn handle(&mut self, command: &Self::Command) -> Result<(), Self::Error> {
        match command {
            GameCommand::Join { player } => self.join(player.clone()),
            GameCommand::Move { cell, player } => self.play(*cell, player.clone()),
        }
    }

    fn changes(&self) -> &[Self::Event] {
        &self.changes
    }

    fn take_changes(&mut self) -> Vec<Self::Event> {
        std::mem::take(&mut self.changes)
    }

    fn version(&self) -> u64 {
        self.version
    }
}
