use std::collections::BTreeMap;
use std::sync::Arc;

use tictactoe_core::{DomainError, StreamId};
use tictactoe_game::{Cell, Game, GameEvent, Player};
use tictactoe_infra::{
    command_dispatcher::{CommandDispatcher, DispatchError},
    event_store::{EventStore, EventStoreError, InMemoryEventStore},
    projections::{GameView, GamesProjection},
};

pub type GameStore = Arc<InMemoryEventStore<GameEvent>>;

/// Process-wide services shared by every handler.
#[derive(Debug)]
pub struct AppServices {
    dispatcher: CommandDispatcher<GameStore>,
    projection: Arc<GamesProjection>,
    default_board_side: i64,
}

impl AppServices {
    /// Wire the games projection into a fresh in-memory store.
    pub fn new(default_board_side: i64) -> Result<Self, EventStoreError> {
        let store: GameStore = Arc::new(InMemoryEventStore::new());
        let projection = Arc::new(GamesProjection::new());
        store.attach(projection.clone())?;

        Ok(Self {
            dispatcher: CommandDispatcher::new(store),
            projection,
            default_board_side,
        })
    }

    /// Start a new game; returns its stream id.
    pub fn create_game(&self, board_side: Option<i64>) -> Result<StreamId, DispatchError> {
        let game = Game::create(board_side.unwrap_or(self.default_board_side))?;
        let id = StreamId::generate();
        self.dispatcher.create(&id, game)?;
        Ok(id)
    }

    /// Join the game if `player` has not joined yet, otherwise move.
    pub fn play(&self, id: &StreamId, player: Player, cell: Option<Cell>) -> Result<Vec<GameEvent>, DispatchError> {
        self.dispatcher.execute(id, |game: &mut Game| {
            if !game.has_player(&player) {
                return game.join(player.clone());
            }
            let cell = cell.ok_or_else(|| DomainError::validation("Cell is required to move"))?;
            game.play(cell, player.clone())
        })
    }

    pub fn game(&self, id: &StreamId) -> Option<GameView> {
        self.projection.get(id)
    }

    pub fn games(&self) -> BTreeMap<StreamId, GameView> {
        self.projection.list()
    }

    pub fn events(&self, id: &StreamId) -> Result<Vec<GameEvent>, DispatchError> {
        Ok(self.dispatcher.store().stream(id)?)
    }
}
