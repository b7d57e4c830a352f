use serde::{Deserialize, Serialize};

use tictactoe_events::Event;

use crate::board::Cell;
use crate::player::Player;

/// Event: GameCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameCreated {
    pub board_side: i64,
}

/// Event: PlayerJoined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerJoined {
    pub player: Player,
}

/// Event: PlayerMoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMoved {
    pub cell: Cell,
    pub player: Player,
}

/// Event: GameFinished. `winner` is `None` for a draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameFinished {
    pub winner: Option<Player>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    GameCreated(GameCreated),
    PlayerJoined(PlayerJoined),
    GameStarted,
    PlayerMoved(PlayerMoved),
    GameFinished(GameFinished),
}

impl Event for GameEvent {
    fn event_type(&self) -> &'static str {
        match self {
            GameEvent::GameCreated(_) => "game.created",
            GameEvent::PlayerJoined(_) => "game.player_joined",
            GameEvent::GameStarted => "game.started",
            GameEvent::PlayerMoved(_) => "game.player_moved",
            GameEvent::GameFinished(_) => "game.finished",
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn events_serialize_with_a_type_tag() {
        let moved = GameEvent::PlayerMoved(PlayerMoved {
            cell: Cell::new(1, 2),
            player: Player::new("alice"),
        });
        assert_eq!(
            serde_json::to_value(&moved).unwrap(),
            json!({"type": "player_moved", "cell": {"row": 1, "col": 2}, "player": "alice"})
        );

        assert_eq!(
            serde_json::to_value(GameEvent::GameStarted).unwrap(),
            json!({"type": "game_started"})
        );

        let draw = GameEvent::GameFinished(GameFinished { winner: None });
        assert_eq!(
            serde_json::to_value(&draw).unwrap(),
            json!({"type": "game_finished", "winner": null})
        );
    }

    #[test]
    fn event_types_are_stable() {
        let created = GameEvent::GameCreated(GameCreated { board_side: 3 });
        assert_eq!(created.event_type(), "game.created");
        assert_eq!(GameEvent::GameStarted.event_type(), "game.started");
    }
}
