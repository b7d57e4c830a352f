//! Environment-driven server configuration.

use std::net::SocketAddr;

use tictactoe_game::{DEFAULT_BOARD_SIDE, MAX_BOARD_SIDE};

pub const BIND_ADDR_VAR: &str = "TICTACTOE_BIND_ADDR";
pub const DEFAULT_BOARD_SIDE_VAR: &str = "TICTACTOE_DEFAULT_BOARD_SIDE";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Side used when `POST /api/games` carries no `board_side`.
    pub default_board_side: i64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            default_board_side: DEFAULT_BOARD_SIDE,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Malformed values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let bind_addr = match lookup(BIND_ADDR_VAR) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(var = BIND_ADDR_VAR, value = %raw, default = DEFAULT_BIND_ADDR, "invalid bind address");
                defaults.bind_addr
            }),
            None => defaults.bind_addr,
        };

        let default_board_side = match lookup(DEFAULT_BOARD_SIDE_VAR) {
            Some(raw) => match raw.parse::<i64>() {
                Ok(side) if (1..=MAX_BOARD_SIDE).contains(&side) => side,
                _ => {
                    tracing::warn!(
                        var = DEFAULT_BOARD_SIDE_VAR,
                        value = %raw,
                        default = defaults.default_board_side,
                        "invalid default board side"
                    );
                    defaults.default_board_side
                }
            },
            None => defaults.default_board_side,
        };

        Self {
            bind_addr,
            default_board_side,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = ApiConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.default_board_side, 3);
    }

    #[test]
    fn values_are_read_from_lookup() {
        let config = ApiConfig::from_lookup(lookup(&[
            (BIND_ADDR_VAR, "127.0.0.1:9000"),
            (DEFAULT_BOARD_SIDE_VAR, "5"),
        ]));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(config.default_board_side, 5);
    }

    #[test]
    fn malformed_values_fall_back() {
        let config = ApiConfig::from_lookup(lookup(&[
            (BIND_ADDR_VAR, "not-an-addr"),
            (DEFAULT_BOARD_SIDE_VAR, "0"),
        ]));
        assert_eq!(config, ApiConfig::default());
    }

    #[test]
    fn oversized_default_side_falls_back() {
        let config = ApiConfig::from_lookup(lookup(&[(DEFAULT_BOARD_SIDE_VAR, "101")]));
        assert_eq!(config.default_board_side, DEFAULT_BOARD_SIDE);
    }
}
