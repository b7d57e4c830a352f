//! Projection implementations (read model builders).
//!
//! Projections consume domain events as the event store appends them and build
//! query-optimized read models. They are not persisted; they live as long as the process.

pub mod games;

pub use games::{GameView, GamesProjection, ProjectionError};
