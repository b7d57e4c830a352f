use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use std::sync::Arc;

use tictactoe_core::{Aggregate, StreamId};
use tictactoe_game::{Cell, Game, GameCommand, GameEvent, Player};
use tictactoe_infra::command_dispatcher::CommandDispatcher;
use tictactoe_infra::event_store::{EventStore, InMemoryEventStore};
use tictactoe_infra::projections::GamesProjection;

type Store = Arc<InMemoryEventStore<GameEvent>>;

fn setup() -> CommandDispatcher<Store> {
    let store: Store = Arc::new(InMemoryEventStore::new());
    store.attach(Arc::new(GamesProjection::new())).unwrap();
    CommandDispatcher::new(store)
}

/// History of a started game on a `side × side` board with `moves` moves played in
/// row-major order, alternating players, never completing a line early enough to finish.
fn history(side: i64, moves: usize) -> Vec<GameEvent> {
    let mut game = Game::create(side).unwrap();
    game.join(Player::new("alice")).unwrap();
    game.join(Player::new("bob")).unwrap();

    let players = [Player::new("alice"), Player::new("bob")];
    let mut turn = 0;
    'outer: for row in 0..side {
        for col in 0..side {
            if turn == moves {
                break 'outer;
            }
            if game.play(Cell::new(row, col), players[turn % 2].clone()).is_err() {
                break 'outer;
            }
            turn += 1;
        }
    }
    game.take_changes()
}

fn bench_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("replay");

    for side in [3i64, 8, 16] {
        let events = history(side, (side * side) as usize / 2);
        group.throughput(Throughput::Elements(events.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(side), &events, |b, events| {
            b.iter(|| Game::from_events(black_box(events)).unwrap());
        });
    }

    group.finish();
}

fn bench_command_execution_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("command_execution_latency");

    group.bench_function("create_game", |b| {
        let dispatcher = setup();
        b.iter(|| {
            let id = StreamId::generate();
            dispatcher
                .create(&id, Game::create(black_box(3)).unwrap())
                .unwrap();
        });
    });

    group.bench_function("join_fresh_game", |b| {
        let dispatcher = setup();
        b.iter(|| {
            let id = StreamId::generate();
            dispatcher.create(&id, Game::create(3).unwrap()).unwrap();
            dispatcher
                .dispatch::<Game>(
                    &id,
                    &GameCommand::Join {
                        player: Player::new("alice"),
                    },
                )
                .unwrap();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_replay, bench_command_execution_latency);
criterion_main!(benches);
