use criterion::{black_box, criterion_group, criterion_main, Criterion};
use blockfall::core::{Board, EngineConfig, GameState};
use blockfall::engine::{Collaborators, ManualClock, NullAudio, NullRenderer, NullStats, Session};
use blockfall::term::{TermFrontend, Viewport};
use blockfall::types::{Color, GameAction};

fn new_game() -> GameState {
    GameState::new(EngineConfig::default(), 12345).unwrap()
}

fn bench_update(c: &mut Criterion) {
    let mut state = new_game();

    c.bench_function("update_16ms", |b| {
        b.iter(|| {
            if state.game_over() {
                state.restart();
            }
            state.update(black_box(16));
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    let gray = Color::new(128, 128, 128);
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut board = Board::new(10, 20).unwrap();
            for y in 16..20 {
                for x in 0..10 {
                    board.set(x, y, Some(gray));
                }
            }
            black_box(board.clear_full_lines());
        })
    });
}

fn bench_hard_drop(c: &mut Criterion) {
    let mut state = new_game();

    c.bench_function("hard_drop", |b| {
        b.iter(|| {
            if state.hard_drop().is_none() {
                state.restart();
            }
        })
    });
}

fn bench_move_and_rotate(c: &mut Criterion) {
    let mut state = new_game();

    c.bench_function("move_and_rotate", |b| {
        b.iter(|| {
            state.apply_action(GameAction::MoveRight);
            state.apply_action(GameAction::Rotate);
            state.apply_action(GameAction::MoveLeft);
        })
    });
}

fn bench_session_tick(c: &mut Criterion) {
    let mut headless = Session::new(new_game(), ManualClock::new(0));
    let mut nulls = Collaborators::new(NullRenderer, NullAudio, NullStats);

    c.bench_function("session_tick_headless", |b| {
        b.iter(|| {
            headless.clock_mut().advance(16);
            headless.tick(&mut nulls);
        })
    });

    let mut session = Session::new(new_game(), ManualClock::new(0));
    let mut frontend = TermFrontend::new(Viewport::new(80, 24));

    c.bench_function("session_tick_term_frontend", |b| {
        b.iter(|| {
            session.clock_mut().advance(16);
            session.tick(&mut frontend);
        })
    });
}

criterion_group!(
    benches,
    bench_update,
    bench_line_clear,
    bench_hard_drop,
    bench_move_and_rotate,
    bench_session_tick
);
criterion_main!(benches);
