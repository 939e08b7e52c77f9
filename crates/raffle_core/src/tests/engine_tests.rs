use super::{DrawEngine, DrawState, Presentation, StartOutcome, TickOutcome};
use crate::{
    celebration::{CelebrationHandle, CelebrationOptions, CelebrationTrigger, MissingCelebration},
    config::DrawSettings,
    error::DrawError,
    timer::{DrawId, DrawTick, ManualTickScheduler},
};

use anyhow::anyhow;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

fn engine_with(scheduler: &ManualTickScheduler, seed: u64) -> DrawEngine {
    DrawEngine::new(DrawSettings::default(), Box::new(scheduler.clone())).with_seed(seed)
}

fn run_to_completion(engine: &mut DrawEngine, scheduler: &ManualTickScheduler) -> (u64, String) {
    let mut ticks = 0;
    while let Some(tick) = scheduler.next_tick() {
        ticks += 1;
        if let TickOutcome::Finished { winner } = engine.on_tick(tick) {
            return (ticks, winner);
        }
        assert!(ticks < 10_000, "draw never finished");
    }
    panic!("timer stopped before a winner was drawn");
}

#[derive(Default)]
struct CountingCelebration {
    calls: AtomicUsize,
    dismissals: Arc<AtomicUsize>,
}

impl CelebrationTrigger for CountingCelebration {
    fn celebrate(&self, options: &CelebrationOptions) -> anyhow::Result<CelebrationHandle> {
        assert_eq!(options.particle_count, 150);
        self.calls.fetch_add(1, Ordering::SeqCst);
        let dismissals = Arc::clone(&self.dismissals);
        Ok(CelebrationHandle::new(move || {
            dismissals.fetch_add(1, Ordering::SeqCst);
        }))
    }
}

struct FailingCelebration {
    calls: AtomicUsize,
}

impl CelebrationTrigger for FailingCelebration {
    fn celebrate(&self, _options: &CelebrationOptions) -> anyhow::Result<CelebrationHandle> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(anyhow!("renderer went away"))
    }
}

#[test]
fn three_names_draw_a_member_winner_after_sixty_one_ticks() {
    let scheduler = ManualTickScheduler::new();
    let mut engine = engine_with(&scheduler, 11);
    engine.set_raw_text("Alice\nBob\nCharlie");

    let outcome = engine.start_draw().expect("start");
    assert_eq!(outcome, StartOutcome::Started(DrawId(1)));
    assert_eq!(engine.state(), DrawState::Drawing);
    assert_eq!(engine.current_display_name(), Some("Alice"));

    let (ticks, winner) = run_to_completion(&mut engine, &scheduler);

    assert_eq!(ticks, 61);
    assert!(["Alice", "Bob", "Charlie"].contains(&winner.as_str()));
    assert_eq!(engine.state(), DrawState::Complete);
    assert_eq!(engine.winner(), Some(winner.as_str()));
    assert_eq!(engine.current_display_name(), None);
    assert_eq!(scheduler.cancellations(), 1);
    assert_eq!(scheduler.next_tick(), None);
}

#[test]
fn winner_is_always_a_participant_across_seeds() {
    for seed in 0..64 {
        let scheduler = ManualTickScheduler::new();
        let mut engine = engine_with(&scheduler, seed);
        engine.set_raw_text(" Dana \nEli\n\nFay\nGus ");
        let participants = engine.participants();

        engine.start_draw().expect("start");
        let (_, winner) = run_to_completion(&mut engine, &scheduler);

        assert!(participants.contains(&winner), "seed {seed} picked {winner}");
    }
}

#[test]
fn winner_comes_from_a_separate_draw_after_the_last_cycled_name() {
    let seed = 2024;
    let names = ["Alice", "Bob", "Charlie", "Dana", "Eli"];
    let scheduler = ManualTickScheduler::new();
    let mut engine = engine_with(&scheduler, seed);
    engine.set_raw_text(names.join("\n"));

    engine.start_draw().expect("start");
    let (ticks, winner) = run_to_completion(&mut engine, &scheduler);

    let mut replay = StdRng::seed_from_u64(seed);
    for _ in 0..ticks {
        let _cosmetic: usize = replay.random_range(0..names.len());
    }
    let expected = names[replay.random_range(0..names.len())];

    assert_eq!(winner, expected);
}

#[test]
fn single_name_is_rejected_and_stays_idle() {
    let scheduler = ManualTickScheduler::new();
    let mut engine = engine_with(&scheduler, 1);
    engine.set_raw_text("OnlyOne");

    let err = engine.start_draw().expect_err("one name");

    assert_eq!(err, DrawError::InsufficientParticipants { found: 1 });
    assert_eq!(engine.state(), DrawState::Idle);
    assert!(engine
        .error()
        .map(|e| e.message().contains("at least two names"))
        .unwrap_or(false));
    assert!(scheduler.scheduled().is_empty());
}

#[test]
fn blank_lines_do_not_count_as_participants() {
    let scheduler = ManualTickScheduler::new();
    let mut engine = engine_with(&scheduler, 1);
    engine.set_raw_text("  \n\nBob\n");

    assert_eq!(engine.participants().into_inner(), vec!["Bob"]);
    assert!(engine.start_draw().is_err());
    assert_eq!(engine.state(), DrawState::Idle);
}

#[test]
fn error_clears_on_next_valid_attempt() {
    let scheduler = ManualTickScheduler::new();
    let mut engine = engine_with(&scheduler, 1);
    engine.set_raw_text("Solo");
    assert!(engine.start_draw().is_err());
    assert!(engine.error().is_some());

    engine.raw_text_mut().push_str("\nDuo");
    engine.start_draw().expect("start");

    assert!(engine.error().is_none());
    assert_eq!(engine.state(), DrawState::Drawing);
}

#[test]
fn starting_again_mid_animation_is_a_no_op() {
    let scheduler = ManualTickScheduler::new();
    let mut engine = engine_with(&scheduler, 5);
    engine.set_raw_text("Alice\nBob");
    engine.start_draw().expect("start");
    for _ in 0..10 {
        let tick = scheduler.next_tick().expect("tick");
        engine.on_tick(tick);
    }

    let again = engine.start_draw().expect("second start");

    assert_eq!(again, StartOutcome::AlreadyDrawing(DrawId(1)));
    assert_eq!(engine.ticks_elapsed(), 10);
    assert_eq!(scheduler.scheduled().len(), 1);
    let (ticks, _) = run_to_completion(&mut engine, &scheduler);
    assert_eq!(ticks, 51);
}

#[test]
fn ticks_from_another_draw_are_ignored() {
    let scheduler = ManualTickScheduler::new();
    let mut engine = engine_with(&scheduler, 5);
    engine.set_raw_text("Alice\nBob");

    assert_eq!(
        engine.on_tick(DrawTick { draw_id: DrawId(1) }),
        TickOutcome::Ignored
    );

    engine.start_draw().expect("start");
    assert_eq!(
        engine.on_tick(DrawTick { draw_id: DrawId(99) }),
        TickOutcome::Ignored
    );
    assert_eq!(engine.ticks_elapsed(), 0);
}

#[test]
fn editing_text_mid_draw_does_not_change_the_pool() {
    let scheduler = ManualTickScheduler::new();
    let mut engine = engine_with(&scheduler, 8);
    engine.set_raw_text("Alice\nBob");
    engine.start_draw().expect("start");

    engine.set_raw_text("Mallory\nTrent");
    let (_, winner) = run_to_completion(&mut engine, &scheduler);

    assert!(winner == "Alice" || winner == "Bob");
}

#[test]
fn reset_after_complete_returns_to_empty_idle() {
    let scheduler = ManualTickScheduler::new();
    let mut engine = engine_with(&scheduler, 3);
    engine.set_raw_text("Alice\nBob\nCharlie");
    engine.start_draw().expect("start");
    run_to_completion(&mut engine, &scheduler);

    engine.reset();

    assert_eq!(engine.state(), DrawState::Idle);
    assert_eq!(engine.raw_text(), "");
    assert_eq!(engine.winner(), None);
    assert!(engine.error().is_none());
}

#[test]
fn reset_mid_draw_releases_the_timer_once() {
    let scheduler = ManualTickScheduler::new();
    let mut engine = engine_with(&scheduler, 3);
    engine.set_raw_text("Alice\nBob");
    engine.start_draw().expect("start");
    let pending = scheduler.next_tick().expect("tick");

    engine.reset();

    assert_eq!(scheduler.cancellations(), 1);
    assert_eq!(scheduler.next_tick(), None);
    assert_eq!(engine.on_tick(pending), TickOutcome::Ignored);
    drop(engine);
    assert_eq!(scheduler.cancellations(), 1);
}

#[test]
fn dropping_engine_mid_draw_cancels_the_timer() {
    let scheduler = ManualTickScheduler::new();
    let mut engine = engine_with(&scheduler, 3);
    engine.set_raw_text("Alice\nBob");
    engine.start_draw().expect("start");

    drop(engine);

    assert_eq!(scheduler.cancellations(), 1);
    assert_eq!(scheduler.active_draw(), None);
}

#[test]
fn celebration_fires_once_per_completed_draw() {
    let scheduler = ManualTickScheduler::new();
    let celebration = Arc::new(CountingCelebration::default());
    let mut engine = engine_with(&scheduler, 4)
        .with_celebration(celebration.clone(), CelebrationOptions::default());

    engine.set_raw_text("Solo");
    let _ = engine.start_draw();
    assert_eq!(celebration.calls.load(Ordering::SeqCst), 0);

    engine.set_raw_text("Alice\nBob");
    engine.start_draw().expect("start");
    run_to_completion(&mut engine, &scheduler);
    assert_eq!(celebration.calls.load(Ordering::SeqCst), 1);

    engine.reset();
    assert_eq!(celebration.calls.load(Ordering::SeqCst), 1);
    assert_eq!(celebration.dismissals.load(Ordering::SeqCst), 1);
}

#[test]
fn celebration_failure_does_not_affect_the_result() {
    let scheduler = ManualTickScheduler::new();
    let celebration = Arc::new(FailingCelebration {
        calls: AtomicUsize::new(0),
    });
    let mut engine = engine_with(&scheduler, 4)
        .with_celebration(celebration.clone(), CelebrationOptions::default());
    engine.set_raw_text("Alice\nBob");

    engine.start_draw().expect("start");
    let (_, winner) = run_to_completion(&mut engine, &scheduler);

    assert_eq!(celebration.calls.load(Ordering::SeqCst), 1);
    assert_eq!(engine.state(), DrawState::Complete);
    assert_eq!(engine.winner(), Some(winner.as_str()));
}

#[test]
fn unavailable_celebration_is_skipped() {
    let scheduler = ManualTickScheduler::new();
    let mut engine = engine_with(&scheduler, 4)
        .with_celebration(Arc::new(MissingCelebration), CelebrationOptions::default());
    engine.set_raw_text("Alice\nBob");

    engine.start_draw().expect("start");
    run_to_completion(&mut engine, &scheduler);

    assert_eq!(engine.state(), DrawState::Complete);
}

#[test]
fn presentation_follows_draw_state() {
    let scheduler = ManualTickScheduler::new();
    let mut engine = engine_with(&scheduler, 9);
    engine.set_raw_text("Solo");

    let _ = engine.start_draw();
    match engine.presentation() {
        Presentation::Input {
            display_name,
            error,
            drawing,
            ..
        } => {
            assert_eq!(display_name, None);
            assert!(error.is_some());
            assert!(!drawing);
        }
        other => panic!("unexpected view: {other:?}"),
    }

    engine.set_raw_text("Alice\nBob");
    engine.start_draw().expect("start");
    let view = engine.presentation();
    assert_eq!(view.draw_button_label(), "Drawing...");
    assert!(matches!(
        view,
        Presentation::Input {
            display_name: Some("Alice"),
            error: None,
            drawing: true,
            ..
        }
    ));

    let (_, winner) = run_to_completion(&mut engine, &scheduler);
    assert_eq!(
        engine.presentation(),
        Presentation::Winner {
            winner: winner.as_str()
        }
    );
}

#[test]
fn invalid_settings_fall_back_to_default_timing() {
    for draw in [
        DrawSettings {
            tick_interval_ms: 0,
            animation_duration_ms: 3000,
        },
        DrawSettings {
            tick_interval_ms: 1,
            animation_duration_ms: u64::MAX,
        },
    ] {
        let scheduler = ManualTickScheduler::new();
        let mut engine = DrawEngine::new(draw, Box::new(scheduler.clone())).with_seed(8);
        assert_eq!(*engine.settings(), DrawSettings::default());

        engine.set_raw_text("Alice\nBob");
        engine.start_draw().expect("start");
        assert_eq!(
            scheduler.scheduled(),
            vec![(DrawId(1), Duration::from_millis(50))]
        );
        let (ticks, _) = run_to_completion(&mut engine, &scheduler);
        assert_eq!(ticks, 61);
    }
}

#[test]
fn each_draw_gets_a_fresh_id() {
    let scheduler = ManualTickScheduler::new();
    let mut engine = engine_with(&scheduler, 6);
    engine.set_raw_text("Alice\nBob");
    engine.start_draw().expect("first");
    run_to_completion(&mut engine, &scheduler);

    let second = engine.start_draw().expect("second");

    assert_eq!(second, StartOutcome::Started(DrawId(2)));
    assert_eq!(engine.winner(), None);
}
