use std::{
    io::{self, Read, Write},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use raffle_core::{
    load_settings, DrawEngine, DrawTick, ManualTickScheduler, RaffleSettings, TickOutcome,
    TickScheduler, TickSink, TokioTickScheduler,
};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

mod input;
mod terminal;

use input::NamesSource;
use terminal::{AnimationLine, TerminalCelebration};

#[derive(Parser, Debug)]
#[command(name = "raffle", about = "Draw a random winner from a list of names")]
struct Args {
    /// Participant names, one per argument. Read from stdin when omitted.
    names: Vec<String>,
    /// File with one name per line (`-` for stdin).
    #[arg(long, value_name = "PATH")]
    names_file: Option<PathBuf>,
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    #[arg(long, value_name = "MS")]
    tick_interval_ms: Option<u64>,
    #[arg(long, value_name = "MS")]
    duration_ms: Option<u64>,
    /// Seed for a reproducible draw.
    #[arg(long)]
    seed: Option<u64>,
    /// Run every animation tick immediately instead of on the timer.
    #[arg(long)]
    instant: bool,
    /// Print the result as JSON.
    #[arg(long)]
    json: bool,
    /// Skip animation frames and confetti.
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Serialize)]
struct DrawReport {
    winner: String,
    participants: usize,
    ticks: u64,
}

enum TickSource {
    Timer(mpsc::UnboundedReceiver<DrawTick>),
    Manual(ManualTickScheduler),
}

impl TickSource {
    async fn next(&mut self) -> Option<DrawTick> {
        match self {
            Self::Timer(rx) => rx.recv().await,
            Self::Manual(scheduler) => scheduler.next_tick(),
        }
    }
}

fn apply_flag_overrides(args: &Args, settings: &mut RaffleSettings) {
    if let Some(ms) = args.tick_interval_ms {
        settings.draw.tick_interval_ms = ms;
    }
    if let Some(ms) = args.duration_ms {
        settings.draw.animation_duration_ms = ms;
    }
}

fn resolve_settings(args: &Args) -> Result<RaffleSettings> {
    let mut settings = load_settings(args.config.as_deref())?;
    apply_flag_overrides(args, &mut settings);
    settings.validate().context("invalid raffle settings")?;
    Ok(settings)
}

fn build_engine(args: &Args, settings: &RaffleSettings) -> (DrawEngine, TickSource) {
    let (scheduler, source): (Box<dyn TickScheduler>, TickSource) = if args.instant {
        let manual = ManualTickScheduler::new();
        (Box::new(manual.clone()), TickSource::Manual(manual))
    } else {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink: TickSink = Arc::new(move |tick| tx.send(tick).is_ok());
        (
            Box::new(TokioTickScheduler::current(sink)),
            TickSource::Timer(rx),
        )
    };

    let celebration = TerminalCelebration::stdout(!args.json && !args.quiet);
    let mut engine = DrawEngine::new(settings.draw, scheduler)
        .with_celebration(Arc::new(celebration), settings.celebration);
    if let Some(seed) = args.seed {
        engine = engine.with_seed(seed);
    }
    (engine, source)
}

/// Runs one draw over names from `args` (or `stdin`) and writes the animation and
/// result to `out`.
async fn run(
    args: &Args,
    settings: &RaffleSettings,
    stdin: impl Read,
    out: &mut impl Write,
) -> Result<DrawReport> {
    let source = NamesSource::from_args(&args.names, args.names_file.as_deref());
    let raw = source.read_raw(stdin)?;

    let (mut engine, mut ticks) = build_engine(args, settings);
    engine.set_raw_text(raw);
    let participants = engine.participants().len();

    if let Err(err) = engine.start_draw() {
        bail!("{err}");
    }

    let animate = !args.json && !args.quiet;
    let mut line = AnimationLine::new(&mut *out);
    if let (true, Some(first)) = (animate, engine.current_display_name()) {
        line.show(first)?;
    }

    let mut tick_count = 0;
    let winner = loop {
        let Some(tick) = ticks.next().await else {
            bail!("draw timer stopped before a winner was picked");
        };
        match engine.on_tick(tick) {
            TickOutcome::Cycling { name } => {
                tick_count += 1;
                if animate {
                    line.show(&name)?;
                }
            }
            TickOutcome::Finished { winner } => {
                tick_count += 1;
                if animate {
                    line.clear()?;
                }
                break winner;
            }
            TickOutcome::Ignored => {}
        }
    };

    let report = DrawReport {
        winner,
        participants,
        ticks: tick_count,
    };
    if args.json {
        writeln!(out, "{}", serde_json::to_string(&report)?)?;
    } else {
        writeln!(out, "The winner is... {}", report.winner)?;
        if !args.quiet {
            writeln!(out, "Congratulations!")?;
        }
    }
    Ok(report)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let settings = resolve_settings(&args)?;
    tracing::debug!(?settings, "resolved raffle settings");
    let report = run(&args, &settings, io::stdin().lock(), &mut io::stdout().lock()).await?;
    tracing::debug!(winner = %report.winner, ticks = report.ticks, "draw finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["raffle"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn flags_override_loaded_settings() {
        let parsed = args(&[
            "--tick-interval-ms",
            "10",
            "--duration-ms",
            "100",
            "Alice",
            "Bob",
        ]);
        let mut settings = RaffleSettings::default();
        apply_flag_overrides(&parsed, &mut settings);

        assert_eq!(parsed.names, vec!["Alice", "Bob"]);
        assert_eq!(settings.draw.ticks_per_draw(), 11);
    }

    #[tokio::test]
    async fn instant_draw_finishes_without_a_timer() {
        let parsed = args(&["--instant", "--quiet", "--seed", "7", "Alice", "Bob", "Cy"]);
        let (mut engine, mut ticks) = build_engine(&parsed, &RaffleSettings::default());
        engine.set_raw_text(parsed.names.join("\n"));
        engine.start_draw().expect("start");

        let mut count = 0;
        let winner = loop {
            let tick = ticks.next().await.expect("tick");
            count += 1;
            if let TickOutcome::Finished { winner } = engine.on_tick(tick) {
                break winner;
            }
        };

        assert_eq!(count, 61);
        assert!(["Alice", "Bob", "Cy"].contains(&winner.as_str()));
        assert!(ticks.next().await.is_none());
    }

    #[tokio::test]
    async fn single_name_fails_with_the_validation_message() {
        let parsed = args(&["--instant", "OnlyOne"]);
        let mut out = Vec::new();

        let err = run(&parsed, &RaffleSettings::default(), &b""[..], &mut out)
            .await
            .expect_err("one name");

        assert!(err.to_string().contains("at least two names"), "{err}");
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn byte_order_mark_on_stdin_is_not_a_participant() {
        let parsed = args(&["--instant", "--quiet"]);
        let mut out = Vec::new();

        let err = run(
            &parsed,
            &RaffleSettings::default(),
            &b"\xEF\xBB\xBF\nBob\n"[..],
            &mut out,
        )
        .await
        .expect_err("one name");

        assert!(err.to_string().contains("at least two names"), "{err}");
    }

    #[tokio::test]
    async fn json_mode_writes_only_the_report_line() {
        let parsed = args(&["--instant", "--json", "--seed", "3", "Alice", "Bob"]);
        let mut out = Vec::new();

        let report = run(&parsed, &RaffleSettings::default(), &b""[..], &mut out)
            .await
            .expect("draw");

        let printed = String::from_utf8(out).expect("utf8");
        assert_eq!(printed.lines().count(), 1);
        assert_eq!(
            printed,
            format!("{}\n", serde_json::to_string(&report).expect("json"))
        );
        assert_eq!(report.participants, 2);
        assert_eq!(report.ticks, 61);
        assert!(["Alice", "Bob"].contains(&report.winner.as_str()));
    }

    #[test]
    fn oversized_duration_flag_is_rejected() {
        let parsed = args(&[
            "--tick-interval-ms",
            "1",
            "--duration-ms",
            "18446744073709551615",
            "A",
            "B",
        ]);
        assert!(resolve_settings(&parsed).is_err());
    }

    #[test]
    fn json_report_shape() {
        let report = DrawReport {
            winner: "Bob".into(),
            participants: 3,
            ticks: 61,
        };
        assert_eq!(
            serde_json::to_string(&report).expect("json"),
            r#"{"winner":"Bob","participants":3,"ticks":61}"#
        );
    }
}
