use std::io::{self, BufRead, Write};

use chrono::Utc;
use clap::Args;
use finyap_core::content::order_stats;
use finyap_core::session::{recorder, session_rng};
use finyap_core::text::Annotated;
use finyap_core::{
    Config, Database, Event, Recorder, RoundState, SegmentKind, Selection, SessionConfig,
    SessionEnd, SessionEngine, WordState, WordView,
};

/// Typed instead of a guess to leave the session.
const QUIT: &str = ":q";
const LAST_SELECTION_KEY: &str = "last_selection";

#[derive(Args)]
pub struct PlayArgs {
    /// Scenario to practise; repeat for several (default: last selection)
    #[arg(short, long = "scenario")]
    pub scenarios: Vec<String>,
    /// Practise every scenario
    #[arg(short, long, conflicts_with = "scenarios")]
    pub all: bool,
    /// Sentences drawn from each scenario
    #[arg(short = 'n', long)]
    pub per_scenario: Option<usize>,
    /// Fixed shuffle seed
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run(args: PlayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let (db, catalog) = super::open_catalog(&config)?;

    let scenarios = select(&args, &db, &config)?;
    db.kv_set(LAST_SELECTION_KEY, &serde_json::to_string(&scenarios)?)?;

    let session = SessionConfig {
        scenarios,
        per_scenario: args
            .per_scenario
            .unwrap_or(config.session.sentences_per_scenario),
        seed: args.seed.or(config.session.seed),
    };
    let (mut engine, events) =
        SessionEngine::start(&session, &catalog, config.clitic_set(), Utc::now())?;
    recorder::dispatch(&events, &db);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let end = drive(&mut engine, &db, stdin.lock(), &mut stdout)?;
    tracing::info!(?end, passes = engine.pass(), "session ended");
    Ok(())
}

/// Scenario names in block order.
///
/// Explicit `--scenario` flags keep their order; otherwise the selection
/// follows the stat list order, most-practised first.
fn select(
    args: &PlayArgs,
    db: &Database,
    config: &Config,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    if !args.scenarios.is_empty() {
        return Ok(args.scenarios.clone());
    }

    let mut rng = session_rng(args.seed.or(config.session.seed));
    let displayed = order_stats(db.scenario_stats()?, &mut rng);
    let mut selection = Selection::new();
    if args.all {
        selection.select_all(&displayed);
    } else if let Some(saved) = db.kv_get(LAST_SELECTION_KEY)? {
        for name in &saved_selection(&saved) {
            selection.select(name);
        }
    }

    let ordered = selection.ordered(&displayed);
    if ordered.is_empty() {
        return Err("no scenarios selected; pass --scenario <name> or --all".into());
    }
    tracing::debug!(scenarios = ?ordered, "resolved scenario selection");
    Ok(ordered)
}

/// Scenario names stored by the previous session. A value that does not
/// parse is ignored.
fn saved_selection(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring unreadable saved selection");
        Vec::new()
    })
}

/// Run the engine against line-oriented input until the session ends.
///
/// End of input cancels the session.
pub fn drive<R, I, O>(
    engine: &mut SessionEngine,
    sink: &R,
    input: I,
    out: &mut O,
) -> io::Result<SessionEnd>
where
    R: Recorder + ?Sized,
    I: BufRead,
    O: Write,
{
    let mut lines = input.lines();
    loop {
        let state = engine.state();
        match state {
            RoundState::Finished { end } => return Ok(end),
            RoundState::Playing { .. } => render_playing(engine, out)?,
            RoundState::RoundOver { success, .. } => render_round_over(engine, success, out)?,
        }
        out.flush()?;

        let now = Utc::now();
        let events = match lines.next().transpose()? {
            None => engine.cancel(now),
            Some(line) if line.trim() == QUIT => engine.cancel(now),
            Some(line) => match state {
                RoundState::Playing { .. } => engine.submit(&line, now),
                RoundState::RoundOver { .. } if line.trim().is_empty() => engine.acknowledge(now),
                _ => Vec::new(),
            },
        };
        report(&events, out)?;
        recorder::dispatch(&events, sink);
    }
}

fn render_playing<O: Write>(engine: &SessionEngine, out: &mut O) -> io::Result<()> {
    let Some(sentence) = engine.current_sentence() else {
        return Ok(());
    };
    let (position, total) = engine.position().unwrap_or((0, 0));
    let recovery = if engine.is_recovery() { " (replay)" } else { "" };

    writeln!(out)?;
    writeln!(out, "pass {} · {position}/{total}{recovery}", engine.pass())?;
    writeln!(out, "  {}", sentence.translation())?;
    writeln!(out, "  {}", silhouette(&engine.words()))?;
    write!(out, "> ")
}

fn render_round_over<O: Write>(
    engine: &SessionEngine,
    success: bool,
    out: &mut O,
) -> io::Result<()> {
    let Some(sentence) = engine.current_sentence() else {
        return Ok(());
    };
    if success {
        writeln!(out, "correct: {}", sentence.text())?;
    } else {
        writeln!(out, "wrong: {}", sentence.text())?;
        if let Some(review) = engine.review() {
            writeln!(out, "  typed:    {}", bracket_mismatches(&review.input))?;
            writeln!(out, "  expected: {}", bracket_mismatches(&review.target))?;
        }
    }
    write!(out, "[enter] continue, {QUIT} quit ")
}

fn report<O: Write>(events: &[Event], out: &mut O) -> io::Result<()> {
    for event in events {
        match event {
            Event::PassStarted {
                recovery: true,
                sentences,
                ..
            } => writeln!(out, "\nreplaying {sentences} missed sentence(s)")?,
            Event::SessionMastered { passes, .. } => {
                writeln!(out, "\nall sentences mastered after {passes} pass(es)")?
            }
            Event::SessionCancelled { .. } => writeln!(out, "\nsession cancelled")?,
            _ => {}
        }
    }
    Ok(())
}

/// Words joined by spaces; clitics split off with `·` and the word being
/// guessed wrapped in `*`.
fn silhouette(words: &[WordView]) -> String {
    words
        .iter()
        .map(|view| {
            let mut text = String::new();
            for segment in &view.segments {
                if segment.kind == SegmentKind::Clitic {
                    text.push('·');
                }
                text.push_str(&segment.text);
            }
            if view.state == WordState::Current {
                format!("*{text}*")
            } else {
                text
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs of mismatched characters wrapped in `[ ]`.
fn bracket_mismatches(chars: &[Annotated]) -> String {
    let mut out = String::new();
    let mut open = false;
    for a in chars {
        if a.is_match() == open {
            out.push(if open { ']' } else { '[' });
            open = !open;
        }
        out.push(a.ch);
    }
    if open {
        out.push(']');
    }
    out
}
