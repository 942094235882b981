//! Interactive observation loop.
//!
//! This is the presentation collaborator for the session engine: it reads
//! line commands from stdin, drives the engine, and runs the 1 Hz tick. The
//! ticker exists only while the session is active -- it is created on start
//! and dropped on stop, so no tick fires (or queues up) while inactive. Tick
//! and user input are serialized through a single `select!` task, which is
//! the engine's single mutation path.

use std::time::Duration;

use chrono::FixedOffset;
use chronos_core::{report, Config, EngagementLevel, SessionEngine};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

enum Flow {
    Continue,
    Quit,
}

pub fn run(subject: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let taxonomy = config.taxonomy()?;
    let subject = subject
        .or_else(|| config.subjects.first().cloned())
        .unwrap_or_else(|| "國文".to_string());
    let offset = config.report_offset();

    let engine = SessionEngine::with_system_clock(taxonomy);
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(observe_loop(engine, subject, offset))
}

async fn observe_loop(
    mut engine: SessionEngine,
    subject: String,
    offset: FixedOffset,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("observing 「{subject}」 -- type 'help' for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker: Option<Interval> = None;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match handle_line(&mut engine, line.trim(), &subject, offset)? {
                    Flow::Continue => {}
                    Flow::Quit => break,
                }
                ticker = reconcile_ticker(ticker, engine.is_active());
            }
            _ = next_tick(&mut ticker) => {
                engine.tick();
                if engine.session().idle {
                    eprintln!("(idle: no activity for 5 minutes)");
                }
            }
        }
    }
    Ok(())
}

/// Keep the ticker's lifetime tied to the active state. A fresh interval
/// starts one second out, so restarting never replays missed ticks.
fn reconcile_ticker(ticker: Option<Interval>, active: bool) -> Option<Interval> {
    match (ticker, active) {
        (None, true) => {
            let period = Duration::from_secs(1);
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            Some(interval)
        }
        (_, false) => None,
        (ticker, true) => ticker,
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

fn handle_line(
    engine: &mut SessionEngine,
    line: &str,
    subject: &str,
    offset: FixedOffset,
) -> Result<Flow, Box<dyn std::error::Error>> {
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "" => {}
        "help" => print_help(engine),
        "start" => {
            if engine.start() {
                println!("session started");
            } else {
                println!("already active");
            }
        }
        "stop" => {
            if engine.stop() {
                println!("{}", report::render(engine.session(), engine.taxonomy(), subject, offset));
            } else {
                println!("not active");
            }
        }
        "mode" => match engine.taxonomy().mode_id(rest) {
            Some(id) => {
                engine.toggle_mode(id);
                print_selection(engine);
            }
            None => eprintln!("unknown mode: {rest}"),
        },
        "tap" => match engine.taxonomy().action_id(rest) {
            Some(id) => {
                if !engine.record_action(id) {
                    println!("not active");
                }
            }
            None => eprintln!("unknown action: {rest}"),
        },
        "hold" => match engine.taxonomy().action_id(rest) {
            Some(id) => {
                engine.toggle_action_timing(id);
                print_selection(engine);
            }
            None => eprintln!("unknown action: {rest}"),
        },
        "eng" => match EngagementLevel::parse(rest) {
            Some(level) => {
                engine.set_engagement(level);
            }
            None => eprintln!("engagement must be low, mid or high"),
        },
        "note" => {
            if !engine.add_note(rest) {
                println!("dropped (inactive session or empty note)");
            }
        }
        "status" => {
            println!("{}", serde_json::to_string_pretty(engine.session())?);
        }
        "report" => {
            println!("{}", report::render(engine.session(), engine.taxonomy(), subject, offset));
        }
        "save" => {
            if rest.is_empty() {
                eprintln!("usage: save <path>");
            } else {
                let text = report::render(engine.session(), engine.taxonomy(), subject, offset);
                report::write_with_bom(std::path::Path::new(rest), &text)?;
                println!("saved {rest}");
            }
        }
        "reset" => {
            engine.reset();
            println!("fresh session");
        }
        "quit" | "exit" => return Ok(Flow::Quit),
        other => eprintln!("unknown command: {other} (try 'help')"),
    }
    Ok(Flow::Continue)
}

fn print_selection(engine: &SessionEngine) {
    let session = engine.session();
    let mode = session
        .current_mode
        .map(|id| engine.taxonomy().mode(id).label.as_str())
        .unwrap_or("-");
    let timing = session
        .current_timed_action
        .map(|id| engine.taxonomy().action(id).label.as_str())
        .unwrap_or("-");
    println!("mode: {mode} | timing: {timing}");
}

fn print_help(engine: &SessionEngine) {
    let modes: Vec<_> = engine.taxonomy().modes().map(|(_, m)| m.key.as_str()).collect();
    let actions: Vec<_> = engine.taxonomy().actions().map(|(_, a)| a.key.as_str()).collect();
    println!("commands:");
    println!("  start | stop | reset | status | report | save <path> | quit");
    println!("  mode <key>       toggle a teaching mode ({})", modes.join(", "));
    println!("  tap <key>        count an action ({})", actions.join(", "));
    println!("  hold <key>       toggle action timing");
    println!("  eng <low|mid|high>");
    println!("  note <text>");
}
