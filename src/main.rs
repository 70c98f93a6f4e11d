//! Terminal runner (default binary).
//!
//! Reads configuration, sets up file logging, then drives a session: tick,
//! render, poll input until the next frame is due.

use std::fs::{self, File};
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tracing_subscriber::EnvFilter;

use blockfall::core::{AudioSink, FrameLoop, GameSnapshot, Session};
use blockfall::input::{handle_key_event, should_quit, NameEntry, NameEntryOutcome};
use blockfall::store::FileStore;
use blockfall::term::{BellAudio, FrameBuffer, GameView, HudView, TerminalRenderer, Viewport};
use blockfall::types::GameAction;
use blockfall::{Cli, Config};

type GameSession = Session<FileStore, BellAudio>;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env().with_cli(&cli);
    init_logging(&config);
    tracing::info!(data_dir = ?config.data_dir, tick_ms = config.tick_ms, "starting");

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &config);

    // Always try to restore terminal state.
    let _ = term.exit();
    if let Err(err) = &result {
        tracing::error!(%err, "exited with error");
    }
    result
}

/// Log to `<data_dir>/blockfall.log`; never to the terminal being drawn on.
fn init_logging(config: &Config) {
    let writer: Box<dyn Write + Send> = match fs::create_dir_all(&config.data_dir)
        .and_then(|()| File::create(config.log_path()))
    {
        Ok(file) => Box::new(file),
        Err(_) => Box::new(io::sink()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(writer))
        .with_ansi(false)
        .init();
}

fn unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Front-end state that is not part of the game
struct Ui {
    name_entry: Option<NameEntry>,
    message: Option<&'static str>,
}

fn run(term: &mut TerminalRenderer, config: &Config) -> Result<()> {
    let clock = Instant::now();
    let now_ms = || clock.elapsed().as_millis() as u64;

    let seed = config.seed.unwrap_or_else(unix_ms);
    let store = FileStore::new(&config.data_dir);
    let audio = BellAudio::stdout(config.muted);
    let mut session: GameSession = Session::new(seed, store, audio);
    session.start(now_ms());
    tracing::info!(seed = session.game().seed(), "session ready");

    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = GameSnapshot::default();
    let mut frames = FrameLoop::new();
    let mut ui = Ui {
        name_entry: None,
        message: None,
    };

    let frame_period = Duration::from_millis(u64::from(config.tick_ms));
    let mut last_frame = Instant::now();

    loop {
        if last_frame.elapsed() >= frame_period {
            last_frame = Instant::now();
            session.tick(now_ms());

            if ui.name_entry.is_none() && session.pending_high_score().is_some() {
                ui.name_entry = Some(NameEntry::new());
            }

            if !frames.is_stopped() {
                session.snapshot_into(&mut snap);
                let hud = HudView {
                    high_scores: session.high_scores().entries(),
                    name_prompt: ui.name_entry.as_ref().map(NameEntry::as_str),
                    muted: session.audio().is_muted(),
                    message: ui.message,
                };
                let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
                view.render_into(&snap, &hud, Viewport::new(w, h), &mut fb);
                term.present(&mut fb, &mut frames, snap.game_over())?;
            }
        }

        // Input with timeout until next frame.
        let timeout = frame_period
            .checked_sub(last_frame.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));
        if !event::poll(timeout)? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                if ui.name_entry.is_some() {
                    handle_name_key(&mut session, &mut ui, key);
                    frames.rearm();
                    continue;
                }
                if should_quit(key) {
                    return Ok(());
                }
                if let Some(action) = handle_key_event(key) {
                    handle_action(&mut session, &mut ui, &mut frames, action, now_ms());
                }
            }
            Event::Resize(_, _) => term.on_resize(&mut frames),
            _ => {}
        }
    }
}

fn handle_name_key(session: &mut GameSession, ui: &mut Ui, key: KeyEvent) {
    let Some(entry) = ui.name_entry.as_mut() else {
        return;
    };
    match entry.handle_key(key) {
        NameEntryOutcome::Editing => {}
        NameEntryOutcome::Submit => {
            if session.submit_high_score(entry.as_str(), unix_ms()).is_some() {
                ui.name_entry = None;
                ui.message = Some("Score saved");
            }
        }
        NameEntryOutcome::Cancel => {
            session.dismiss_high_score();
            ui.name_entry = None;
        }
    }
}

fn handle_action(
    session: &mut GameSession,
    ui: &mut Ui,
    frames: &mut FrameLoop,
    action: GameAction,
    now: u64,
) {
    let changed = session.apply(action, now);
    match action {
        GameAction::Save => {
            ui.message = Some(if changed { "Game saved" } else { "Nothing to save" });
        }
        GameAction::Load => {
            ui.message = Some(if changed { "Game loaded" } else { "No saved game" });
        }
        GameAction::ToggleMute => {
            ui.message = Some(if session.audio().is_muted() { "Muted" } else { "Sound on" });
        }
        GameAction::Restart => {
            ui.message = None;
            ui.name_entry = None;
        }
        _ => {}
    }
    // A stopped loop still draws one frame so the change is visible.
    frames.rearm();
}
