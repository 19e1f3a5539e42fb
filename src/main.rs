mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use invaders::compute::{init_state, restart, tick};
use invaders::config::GameConfig;
use invaders::entities::{GameState, GameStatus, Input};
use invaders::error::GameError;
use invaders::leaderboard::Leaderboard;

use display::Overlay;

/// Smallest terminal the board fits in.
const MIN_WIDTH: u16 = 40;
const MIN_HEIGHT: u16 = 16;

/// Longest name accepted on the leaderboard.
const NAME_LIMIT: usize = 12;

/// A key is considered "held" if its last press/repeat event arrived within
/// this window.  Covers terminals that don't emit key-release events: the
/// OS key-repeat rate is ≥ 15 Hz, so ≈133 ms is always refreshed before
/// expiry.
const HOLD_WINDOW: Duration = Duration::from_millis(133);

#[derive(Parser)]
#[command(name = "invaders")]
#[command(about = "Terminal invader shooter: sweep-and-drop grid, levels, leaderboard")]
struct Args {
    /// TOML file overriding gameplay tunables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for invader fire; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Where log records go (the terminal is busy drawing the game)
    #[arg(long, default_value = "invaders.log")]
    log_file: PathBuf,
}

/// Returns true if `key` was seen within the last `HOLD_WINDOW`.
fn is_held(key_seen: &HashMap<KeyCode, Instant>, key: &KeyCode, now: Instant) -> bool {
    key_seen
        .get(key)
        .map(|&last| now.saturating_duration_since(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn held_input(key_seen: &HashMap<KeyCode, Instant>, now: Instant) -> Input {
    let any = |keys: &[KeyCode]| keys.iter().any(|k| is_held(key_seen, k, now));
    Input {
        left: any(&[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')]),
        right: any(&[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')]),
        fire: any(&[KeyCode::Char(' ')]),
    }
}

fn init_logging(path: &Path) -> Result<(), GameError> {
    let file = File::create(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    leaderboard: &Leaderboard,
) -> Result<MenuResult, GameError> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "★  INVADERS  ★";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    for (i, (line, color)) in display::leaderboard_lines(leaderboard).iter().enumerate() {
        out.queue(cursor::MoveTo(
            cx.saturating_sub(line.chars().count() as u16 / 2),
            cy.saturating_sub(4) + i as u16,
        ))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(line))?;
    }

    let start = "ENTER : Start   Q : Quit";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(start.chars().count() as u16 / 2),
        cy + 2,
    ))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(start))?;

    let controls = "← → / A D : Move   SPACE : Shoot";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(controls.chars().count() as u16 / 2),
        cy + 4,
    ))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print(controls))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                modifiers,
                ..
            })) => match code {
                KeyCode::Enter | KeyCode::Char(' ') => return Ok(MenuResult::Start),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            },
            Ok(_) => {}
            // Input thread is gone; nothing more will arrive.
            Err(_) => return Ok(MenuResult::Quit),
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum Outcome {
    Quit,
    Restart,
    Menu,
}

/// High-score name entry after a game over.
enum NameEntry {
    Inactive,
    Typing(String),
    Done,
}

/// Runs one game until the player quits, restarts or returns to the menu.
///
/// Input model: instead of acting on each key event individually, we keep
/// a `key_seen` map with the instant of the last press/repeat event for
/// every key.  Each tick we check which keys are still "fresh" (within
/// `HOLD_WINDOW`) and hand them to the simulation together, so Space and a
/// direction can be held at the same time.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (Ghostty, kitty, etc.): proper
///   `Press` / `Repeat` / `Release` events → keys are removed on release.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows as
///   repeated `Press`).  Keys expire naturally after `HOLD_WINDOW` of
///   silence.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    rng: &mut StdRng,
    leaderboard: &mut Leaderboard,
) -> Result<Outcome, GameError> {
    let frame_time = Duration::from_millis(config.tick_ms);
    let mut key_seen: HashMap<KeyCode, Instant> = HashMap::new();
    let mut entry = NameEntry::Inactive;

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_seen.insert(code, frame_start);
                    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
                        return Ok(Outcome::Quit);
                    }
                    let mut entry_finished = false;
                    match &mut entry {
                        NameEntry::Typing(name) => match code {
                            KeyCode::Char(c) if !c.is_control() => {
                                if name.chars().count() < NAME_LIMIT {
                                    name.push(c);
                                }
                            }
                            KeyCode::Backspace => {
                                name.pop();
                            }
                            KeyCode::Enter => {
                                leaderboard.submit(name, state.score, state.level);
                                entry_finished = true;
                            }
                            KeyCode::Esc => entry_finished = true,
                            _ => {}
                        },
                        NameEntry::Done => match code {
                            KeyCode::Char('r') | KeyCode::Char('R') => return Ok(Outcome::Restart),
                            KeyCode::Char('m') | KeyCode::Char('M') => return Ok(Outcome::Menu),
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(Outcome::Quit);
                            }
                            _ => {}
                        },
                        NameEntry::Inactive => {
                            if matches!(
                                code,
                                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
                            ) {
                                return Ok(Outcome::Quit);
                            }
                        }
                    }
                    if entry_finished {
                        entry = NameEntry::Done;
                    }
                }
                // Repeat: refresh timestamp so key stays "held"
                KeyEventKind::Repeat => {
                    key_seen.insert(code, frame_start);
                }
                // Release: remove key immediately (keyboard-enhancement path)
                KeyEventKind::Release => {
                    key_seen.remove(&code);
                }
            }
        }

        // ── Advance the simulation; it stops for good on game over ───────────
        if state.status != GameStatus::GameOver {
            let input = held_input(&key_seen, frame_start);
            *state = tick(state, &input, config, rng);

            if state.status == GameStatus::GameOver {
                entry = if leaderboard.qualifies(state.score) {
                    NameEntry::Typing(String::new())
                } else {
                    NameEntry::Done
                };
            }
        }

        let overlay = Overlay {
            leaderboard,
            name_entry: match &entry {
                NameEntry::Typing(name) => Some(name.as_str()),
                _ => None,
            },
        };
        display::render(out, state, &overlay)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), GameError> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let mut rng = match args.seed {
        Some(seed) => {
            log::info!("using seed {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let (width, height) = terminal::size()?;
    if width < MIN_WIDTH || height < MIN_HEIGHT {
        return Err(GameError::TerminalTooSmall {
            width,
            height,
            min_width: MIN_WIDTH,
            min_height: MIN_HEIGHT,
        });
    }

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, &config, &mut rng);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        log::error!("{e}");
    }
    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    rng: &mut StdRng,
) -> Result<(), GameError> {
    let mut leaderboard = Leaderboard::new(config.leaderboard_size);

    loop {
        match show_menu(out, rx, &leaderboard)? {
            MenuResult::Quit => break,
            MenuResult::Start => {
                let (width, height) = terminal::size()?;
                let bounds = display::bounds_for(width, height);
                let mut state = init_state(config, bounds);

                loop {
                    match game_loop(out, &mut state, rx, config, rng, &mut leaderboard)? {
                        Outcome::Quit => return Ok(()),
                        Outcome::Restart => {
                            let (width, height) = terminal::size()?;
                            state = restart(config, display::bounds_for(width, height));
                        }
                        Outcome::Menu => break,
                    }
                }
            }
        }
    }
    Ok(())
}
