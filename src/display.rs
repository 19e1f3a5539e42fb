/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// world coordinates into terminal cells and queues draw commands.
///
/// Screen layout:
///   row 0          HUD
///   row 1          top border
///   rows 2..h-2    play area (world y = 0 is row 2, world x = 0 is col 1)
///   row h-2        bottom border
///   row h-1        controls hint

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use invaders::entities::{Bounds, Bullet, BulletEffect, BulletOwner, GameState, GameStatus, Invader};
use invaders::leaderboard::Leaderboard;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LEVEL: Color = Color::Cyan;
const C_HUD_BEST: Color = Color::DarkYellow;
const C_PLAYER: Color = Color::White;
const C_INVADER_ROWS: [Color; 3] = [Color::Green, Color::Cyan, Color::Magenta];
const C_BULLET_INVADER: Color = Color::Green;
const C_HINT: Color = Color::DarkGrey;

/// Cells taken by the HUD, borders and hint row around the play area.
pub const CHROME_COLS: u16 = 2;
pub const CHROME_ROWS: u16 = 4;

/// Play-area bounds for a terminal of the given size.
pub fn bounds_for(width: u16, height: u16) -> Bounds {
    Bounds {
        width: width.saturating_sub(CHROME_COLS) as f32,
        height: height.saturating_sub(CHROME_ROWS) as f32,
    }
}

/// Extra screens drawn on top of the board.
pub struct Overlay<'a> {
    pub leaderboard: &'a Leaderboard,
    /// Name typed so far while the player is entering a high score.
    pub name_entry: Option<&'a str>,
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, state: &GameState, overlay: &Overlay) -> std::io::Result<()> {
    let (width, height) = screen_size(&state.bounds);
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height)?;
    draw_hud(out, state, overlay.leaderboard, width)?;

    for invader in state.invaders.iter().filter(|i| i.alive) {
        draw_invader(out, invader, state.frame)?;
    }
    for bullet in &state.bullets {
        draw_bullet(out, bullet)?;
    }

    draw_player(out, state)?;
    draw_controls_hint(out, height)?;

    match state.status {
        GameStatus::LevelClear { .. } => draw_level_banner(out, state, width, height)?,
        GameStatus::GameOver => draw_game_over(out, state, overlay, width, height)?,
        GameStatus::Playing => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

fn screen_size(bounds: &Bounds) -> (u16, u16) {
    (
        bounds.width as u16 + CHROME_COLS,
        bounds.height as u16 + CHROME_ROWS,
    )
}

/// World position → terminal cell.
fn cell(x: f32, y: f32) -> (u16, u16) {
    (1 + x.round().max(0.0) as u16, 2 + y.round().max(0.0) as u16)
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1 — top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2 — bottom bar
    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    state: &GameState,
    leaderboard: &Leaderboard,
    width: u16,
) -> std::io::Result<()> {
    // Score — left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}", state.score)))?;

    // Level — centre
    let level_str = format!("[ LEVEL {} ]", state.level);
    let lx = (width / 2).saturating_sub(level_str.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(&level_str))?;

    // Best — right
    let best = leaderboard.best().map_or(0, |e| e.score).max(state.score);
    let best_str = format!("Best:{:>6}", best);
    let rx = width.saturating_sub(best_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_BEST))?;
    out.queue(Print(&best_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

/// `/=^=\` scaled to the ship width.
fn player_sprite(width: usize) -> String {
    match width {
        0 => String::new(),
        1 => "^".to_string(),
        _ => (0..width)
            .map(|i| match i {
                0 => '/',
                i if i == width - 1 => '\\',
                i if i == width / 2 => '^',
                _ => '=',
            })
            .collect(),
    }
}

fn draw_player<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let p = &state.player;
    let (col, row) = cell(p.x, p.y);
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(Print(player_sprite(p.width.round() as usize)))?;
    Ok(())
}

fn draw_invader<W: Write>(out: &mut W, invader: &Invader, frame: u64) -> std::io::Result<()> {
    // Two-frame wiggle:  «▼»  /  »▼«
    let (left, right) = if (frame / 20) % 2 == 0 { ('«', '»') } else { ('»', '«') };
    let width = invader.width.round().max(1.0) as usize;
    let sprite: String = match width {
        1 => "▼".to_string(),
        _ => (0..width)
            .map(|i| match i {
                0 => left,
                i if i == width - 1 => right,
                _ => '▼',
            })
            .collect(),
    };

    let (col, row) = cell(invader.x, invader.y);
    let color = C_INVADER_ROWS[invader.row as usize % C_INVADER_ROWS.len()];
    out.queue(style::SetForegroundColor(color))?;
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(Print(sprite))?;
    Ok(())
}

fn effect_color(effect: Option<BulletEffect>) -> Color {
    match effect {
        Some(BulletEffect::Normal) | None => Color::Red,
        Some(BulletEffect::Cyan) => Color::Cyan,
        Some(BulletEffect::Yellow) => Color::Yellow,
        Some(BulletEffect::Purple) => Color::Magenta,
    }
}

fn draw_bullet<W: Write>(out: &mut W, bullet: &Bullet) -> std::io::Result<()> {
    let (col, row) = cell(bullet.x, bullet.y);
    out.queue(cursor::MoveTo(col, row))?;
    match bullet.owner {
        BulletOwner::Player => {
            out.queue(style::SetForegroundColor(effect_color(bullet.effect)))?;
            out.queue(Print("║"))?;
        }
        BulletOwner::Invader => {
            out.queue(style::SetForegroundColor(C_BULLET_INVADER))?;
            out.queue(Print("↓"))?;
        }
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE : Shoot   Q : Quit"))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_centered<W: Write>(
    out: &mut W,
    lines: &[(String, Color)],
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }
    Ok(())
}

fn draw_level_banner<W: Write>(
    out: &mut W,
    state: &GameState,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let lines = [
        (format!("★  LEVEL {}  ★", state.level), Color::Yellow),
        (
            format!("{} x {} incoming", state.grid.rows, state.grid.cols),
            Color::DarkGrey,
        ),
    ];
    draw_centered(out, &lines, width, height)
}

/// Leaderboard lines, shared by the game-over overlay and the menu.
pub fn leaderboard_lines(leaderboard: &Leaderboard) -> Vec<(String, Color)> {
    let mut lines = vec![("─ Leaderboard ─".to_string(), Color::Cyan)];
    if leaderboard.entries().is_empty() {
        lines.push(("no scores yet".to_string(), Color::DarkGrey));
    }
    for (i, entry) in leaderboard.entries().iter().enumerate() {
        lines.push((
            format!(
                "{}. {:<12} {:>6}  L{}",
                i + 1,
                entry.name,
                entry.score,
                entry.level
            ),
            Color::White,
        ));
    }
    lines
}

fn draw_game_over<W: Write>(
    out: &mut W,
    state: &GameState,
    overlay: &Overlay,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let mut lines = vec![
        ("╔════════════════════╗".to_string(), Color::Red),
        ("║    GAME  OVER      ║".to_string(), Color::Red),
        ("╚════════════════════╝".to_string(), Color::Red),
        (format!("Level: {}", state.level), Color::White),
        (format!("Final Score: {:>6}", state.score), Color::Yellow),
        (String::new(), Color::Reset),
    ];

    match overlay.name_entry {
        Some(name) => {
            lines.push(("★ NEW HIGH SCORE ★".to_string(), Color::Yellow));
            lines.push((format!("Name: {name}_"), Color::White));
            lines.push(("ENTER - Save   ESC - Skip".to_string(), Color::DarkGrey));
        }
        None => {
            lines.extend(leaderboard_lines(overlay.leaderboard));
            lines.push((String::new(), Color::Reset));
            lines.push((
                "R - Play Again   M - Menu   Q - Quit".to_string(),
                Color::White,
            ));
        }
    }

    draw_centered(out, &lines, width, height)
}
