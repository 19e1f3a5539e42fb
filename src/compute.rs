/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, the config and an RNG handle) and returns a
/// brand-new `GameState`.  Side effects are limited to the injected RNG and
/// log records.

use rand::Rng;

use crate::config::{GameConfig, InvaderConfig};
use crate::entities::{
    Bounds, Bullet, BulletEffect, BulletOwner, Direction, GameState, GameStatus, GridShape, Input,
    Invader, Player,
};

/// Score awarded per invader destroyed.
pub const SCORE_PER_INVADER: u32 = 10;

// ── Difficulty tables ────────────────────────────────────────────────────────

/// Horizontal grid step per tick for `level`, capped at `max_speed`.
pub fn invader_speed_for(level: u32, config: &InvaderConfig) -> f32 {
    let grown = config.speed_step * level.saturating_sub(1) as f32;
    (config.base_speed + grown).min(config.max_speed)
}

/// Grid size for `level`: one extra column per level and one extra row every
/// second level, capped by the config and by how many columns fit `bounds`.
pub fn grid_shape_for(level: u32, config: &InvaderConfig, bounds: &Bounds) -> GridShape {
    let grown = level.saturating_sub(1);
    let cols = config
        .base_cols
        .saturating_add(grown)
        .min(config.max_cols)
        .min(cols_that_fit(config, bounds));
    let rows = config.base_rows.saturating_add(grown / 2).min(config.max_rows);
    GridShape { rows, cols }
}

fn cols_that_fit(config: &InvaderConfig, bounds: &Bounds) -> u32 {
    let pitch = config.width + config.padding;
    let usable = bounds.width - config.offset_left + config.padding;
    (usable / pitch).floor().max(1.0) as u32
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Lay out a fresh grid, column-major, starting at the configured offsets.
pub fn create_invaders(shape: GridShape, config: &InvaderConfig) -> Vec<Invader> {
    let mut invaders = Vec::with_capacity(shape.len());
    for column in 0..shape.cols {
        for row in 0..shape.rows {
            invaders.push(Invader {
                column,
                row,
                x: column as f32 * (config.width + config.padding) + config.offset_left,
                y: row as f32 * (config.height + config.padding) + config.offset_top,
                width: config.width,
                height: config.height,
                alive: true,
            });
        }
    }
    invaders
}

/// Build the level-1 state for the given play area.
pub fn init_state(config: &GameConfig, bounds: Bounds) -> GameState {
    let level = 1;
    let grid = grid_shape_for(level, &config.invaders, &bounds);
    let player = Player {
        x: ((bounds.width - config.player.width) / 2.0).floor().max(0.0),
        y: (bounds.height - config.player.height).max(0.0),
        width: config.player.width,
        height: config.player.height,
        speed: config.player.speed,
    };

    GameState {
        player,
        bullets: Vec::new(),
        invaders: create_invaders(grid, &config.invaders),
        grid,
        direction: Direction::Right,
        invader_speed: invader_speed_for(level, &config.invaders),
        score: 0,
        level,
        status: GameStatus::Playing,
        fire_cooldown: 0,
        frame: 0,
        bounds,
    }
}

/// Throw away the current run and start over from level 1.
pub fn restart(config: &GameConfig, bounds: Bounds) -> GameState {
    log::info!("restarting at level 1");
    init_state(config, bounds)
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Apply held left/right for one tick, clamped to `[0, width - player.width]`.
/// Holding both directions cancels out.
pub fn move_player(state: &GameState, input: &Input) -> GameState {
    let mut dx = 0.0;
    if input.left {
        dx -= state.player.speed;
    }
    if input.right {
        dx += state.player.speed;
    }
    let max_x = (state.bounds.width - state.player.width).max(0.0);
    let new_x = (state.player.x + dx).clamp(0.0, max_x);
    GameState {
        player: Player {
            x: new_x,
            ..state.player.clone()
        },
        ..state.clone()
    }
}

/// Fire a bullet from the player, subject to the cooldown and the on-screen cap.
pub fn player_shoot(state: &GameState, config: &GameConfig) -> GameState {
    if state.status != GameStatus::Playing
        || state.fire_cooldown > 0
        || state.player_bullets() >= config.bullets.max_player_bullets
    {
        return state.clone();
    }
    let bc = &config.bullets;
    let new_bullet = Bullet {
        x: state.player.x + (state.player.width - bc.width) / 2.0,
        y: state.player.y - bc.height,
        width: bc.width,
        height: bc.height,
        dy: -bc.player_speed,
        owner: BulletOwner::Player,
        effect: Some(BulletEffect::for_level(state.level)),
    };
    let mut bullets = state.bullets.clone();
    bullets.push(new_bullet);
    GameState {
        bullets,
        fire_cooldown: bc.fire_cooldown_ticks,
        ..state.clone()
    }
}

// ── Per-tick update (nearly pure — RNG is injected) ─────────────────────────

/// Advance the simulation by one tick.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
pub fn tick(
    state: &GameState,
    input: &Input,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> GameState {
    match state.status {
        GameStatus::GameOver => return state.clone(),
        GameStatus::LevelClear { ticks_left } => {
            let status = if ticks_left <= 1 {
                GameStatus::Playing
            } else {
                GameStatus::LevelClear {
                    ticks_left: ticks_left - 1,
                }
            };
            return GameState {
                status,
                frame: state.frame + 1,
                ..state.clone()
            };
        }
        GameStatus::Playing => {}
    }

    // ── 1. Player ────────────────────────────────────────────────────────────
    let mut next = move_player(state, input);
    next.frame += 1;
    next.fire_cooldown = next.fire_cooldown.saturating_sub(1);
    if input.fire {
        next = player_shoot(&next, config);
    }

    // ── 2. Bullets ───────────────────────────────────────────────────────────
    next.bullets = advance_bullets(&next.bullets, &next.bounds);

    // ── 3. Invader grid ──────────────────────────────────────────────────────
    advance_grid(&mut next, config.invaders.drop_step);
    invaders_fire(&mut next, config, rng);

    // ── 4. Collisions ────────────────────────────────────────────────────────
    next = detect_collisions(&next);

    // ── 5. Progression ───────────────────────────────────────────────────────
    if player_is_hit(&next) {
        log::info!(
            "game over at level {} with score {} (frame {})",
            next.level,
            next.score,
            next.frame
        );
        next.status = GameStatus::GameOver;
        return next;
    }
    if next.live_invaders() == 0 {
        return advance_level(&next, config);
    }

    log::trace!(
        "frame {}: {} invaders, {} bullets",
        next.frame,
        next.live_invaders(),
        next.bullets.len()
    );
    next
}

/// Move every bullet by its velocity and drop the ones that left the play area.
pub fn advance_bullets(bullets: &[Bullet], bounds: &Bounds) -> Vec<Bullet> {
    bullets
        .iter()
        .map(|b| Bullet {
            y: b.y + b.dy,
            ..b.clone()
        })
        .filter(|b| match b.owner {
            BulletOwner::Player => b.y >= 0.0,
            BulletOwner::Invader => b.y <= bounds.height,
        })
        .collect()
}

/// Sweep the grid sideways; when any live invader would cross an edge the
/// whole grid descends by `drop_step` and reverses instead.
fn advance_grid(state: &mut GameState, drop_step: f32) {
    let dx = state.invader_speed * state.direction.sign();
    let width = state.bounds.width;
    let hits_edge = state
        .invaders
        .iter()
        .filter(|i| i.alive)
        .any(|i| i.x + dx < 0.0 || i.x + dx > width - i.width);

    if hits_edge {
        state.direction = state.direction.reversed();
        for invader in &mut state.invaders {
            invader.y += drop_step;
        }
    } else {
        for invader in &mut state.invaders {
            invader.x += dx;
        }
    }
}

/// With probability `fire_chance`, the lowest live invader of a random
/// column drops a bullet.
fn invaders_fire(state: &mut GameState, config: &GameConfig, rng: &mut impl Rng) {
    if state.invader_bullets() >= config.bullets.max_invader_bullets {
        return;
    }
    if !rng.gen_bool(config.invaders.fire_chance) {
        return;
    }

    let mut lowest: Vec<Option<usize>> = vec![None; state.grid.cols as usize];
    for (idx, invader) in state.invaders.iter().enumerate() {
        if !invader.alive {
            continue;
        }
        let column = invader.column as usize;
        if column >= lowest.len() {
            continue;
        }
        let replace = match lowest[column] {
            Some(current) => invader.y > state.invaders[current].y,
            None => true,
        };
        if replace {
            lowest[column] = Some(idx);
        }
    }
    let shooters: Vec<usize> = lowest.into_iter().flatten().collect();
    if shooters.is_empty() {
        return;
    }

    let shooter = &state.invaders[shooters[rng.gen_range(0..shooters.len())]];
    let bc = &config.bullets;
    let bullet = Bullet {
        x: shooter.x + (shooter.width - bc.width) / 2.0,
        y: shooter.y + shooter.height,
        width: bc.width,
        height: bc.height,
        dy: bc.invader_speed,
        owner: BulletOwner::Invader,
        effect: None,
    };
    state.bullets.push(bullet);
}

/// Player bullets against live invaders.  Each bullet kills at most one
/// invader: the first overlapping one in grid order.
pub fn detect_collisions(state: &GameState) -> GameState {
    let mut invaders = state.invaders.clone();
    let mut bullets = Vec::with_capacity(state.bullets.len());
    let mut score = state.score;

    for bullet in &state.bullets {
        if bullet.owner == BulletOwner::Player {
            let rect = bullet.rect();
            if let Some(hit) = invaders
                .iter_mut()
                .find(|inv| inv.alive && inv.rect().overlaps(&rect))
            {
                hit.alive = false;
                score += SCORE_PER_INVADER;
                continue;
            }
        }
        bullets.push(bullet.clone());
    }

    GameState {
        invaders,
        bullets,
        score,
        ..state.clone()
    }
}

/// True when a live invader has reached the player's row or an invader
/// bullet overlaps the ship.
pub fn player_is_hit(state: &GameState) -> bool {
    let player = state.player.rect();
    let invader_landed = state
        .invaders
        .iter()
        .any(|i| i.alive && i.y + i.height >= player.y);
    let shot_down = state
        .bullets
        .iter()
        .any(|b| b.owner == BulletOwner::Invader && b.rect().overlaps(&player));
    invader_landed || shot_down
}

/// Enter the next level: bump the counter, grow the grid and speed within
/// their caps, and lay out a fresh grid.
pub fn advance_level(state: &GameState, config: &GameConfig) -> GameState {
    let level = state.level + 1;
    let grid = grid_shape_for(level, &config.invaders, &state.bounds);
    let invader_speed = invader_speed_for(level, &config.invaders);
    log::info!(
        "level {} cleared with score {}; next grid {}x{} at speed {:.2}",
        state.level,
        state.score,
        grid.rows,
        grid.cols,
        invader_speed
    );

    let status = if config.level_clear_ticks == 0 {
        GameStatus::Playing
    } else {
        GameStatus::LevelClear {
            ticks_left: config.level_clear_ticks,
        }
    };

    GameState {
        bullets: Vec::new(),
        invaders: create_invaders(grid, &config.invaders),
        grid,
        direction: Direction::Right,
        invader_speed,
        level,
        status,
        fire_cooldown: 0,
        ..state.clone()
    }
}
