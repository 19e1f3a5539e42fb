/// All game entity types — pure data, plus the bounding-box helpers the
/// collision pass needs.

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Size of the play area in world units (one unit = one terminal cell).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Strict overlap: boxes that only touch along an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

// ── Status & input ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    /// Grid was wiped out; the next level is already laid out and play
    /// resumes once `ticks_left` reaches zero.
    LevelClear { ticks_left: u32 },
    GameOver,
}

/// Held controls for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Input {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    pub fn reversed(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BulletOwner {
    Player,
    Invader,
}

/// Cosmetic bullet tint, unlocked by level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BulletEffect {
    Normal,
    Cyan,
    Yellow,
    Purple,
}

impl BulletEffect {
    pub fn for_level(level: u32) -> BulletEffect {
        match level {
            26.. => BulletEffect::Purple,
            16..=25 => BulletEffect::Yellow,
            6..=15 => BulletEffect::Cyan,
            _ => BulletEffect::Normal,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Vertical velocity per tick (negative = upward).
    pub dy: f32,
    pub owner: BulletOwner,
    /// Only player bullets carry an effect.
    pub effect: Option<BulletEffect>,
}

impl Bullet {
    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

// ── Player & invaders ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Invader {
    pub column: u32,
    pub row: u32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub alive: bool,
}

impl Invader {
    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// Rows × columns of the current invader batch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridShape {
    pub rows: u32,
    pub cols: u32,
}

impl GridShape {
    pub fn len(&self) -> usize {
        (self.rows * self.cols) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    /// Player and invader bullets in flight.
    pub bullets: Vec<Bullet>,
    /// Stored column-major; collision resolution follows this order.
    pub invaders: Vec<Invader>,
    pub grid: GridShape,
    pub direction: Direction,
    /// Horizontal grid step per tick.
    pub invader_speed: f32,
    pub score: u32,
    pub level: u32,
    pub status: GameStatus,
    /// Ticks until the player may fire again.
    pub fire_cooldown: u32,
    pub frame: u64,
    pub bounds: Bounds,
}

impl GameState {
    pub fn live_invaders(&self) -> usize {
        self.invaders.iter().filter(|i| i.alive).count()
    }

    pub fn player_bullets(&self) -> usize {
        self.bullets
            .iter()
            .filter(|b| b.owner == BulletOwner::Player)
            .count()
    }

    pub fn invader_bullets(&self) -> usize {
        self.bullets
            .iter()
            .filter(|b| b.owner == BulletOwner::Invader)
            .count()
    }
}
