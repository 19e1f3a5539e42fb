/// Session leaderboard: the best few scores, highest first.
///
/// Lives in memory only; nothing is written to disk.

const MAX_NAME_LEN: usize = 12;
const ANONYMOUS: &str = "anonymous";

#[derive(Clone, Debug, PartialEq)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
    pub level: u32,
}

#[derive(Clone, Debug)]
pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
    capacity: usize,
}

impl Leaderboard {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn best(&self) -> Option<&ScoreEntry> {
        self.entries.first()
    }

    /// Would `score` make it onto the board?  Ties with the last entry do not.
    pub fn qualifies(&self, score: u32) -> bool {
        self.entries.len() < self.capacity
            || self.entries.last().map_or(true, |last| score > last.score)
    }

    /// Record a finished run.  Returns the zero-based rank when the entry
    /// survives the cut.
    pub fn submit(&mut self, name: &str, score: u32, level: u32) -> Option<usize> {
        let name = normalize_name(name);
        // Older entries keep their place on equal scores.
        let rank = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        if rank >= self.capacity {
            log::debug!("{name} scored {score}, below the leaderboard cut");
            return None;
        }

        log::info!("{name} placed #{} with {score}", rank + 1);
        self.entries.insert(rank, ScoreEntry { name, score, level });
        self.entries.truncate(self.capacity);
        Some(rank)
    }
}

fn normalize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return ANONYMOUS.to_string();
    }
    trimmed.chars().take(MAX_NAME_LEN).collect()
}
