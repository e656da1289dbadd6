use serde::{Deserialize, Serialize};

pub const LEADERBOARD_SIZE: usize = 5;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

impl ScoreEntry {
    pub fn new(name: impl Into<String>, score: u32) -> Self {
        ScoreEntry {
            name: name.into(),
            score,
        }
    }
}

/// Best scores, highest first. Equal scores keep the order they were recorded in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
}

fn rank(entries: &mut Vec<ScoreEntry>) {
    // `sort_by` is stable, so earlier entries win ties.
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(LEADERBOARD_SIZE);
}

impl Leaderboard {
    /// Entries as stored, without re-ranking.
    pub fn new(entries: Vec<ScoreEntry>) -> Self {
        Leaderboard { entries }
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn merge(&self, entry: ScoreEntry) -> Leaderboard {
        let mut entries = self.entries.clone();
        entries.push(entry);
        rank(&mut entries);
        Leaderboard { entries }
    }

    /// Ranked and capped view, for files that hold more than the top five.
    pub fn top(&self) -> Vec<ScoreEntry> {
        let mut entries = self.entries.clone();
        rank(&mut entries);
        entries
    }
}
