//! Star rating and level unlock progression.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_UNLOCKABLE_LEVEL, ONE_STAR_HEALTH_FRACTION, TWO_STAR_HEALTH_FRACTION};

/// Stars earned for finishing a level with `remaining` of `initial` health.
pub fn star_rating(remaining: i32, initial: i32) -> u8 {
    if remaining <= 0 {
        return 0;
    }
    if initial <= 0 {
        return 3;
    }
    let fraction = remaining as f32 / initial as f32;
    if fraction <= ONE_STAR_HEALTH_FRACTION {
        1
    } else if fraction <= TWO_STAR_HEALTH_FRACTION {
        2
    } else {
        3
    }
}

/// Which levels are unlocked and the best star count per level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub max_unlocked_level: u32,
    pub level_stars: BTreeMap<u32, u8>,
}

impl Default for LevelProgress {
    fn default() -> Self {
        Self {
            max_unlocked_level: 1,
            level_stars: BTreeMap::new(),
        }
    }
}

impl LevelProgress {
    pub fn is_unlocked(&self, level: u32) -> bool {
        level <= self.max_unlocked_level
    }

    pub fn stars(&self, level: u32) -> u8 {
        self.level_stars.get(&level).copied().unwrap_or(0)
    }

    /// Fold a finished run into the progress. Returns the newly unlocked
    /// level, if any.
    pub fn record_result(&mut self, level: u32, victory: bool, stars: u8) -> Option<u32> {
        if !victory {
            return None;
        }
        let best = self.level_stars.entry(level).or_insert(0);
        *best = (*best).max(stars);

        let next = level + 1;
        if stars >= 1 && next <= MAX_UNLOCKABLE_LEVEL && next > self.max_unlocked_level {
            self.max_unlocked_level = next;
            return Some(next);
        }
        None
    }
}
