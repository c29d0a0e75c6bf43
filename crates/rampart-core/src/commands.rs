//! Player commands sent from the frontend to the simulation.
//!
//! Commands are queued and processed at the next tick boundary, so anything
//! they depend on (currency, node occupancy) is re-checked at that point.

use serde::{Deserialize, Serialize};

use crate::enums::TowerKind;

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Start the loaded level: the wave spawner begins its schedule.
    StartLevel,
    /// Build a tower on one of the level's build nodes.
    BuildTower { node: usize, kind: TowerKind },
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
    /// Set time scale (1.0 = normal, 2.0 = double, 0.0 = frozen).
    SetTimeScale { scale: f64 },
}
