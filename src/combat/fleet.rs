//! Player fleets and id issuance.

use std::collections::BTreeMap;

use crate::combat::ship::Ship;

/// One combatant: an ordered fleet of ships plus the defending role flag.
/// `Clone` produces a fully independent trial copy (ships own their mutable
/// state; only templates are shared).
#[derive(Debug, Clone)]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub fleet: Vec<Ship>,
    pub is_defending: bool,
}

impl Player {
    pub fn new(id: u32, name: impl Into<String>, fleet: Vec<Ship>, is_defending: bool) -> Self {
        let mut player = Self {
            id,
            name: name.into(),
            fleet,
            is_defending,
        };
        player.sort_fleet();
        player
    }

    /// Sorts the fleet descending by kill priority. Targeting relies on
    /// index 0 being the most dangerous live ship; the sort is stable so
    /// equal-priority ships keep their build order.
    pub fn sort_fleet(&mut self) {
        self.fleet
            .sort_by(|a, b| b.stats.kill_priority.total_cmp(&a.stats.kill_priority));
    }

    /// Surviving ship counts bucketed by hull name.
    pub fn hull_counts(&self) -> BTreeMap<String, u32> {
        let mut counts = BTreeMap::new();
        for ship in &self.fleet {
            *counts.entry(ship.hull.name.clone()).or_insert(0) += 1;
        }
        counts
    }
}

/// Issues ship and player ids. Owned by the fleet builder so id state never
/// lives in process-wide globals.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next_ship: u32,
    next_player: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_ship_id(&mut self) -> u32 {
        self.next_ship += 1;
        self.next_ship
    }

    pub fn next_player_id(&mut self) -> u32 {
        self.next_player += 1;
        self.next_player
    }
}
