//! Outcome aggregation across trials. The scoreboard keeps raw counts and
//! survivor lists; percentages and averages belong to the report layer.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::combat::engine::{CombatOutcome, CombatResult};
use crate::combat::fleet::Player;

/// Running tallies for one simulation session. Survivor lists are keyed by
/// hull name, initialized from the template fleets so wiped hull types still
/// record zeros on every decisive win.
#[derive(Debug, Clone, Serialize)]
pub struct Scoreboard {
    pub defender_name: String,
    pub attacker_name: String,
    pub defender_wins: u32,
    pub attacker_wins: u32,
    pub stalemates: u32,
    pub defender_survivors: BTreeMap<String, Vec<u32>>,
    pub attacker_survivors: BTreeMap<String, Vec<u32>>,
}

impl Scoreboard {
    pub fn new(defender: &Player, attacker: &Player) -> Self {
        let empty_buckets = |player: &Player| {
            player
                .hull_counts()
                .into_keys()
                .map(|hull| (hull, Vec::new()))
                .collect()
        };
        Self {
            defender_name: defender.name.clone(),
            attacker_name: attacker.name.clone(),
            defender_wins: 0,
            attacker_wins: 0,
            stalemates: 0,
            defender_survivors: empty_buckets(defender),
            attacker_survivors: empty_buckets(attacker),
        }
    }

    /// Tallies one terminal combat. Survivor counts are recorded for the
    /// winning side only; stalemates record no survivors.
    pub fn record(&mut self, result: &CombatResult) {
        match result.outcome {
            CombatOutcome::DefenderVictory => {
                self.defender_wins += 1;
                push_survivors(&mut self.defender_survivors, &result.defender);
            }
            CombatOutcome::AttackerVictory => {
                self.attacker_wins += 1;
                push_survivors(&mut self.attacker_survivors, &result.attacker);
            }
            CombatOutcome::Stalemate => {
                self.stalemates += 1;
            }
        }
    }

    /// Folds another scoreboard for the same matchup into this one.
    pub fn merge(&mut self, other: Scoreboard) {
        self.defender_wins += other.defender_wins;
        self.attacker_wins += other.attacker_wins;
        self.stalemates += other.stalemates;
        for (hull, counts) in other.defender_survivors {
            self.defender_survivors.entry(hull).or_default().extend(counts);
        }
        for (hull, counts) in other.attacker_survivors {
            self.attacker_survivors.entry(hull).or_default().extend(counts);
        }
    }

    pub fn total_trials(&self) -> u32 {
        self.defender_wins + self.attacker_wins + self.stalemates
    }
}

fn push_survivors(buckets: &mut BTreeMap<String, Vec<u32>>, winner: &Player) {
    let counts = winner.hull_counts();
    for (hull, survivors) in buckets.iter_mut() {
        survivors.push(counts.get(hull).copied().unwrap_or(0));
    }
}
