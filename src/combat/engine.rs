//! Combat state machine: one-time missile phase, initiative-ordered firing
//! groups, batch attack resolution, and terminal classification. Trace types
//! live alongside the engine that emits them.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::combat::fleet::Player;
use crate::combat::rng::{DieRoller, Rng};
use crate::combat::ship::{AttackRoll, Ship};

/// Round ceiling. The only bounded-liveness guard against shield standoffs
/// where no roll can ever land a hit.
pub const ROUND_CAP: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceMode {
    Off,
    Events,
}

/// One structured combat event. `ship` is the ship the event concerns
/// (attack target, destroyed ship); batch resolution keeps no per-shot
/// source attribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombatEvent {
    pub event_type: String,
    pub round: u32,
    pub phase: String,
    pub ship: Option<u32>,
    pub values: Map<String, Value>,
}

impl CombatEvent {
    pub fn new(event_type: &str, round: u32, phase: &str) -> Self {
        Self {
            event_type: event_type.to_string(),
            round,
            phase: phase.to_string(),
            ship: None,
            values: Map::new(),
        }
    }

    pub fn with_ship(mut self, id: u32) -> Self {
        self.ship = Some(id);
        self
    }

    pub fn with_value(mut self, key: &str, value: Value) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }
}

/// Records events only when enabled, so trial runs pay nothing for tracing.
#[derive(Debug, Clone)]
pub struct TraceCollector {
    enabled: bool,
    events: Vec<CombatEvent>,
}

impl TraceCollector {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            events: Vec::new(),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// The builder closure only runs when tracing is enabled.
    pub fn record_with<F: FnOnce() -> CombatEvent>(&mut self, build: F) {
        if self.enabled {
            self.events.push(build());
        }
    }

    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<CombatEvent> {
        self.events
    }
}

pub fn serialize_events_json(events: &[CombatEvent]) -> Result<String, String> {
    serde_json::to_string_pretty(events)
        .map_err(|err| format!("failed to serialize combat events: {err}"))
}

#[derive(Debug, Clone, Copy)]
pub struct CombatConfig {
    pub round_cap: u32,
    pub seed: u64,
    pub trace_mode: TraceMode,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            round_cap: ROUND_CAP,
            seed: 0,
            trace_mode: TraceMode::Off,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatOutcome {
    DefenderVictory,
    AttackerVictory,
    Stalemate,
}

impl CombatOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CombatOutcome::DefenderVictory => "defender_victory",
            CombatOutcome::AttackerVictory => "attacker_victory",
            CombatOutcome::Stalemate => "stalemate",
        }
    }
}

impl std::fmt::Display for CombatOutcome {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Terminal state of one combat. `rounds` counts completed conventional
/// rounds; the surviving fleets are returned for survivor accounting.
#[derive(Debug, Clone)]
pub struct CombatResult {
    pub outcome: CombatOutcome,
    pub rounds: u32,
    pub defender: Player,
    pub attacker: Player,
    pub events: Vec<CombatEvent>,
}

/// Runs one full combat between clones of the given fleets, rolling dice
/// from a SplitMix64 stream seeded by `config.seed`.
pub fn simulate_combat(defender: &Player, attacker: &Player, config: CombatConfig) -> CombatResult {
    let mut rng = Rng::new(config.seed);
    simulate_combat_with_dice(defender, attacker, config, &mut rng)
}

/// Same as [`simulate_combat`] but with a caller-supplied die source;
/// `config.seed` is ignored.
pub fn simulate_combat_with_dice(
    defender: &Player,
    attacker: &Player,
    config: CombatConfig,
    dice: &mut dyn DieRoller,
) -> CombatResult {
    let mut defender = defender.clone();
    let mut attacker = attacker.clone();
    let mut trace = TraceCollector::new(config.trace_mode == TraceMode::Events);

    trace.record_with(|| CombatEvent::new("missile_phase", 0, "missile"));
    resolve_firing_pass(&mut defender, &mut attacker, true, 0, "missile", dice, &mut trace);

    // Missile exhaustion changes kill priority, so firers re-integrate and
    // both fleets re-sort before the round loop. Integration resets armor;
    // only ships that actually fired are touched.
    for ship in defender.fleet.iter_mut().chain(attacker.fleet.iter_mut()) {
        if ship.missiles_fired {
            ship.integrate();
        }
    }
    defender.sort_fleet();
    attacker.sort_fleet();

    let mut round = 1;
    let outcome = loop {
        if defender.fleet.is_empty() {
            break CombatOutcome::AttackerVictory;
        }
        if attacker.fleet.is_empty() {
            break CombatOutcome::DefenderVictory;
        }
        if round >= config.round_cap {
            break CombatOutcome::Stalemate;
        }
        trace.record_with(|| CombatEvent::new("round_start", round, "round"));
        resolve_firing_pass(&mut defender, &mut attacker, false, round, "round", dice, &mut trace);
        round += 1;
    };

    let rounds = round - 1;
    trace.record_with(|| {
        CombatEvent::new("combat_end", rounds, "end")
            .with_value("outcome", Value::from(outcome.as_str()))
            .with_value("rounds", Value::from(rounds))
    });

    CombatResult {
        outcome,
        rounds,
        defender,
        attacker,
        events: trace.into_events(),
    }
}

/// Queue entry for the merged firing sequence. Sorted ascending so the
/// highest-initiative group pops from the tail; `defending` is the secondary
/// key, which puts the defender's group after the attacker's at equal raw
/// initiative and therefore makes it fire first.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FiringEntry {
    ship_id: u32,
    defending: bool,
    initiative: f64,
}

fn build_firing_sequence(defender: &Player, attacker: &Player) -> Vec<FiringEntry> {
    let mut sequence: Vec<FiringEntry> = defender
        .fleet
        .iter()
        .chain(attacker.fleet.iter())
        .map(|ship| FiringEntry {
            ship_id: ship.id,
            defending: ship.defending,
            initiative: ship.stats.initiative,
        })
        .collect();
    sequence.sort_by(|a, b| {
        a.initiative
            .total_cmp(&b.initiative)
            .then(a.defending.cmp(&b.defending))
    });
    sequence
}

/// Pops the rear run of entries sharing (initiative, defending). Group
/// members always belong to one side, so their attacks form one batch.
fn pop_rear_group(sequence: &mut Vec<FiringEntry>) -> Vec<FiringEntry> {
    let Some(last) = sequence.last().copied() else {
        return Vec::new();
    };
    let mut start = sequence.len();
    while start > 0 {
        let entry = &sequence[start - 1];
        if entry.defending != last.defending || entry.initiative != last.initiative {
            break;
        }
        start -= 1;
    }
    sequence.split_off(start)
}

/// One full pass over the firing sequence: missile volleys when `missiles`,
/// otherwise conventional fire. Stops as soon as either fleet empties.
fn resolve_firing_pass(
    defender: &mut Player,
    attacker: &mut Player,
    missiles: bool,
    round: u32,
    phase: &str,
    dice: &mut dyn DieRoller,
    trace: &mut TraceCollector,
) {
    let mut sequence = build_firing_sequence(defender, attacker);
    while !sequence.is_empty() {
        if defender.fleet.is_empty() || attacker.fleet.is_empty() {
            break;
        }
        let group = pop_rear_group(&mut sequence);
        let group_defending = group[0].defending;

        let mut attacks: Vec<AttackRoll> = Vec::new();
        {
            let firing_fleet = if group_defending {
                &mut defender.fleet
            } else {
                &mut attacker.fleet
            };
            for entry in &group {
                // Ships destroyed by an earlier group are gone from the
                // fleet and simply skipped here.
                let Some(ship) = firing_fleet.iter_mut().find(|ship| ship.id == entry.ship_id)
                else {
                    continue;
                };
                let rolled = if missiles {
                    ship.roll_missile_attacks(dice)
                } else {
                    ship.roll_conventional_attacks(dice)
                };
                attacks.extend(rolled);
            }
        }

        let opposing_fleet = if group_defending {
            &mut attacker.fleet
        } else {
            &mut defender.fleet
        };
        apply_attacks(opposing_fleet, &attacks, round, phase, trace);
    }
}

/// Resolves a batch of simultaneous attacks against a fleet sorted by
/// descending kill priority.
fn apply_attacks(
    fleet: &mut Vec<Ship>,
    attacks: &[AttackRoll],
    round: u32,
    phase: &str,
    trace: &mut TraceCollector,
) {
    for attack in attacks {
        if fleet.is_empty() {
            break;
        }
        if attack.roll == 1 {
            trace.record_with(|| attack_event(attack, round, phase, "miss"));
            continue;
        }
        let effective = attack.roll as i32 + attack.hit_bonus;
        let target_index = if attack.roll == 6 {
            // Natural 6 always hits the current top-priority ship.
            Some(0)
        } else {
            fleet
                .iter()
                .position(|ship| effective - ship.stats.shield > 5)
        };
        let Some(index) = target_index else {
            trace.record_with(|| attack_event(attack, round, phase, "wasted"));
            continue;
        };

        let target = &mut fleet[index];
        target.stats.armor -= attack.damage;
        let target_id = target.id;
        let armor_left = target.stats.armor;
        trace.record_with(|| {
            attack_event(attack, round, phase, "hit")
                .with_ship(target_id)
                .with_value("armor_left", Value::from(armor_left))
        });
        if armor_left < 1 {
            let destroyed = fleet.remove(index);
            trace.record_with(|| {
                CombatEvent::new("ship_destroyed", round, phase)
                    .with_ship(destroyed.id)
                    .with_value("hull", Value::from(destroyed.hull.name.as_str()))
            });
        }
    }
}

fn attack_event(attack: &AttackRoll, round: u32, phase: &str, outcome: &str) -> CombatEvent {
    CombatEvent::new("attack_resolution", round, phase)
        .with_value("roll", Value::from(attack.roll))
        .with_value("hit_bonus", Value::from(attack.hit_bonus))
        .with_value("effective", Value::from(attack.roll as i32 + attack.hit_bonus))
        .with_value("damage", Value::from(attack.damage))
        .with_value("outcome", Value::from(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::rng::ScriptedDice;
    use crate::combat::ship::{Hull, Part, Ship};
    use std::sync::Arc;

    fn hull(name: &str, bonus_initiative: i32) -> Arc<Hull> {
        Arc::new(Hull {
            name: name.to_string(),
            nmax: 8,
            nslots: 4,
            bonus_power: 9,
            bonus_initiative,
            needs_drive: false,
            is_mobile: true,
            default_parts: Vec::new(),
        })
    }

    fn cannon(damage: i32) -> Arc<Part> {
        Arc::new(Part {
            name: "Cannon".to_string(),
            damage,
            nshots: 1,
            power: -1,
            is_weapon: true,
            ..Part::empty_slot()
        })
    }

    fn plating(armor: i32) -> Arc<Part> {
        Arc::new(Part {
            name: "Plating".to_string(),
            armor,
            ..Part::empty_slot()
        })
    }

    fn shielding(shield: i32) -> Arc<Part> {
        Arc::new(Part {
            name: "Shielding".to_string(),
            shield,
            ..Part::empty_slot()
        })
    }

    fn duel_players() -> (Player, Player) {
        // Defender: armor 5, damage 6, raw initiative 1 (+0.5 defending).
        // Attacker: armor 3, damage 3, initiative 1.
        let defender_ship = Ship::new(1, hull("Bulwark", 1), vec![cannon(6), plating(4)], true);
        let attacker_ship = Ship::new(2, hull("Raider", 1), vec![cannon(3), plating(2)], false);
        (
            Player::new(1, "Holder", vec![defender_ship], true),
            Player::new(2, "Invader", vec![attacker_ship], false),
        )
    }

    #[test]
    fn firing_sequence_orders_ascending_with_defender_after_attacker_on_ties() {
        let defender = Player::new(
            1,
            "Holder",
            vec![Ship::new(1, hull("Bulwark", 2), vec![cannon(1)], true)],
            true,
        );
        let attacker = Player::new(
            2,
            "Invader",
            vec![
                Ship::new(2, hull("Raider", 1), vec![cannon(1)], false),
                Ship::new(3, hull("Raider", 3), vec![cannon(1)], false),
            ],
            false,
        );
        let sequence = build_firing_sequence(&defender, &attacker);
        let ids: Vec<u32> = sequence.iter().map(|entry| entry.ship_id).collect();
        // Initiatives: ship 2 -> 1.0, ship 1 -> 2.5, ship 3 -> 3.0.
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn rear_group_pops_only_one_side() {
        let defender = Player::new(
            1,
            "Holder",
            vec![
                Ship::new(1, hull("Bulwark", 2), vec![cannon(1)], true),
                Ship::new(2, hull("Bulwark", 2), vec![cannon(1)], true),
            ],
            true,
        );
        let attacker = Player::new(
            2,
            "Invader",
            vec![Ship::new(3, hull("Raider", 2), vec![cannon(1)], false)],
            false,
        );
        let mut sequence = build_firing_sequence(&defender, &attacker);
        let first_group = pop_rear_group(&mut sequence);
        // Defender ships share initiative 2.5 and pop together; the
        // attacker's 2.0 group comes after.
        assert_eq!(first_group.len(), 2);
        assert!(first_group.iter().all(|entry| entry.defending));
        let second_group = pop_rear_group(&mut sequence);
        assert_eq!(second_group.len(), 1);
        assert!(!second_group[0].defending);
        assert!(sequence.is_empty());
    }

    #[test]
    fn duel_defender_auto_hit_wins_round_one() {
        let (defender, attacker) = duel_players();
        let mut dice = ScriptedDice::new(vec![6]);
        let result =
            simulate_combat_with_dice(&defender, &attacker, CombatConfig::default(), &mut dice);
        assert_eq!(result.outcome, CombatOutcome::DefenderVictory);
        assert_eq!(result.rounds, 1);
        assert!(result.attacker.fleet.is_empty());
        assert_eq!(result.defender.fleet.len(), 1);
    }

    #[test]
    fn roll_of_one_never_deals_damage() {
        let (defender, attacker) = duel_players();
        // Both sides roll 1 for three rounds, then the defender auto-hits.
        let mut dice = ScriptedDice::new(vec![1, 1, 1, 1, 1, 1, 6]);
        let result =
            simulate_combat_with_dice(&defender, &attacker, CombatConfig::default(), &mut dice);
        assert_eq!(result.outcome, CombatOutcome::DefenderVictory);
        assert_eq!(result.rounds, 4);
        assert_eq!(result.defender.fleet[0].stats.armor, 5);
    }

    #[test]
    fn shield_standoff_hits_round_cap() {
        let defender_ship =
            Ship::new(1, hull("Bulwark", 1), vec![cannon(1), shielding(6)], true);
        let attacker_ship =
            Ship::new(2, hull("Raider", 1), vec![cannon(1), shielding(6)], false);
        let defender = Player::new(1, "Holder", vec![defender_ship], true);
        let attacker = Player::new(2, "Invader", vec![attacker_ship], false);
        let config = CombatConfig {
            round_cap: 5,
            ..CombatConfig::default()
        };
        // Rolls of 2 can never beat shield 6 and never auto-hit.
        let mut dice = ScriptedDice::new(vec![2]);
        let result = simulate_combat_with_dice(&defender, &attacker, config, &mut dice);
        assert_eq!(result.outcome, CombatOutcome::Stalemate);
        assert_eq!(result.rounds, 4);
        assert_eq!(result.defender.fleet.len(), 1);
        assert_eq!(result.attacker.fleet.len(), 1);
    }

    #[test]
    fn natural_six_ignores_shields() {
        let defender_ship =
            Ship::new(1, hull("Bulwark", 1), vec![cannon(6), shielding(6)], true);
        let attacker_ship = Ship::new(2, hull("Raider", 1), vec![cannon(1)], false);
        let defender = Player::new(1, "Holder", vec![defender_ship], true);
        let attacker = Player::new(2, "Invader", vec![attacker_ship], false);
        let mut dice = ScriptedDice::new(vec![6]);
        let result =
            simulate_combat_with_dice(&defender, &attacker, CombatConfig::default(), &mut dice);
        assert_eq!(result.outcome, CombatOutcome::DefenderVictory);
    }

    #[test]
    fn identical_seeds_reproduce_event_streams() {
        let (defender, attacker) = duel_players();
        let config = CombatConfig {
            seed: 99,
            trace_mode: TraceMode::Events,
            ..CombatConfig::default()
        };
        let first = simulate_combat(&defender, &attacker, config);
        let second = simulate_combat(&defender, &attacker, config);
        assert_eq!(first.outcome, second.outcome);
        assert_eq!(first.rounds, second.rounds);
        assert_eq!(first.events, second.events);
        assert!(!first.events.is_empty());
    }

    #[test]
    fn trace_off_collects_no_events() {
        let (defender, attacker) = duel_players();
        let result = simulate_combat(&defender, &attacker, CombatConfig::default());
        assert!(result.events.is_empty());
    }

    #[test]
    fn events_serialize_to_json() {
        let (defender, attacker) = duel_players();
        let config = CombatConfig {
            trace_mode: TraceMode::Events,
            ..CombatConfig::default()
        };
        let result = simulate_combat(&defender, &attacker, config);
        let json = serialize_events_json(&result.events).unwrap();
        assert!(json.contains("combat_end"));
        assert!(json.contains("attack_resolution"));
    }
}
