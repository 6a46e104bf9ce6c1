//! Ship templates and derived combat statistics. `Part` and `Hull` are
//! immutable templates shared behind `Arc`; all mutable combat state lives on
//! `Ship`.

use std::sync::Arc;

use crate::combat::rng::DieRoller;

/// Name of the all-zero filler part marking an unused slot.
pub const EMPTY_SLOT_NAME: &str = "Empty Slot";

/// Immutable part template. Power is signed: sources supply (positive),
/// consumers draw (negative). Initiative bonuses are whole points; only the
/// defender's tie-break carries a fractional component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub name: String,
    pub damage: i32,
    pub nshots: i32,
    pub power: i32,
    pub armor: i32,
    pub shield: i32,
    pub hit_bonus: i32,
    pub initiative: i32,
    pub is_weapon: bool,
    pub is_missile: bool,
    pub is_drive: bool,
    pub is_ancient: bool,
    pub is_available: bool,
}

impl Part {
    pub fn empty_slot() -> Self {
        Self {
            name: EMPTY_SLOT_NAME.to_string(),
            damage: 0,
            nshots: 0,
            power: 0,
            armor: 0,
            shield: 0,
            hit_bonus: 0,
            initiative: 0,
            is_weapon: false,
            is_missile: false,
            is_drive: false,
            is_ancient: false,
            is_available: true,
        }
    }

    pub fn is_empty_slot(&self) -> bool {
        self.name == EMPTY_SLOT_NAME
    }
}

/// Immutable hull template. `default_parts` doubles as the default loadout
/// and the ceiling on permitted empty slots for custom loadouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hull {
    pub name: String,
    pub nmax: u32,
    pub nslots: u32,
    pub bonus_power: i32,
    pub bonus_initiative: i32,
    pub needs_drive: bool,
    pub is_mobile: bool,
    pub default_parts: Vec<Arc<Part>>,
}

/// Stats derived from a ship's hull and equipped parts. Recomputed by
/// [`Ship::integrate`]; stale between part changes and the next integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipStats {
    pub net_damage: i32,
    pub net_power: i32,
    pub armor: i32,
    pub shield: i32,
    pub hit_bonus: i32,
    pub initiative: f64,
    pub has_drive: bool,
    pub has_weapon: bool,
    pub kill_priority: f64,
}

/// One combat unit. `Clone` is the sanctioned deep copy for trial isolation:
/// templates stay shared behind `Arc`, every mutable field is owned.
#[derive(Debug, Clone)]
pub struct Ship {
    pub id: u32,
    pub hull: Arc<Hull>,
    pub parts: Vec<Arc<Part>>,
    pub defending: bool,
    pub missiles_fired: bool,
    pub stats: ShipStats,
}

/// One shot's worth of attack: the raw d6 roll plus the firing ship's
/// modifiers at roll time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackRoll {
    pub roll: u32,
    pub hit_bonus: i32,
    pub damage: i32,
}

impl Ship {
    pub fn new(id: u32, hull: Arc<Hull>, parts: Vec<Arc<Part>>, defending: bool) -> Self {
        let mut ship = Self {
            id,
            hull,
            parts,
            defending,
            missiles_fired: false,
            stats: ShipStats {
                net_damage: 0,
                net_power: 0,
                armor: 1,
                shield: 0,
                hit_bonus: 0,
                initiative: 0.0,
                has_drive: false,
                has_weapon: false,
                kill_priority: 0.0,
            },
        };
        ship.integrate();
        ship
    }

    /// Recomputes every derived stat from the hull and equipped parts.
    ///
    /// Resets armor to its template baseline (`1 + part bonuses`), so calling
    /// this on a damaged ship heals it. The engine only integrates at
    /// construction and, for ships that fired missiles, at the end of the
    /// missile phase.
    pub fn integrate(&mut self) {
        let mut net_damage = 0;
        let mut net_power = self.hull.bonus_power;
        let mut armor = 1;
        let mut shield = 0;
        let mut hit_bonus = 0;
        let mut initiative_bonus = self.hull.bonus_initiative;
        let mut has_drive = false;

        for part in &self.parts {
            net_power += part.power;
            armor += part.armor;
            shield += part.shield;
            hit_bonus += part.hit_bonus;
            initiative_bonus += part.initiative;
            has_drive |= part.is_drive;
            if part.is_weapon {
                // Missile launchers stop counting once their one volley is spent.
                if !part.is_missile || !self.missiles_fired {
                    net_damage += part.damage * part.nshots;
                }
            }
        }

        let mut initiative = f64::from(initiative_bonus);
        if self.defending {
            initiative += 0.5;
        }

        let kill_priority =
            f64::from(net_damage) * (1.0 + f64::from(hit_bonus)) / 6.0 / f64::from(armor);

        self.stats = ShipStats {
            net_damage,
            net_power,
            armor,
            shield,
            hit_bonus,
            initiative,
            has_drive,
            has_weapon: net_damage > 0,
            kill_priority,
        };
    }

    /// Rolls one attack per shot of every non-missile weapon, in slot order.
    pub fn roll_conventional_attacks(&self, dice: &mut dyn DieRoller) -> Vec<AttackRoll> {
        if !self.stats.has_weapon {
            return Vec::new();
        }
        let mut attacks = Vec::new();
        for part in &self.parts {
            if !part.is_weapon || part.is_missile {
                continue;
            }
            for _ in 0..part.nshots {
                attacks.push(AttackRoll {
                    roll: dice.roll(),
                    hit_bonus: self.stats.hit_bonus,
                    damage: part.damage,
                });
            }
        }
        attacks
    }

    /// Rolls the one-time missile volley. Marks the ship as having fired only
    /// when it actually produced attacks. Stats are not recomputed here; the
    /// engine re-integrates missile-firers at the end of the missile phase.
    pub fn roll_missile_attacks(&mut self, dice: &mut dyn DieRoller) -> Vec<AttackRoll> {
        if self.missiles_fired || !self.stats.has_weapon {
            return Vec::new();
        }
        let mut attacks = Vec::new();
        for part in &self.parts {
            if !part.is_weapon || !part.is_missile {
                continue;
            }
            for _ in 0..part.nshots {
                attacks.push(AttackRoll {
                    roll: dice.roll(),
                    hit_bonus: self.stats.hit_bonus,
                    damage: part.damage,
                });
            }
        }
        if !attacks.is_empty() {
            self.missiles_fired = true;
        }
        attacks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::rng::ScriptedDice;

    fn weapon(name: &str, damage: i32, nshots: i32, power: i32) -> Arc<Part> {
        Arc::new(Part {
            name: name.to_string(),
            damage,
            nshots,
            power,
            is_weapon: true,
            ..Part::empty_slot()
        })
    }

    fn missile(name: &str, damage: i32, nshots: i32) -> Arc<Part> {
        Arc::new(Part {
            name: name.to_string(),
            damage,
            nshots,
            is_weapon: true,
            is_missile: true,
            ..Part::empty_slot()
        })
    }

    fn bare_hull(nslots: u32, bonus_power: i32, bonus_initiative: i32) -> Arc<Hull> {
        Arc::new(Hull {
            name: "Test Hull".to_string(),
            nmax: 8,
            nslots,
            bonus_power,
            bonus_initiative,
            needs_drive: false,
            is_mobile: true,
            default_parts: Vec::new(),
        })
    }

    #[test]
    fn integration_sums_part_contributions() {
        let armor_plate = Arc::new(Part {
            name: "Plating".to_string(),
            armor: 2,
            ..Part::empty_slot()
        });
        let computer = Arc::new(Part {
            name: "Computer".to_string(),
            hit_bonus: 1,
            power: -1,
            ..Part::empty_slot()
        });
        let ship = Ship::new(
            1,
            bare_hull(4, 3, 2),
            vec![weapon("Cannon", 2, 1, -1), armor_plate, computer],
            false,
        );
        assert_eq!(ship.stats.net_damage, 2);
        assert_eq!(ship.stats.net_power, 1);
        assert_eq!(ship.stats.armor, 3);
        assert_eq!(ship.stats.hit_bonus, 1);
        assert_eq!(ship.stats.initiative, 2.0);
        assert!(ship.stats.has_weapon);
        assert!(!ship.stats.has_drive);
    }

    #[test]
    fn defending_ship_gains_half_point_of_initiative() {
        let attacker = Ship::new(1, bare_hull(2, 0, 2), Vec::new(), false);
        let defender = Ship::new(2, bare_hull(2, 0, 2), Vec::new(), true);
        assert_eq!(attacker.stats.initiative, 2.0);
        assert_eq!(defender.stats.initiative, 2.5);
    }

    #[test]
    fn empty_slots_contribute_nothing() {
        let loaded = Ship::new(1, bare_hull(2, 1, 1), vec![Arc::new(Part::empty_slot())], false);
        let bare = Ship::new(2, bare_hull(2, 1, 1), Vec::new(), false);
        assert_eq!(loaded.stats, bare.stats);
    }

    #[test]
    fn kill_priority_rises_with_damage_and_falls_with_armor() {
        let light = Ship::new(1, bare_hull(4, 9, 0), vec![weapon("Cannon", 1, 1, -1)], false);
        let heavy = Ship::new(2, bare_hull(4, 9, 0), vec![weapon("Cannon", 4, 1, -4)], false);
        assert!(heavy.stats.kill_priority > light.stats.kill_priority);

        let plated = Arc::new(Part {
            name: "Plating".to_string(),
            armor: 2,
            ..Part::empty_slot()
        });
        let armored = Ship::new(
            3,
            bare_hull(4, 9, 0),
            vec![weapon("Cannon", 4, 1, -4), plated],
            false,
        );
        assert!(armored.stats.kill_priority < heavy.stats.kill_priority);
    }

    #[test]
    fn missile_damage_excluded_after_firing() {
        let mut ship = Ship::new(1, bare_hull(4, 2, 0), vec![missile("Launcher", 2, 2)], false);
        assert_eq!(ship.stats.net_damage, 4);
        assert!(ship.stats.has_weapon);

        let mut dice = ScriptedDice::new(vec![3]);
        let volley = ship.roll_missile_attacks(&mut dice);
        assert_eq!(volley.len(), 2);
        assert!(ship.missiles_fired);

        ship.integrate();
        assert_eq!(ship.stats.net_damage, 0);
        assert!(!ship.stats.has_weapon);
    }

    #[test]
    fn missile_volley_fires_at_most_once() {
        let mut ship = Ship::new(1, bare_hull(4, 2, 0), vec![missile("Launcher", 2, 1)], false);
        let mut dice = ScriptedDice::new(vec![4]);
        assert_eq!(ship.roll_missile_attacks(&mut dice).len(), 1);
        assert!(ship.roll_missile_attacks(&mut dice).is_empty());
    }

    #[test]
    fn ship_without_missiles_not_marked_fired() {
        let mut ship = Ship::new(1, bare_hull(4, 2, 0), vec![weapon("Cannon", 1, 1, -1)], false);
        let mut dice = ScriptedDice::new(vec![4]);
        assert!(ship.roll_missile_attacks(&mut dice).is_empty());
        assert!(!ship.missiles_fired);
    }

    #[test]
    fn conventional_attacks_follow_slot_order_and_shot_count() {
        let ship = Ship::new(
            1,
            bare_hull(4, 9, 0),
            vec![weapon("Twin Cannon", 1, 2, -1), weapon("Heavy Cannon", 4, 1, -4)],
            false,
        );
        let mut dice = ScriptedDice::new(vec![2, 3, 5]);
        let attacks = ship.roll_conventional_attacks(&mut dice);
        assert_eq!(attacks.len(), 3);
        assert_eq!(attacks[0], AttackRoll { roll: 2, hit_bonus: 0, damage: 1 });
        assert_eq!(attacks[1], AttackRoll { roll: 3, hit_bonus: 0, damage: 1 });
        assert_eq!(attacks[2], AttackRoll { roll: 5, hit_bonus: 0, damage: 4 });
    }

    #[test]
    fn clone_is_an_independent_copy() {
        let mut original = Ship::new(1, bare_hull(4, 2, 0), vec![missile("Launcher", 2, 1)], false);
        let copy = original.clone();
        let mut dice = ScriptedDice::new(vec![6]);
        original.roll_missile_attacks(&mut dice);
        original.stats.armor = 0;
        assert!(!copy.missiles_fired);
        assert_eq!(copy.stats.armor, 1);
    }
}
