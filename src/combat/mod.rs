pub mod engine;
pub mod fleet;
pub mod rng;
pub mod ship;

pub use engine::{
    serialize_events_json, simulate_combat, simulate_combat_with_dice, CombatConfig, CombatEvent,
    CombatOutcome, CombatResult, TraceCollector, TraceMode, ROUND_CAP,
};
pub use fleet::{IdAllocator, Player};
pub use rng::{entropy_seed, DieRoller, Rng, ScriptedDice};
pub use ship::{AttackRoll, Hull, Part, Ship, ShipStats, EMPTY_SLOT_NAME};
