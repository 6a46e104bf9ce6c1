//! Combat engine throughput benchmarks: combats per second for duels,
//! fleet battles, and missile-heavy openings.
//!
//! Run with: `cargo bench --bench combat`

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use umbra::combat::engine::{simulate_combat, CombatConfig};
use umbra::combat::fleet::Player;
use umbra::combat::ship::{Hull, Part, Ship};

fn hull(name: &str, nslots: u32, bonus_initiative: i32) -> Arc<Hull> {
    Arc::new(Hull {
        name: name.to_string(),
        nmax: 8,
        nslots,
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

fn missile_launcher() -> Arc<Part> {
    Arc::new(Part {
        name: "Launcher".to_string(),
        damage: 2,
        nshots: 2,
        is_weapon: true,
        is_missile: true,
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

fn duel() -> (Player, Player) {
    let defender_ship = Ship::new(1, hull("Bulwark", 4, 1), vec![cannon(2), plating(2)], true);
    let attacker_ship = Ship::new(2, hull("Raider", 4, 1), vec![cannon(2), plating(1)], false);
    (
        Player::new(1, "Holder", vec![defender_ship], true),
        Player::new(2, "Invader", vec![attacker_ship], false),
    )
}

fn fleet_battle() -> (Player, Player) {
    let mut next_id = 0u32;
    let mut ship = |slots: u32, initiative: i32, parts: Vec<Arc<Part>>, defending: bool| {
        next_id += 1;
        Ship::new(next_id, hull("Warship", slots, initiative), parts, defending)
    };
    let defenders = vec![
        ship(6, 4, vec![cannon(2), plating(3)], true),
        ship(4, 2, vec![cannon(1), plating(1)], true),
        ship(4, 2, vec![cannon(1), plating(1)], true),
        ship(4, 2, vec![cannon(1)], true),
    ];
    let attackers = vec![
        ship(6, 1, vec![cannon(2), cannon(2), plating(2)], false),
        ship(6, 1, vec![cannon(2), plating(2)], false),
        ship(4, 2, vec![cannon(1), plating(1)], false),
        ship(4, 2, vec![cannon(1)], false),
    ];
    (
        Player::new(1, "Holder", defenders, true),
        Player::new(2, "Invader", attackers, false),
    )
}

fn missile_opening() -> (Player, Player) {
    let mut next_id = 0u32;
    let mut ship = |parts: Vec<Arc<Part>>, defending: bool| {
        next_id += 1;
        Ship::new(next_id, hull("Volley", 4, 2), parts, defending)
    };
    let defenders = vec![
        ship(vec![cannon(1), plating(2)], true),
        ship(vec![cannon(1), plating(2)], true),
    ];
    let attackers = vec![
        ship(vec![missile_launcher(), cannon(1)], false),
        ship(vec![missile_launcher(), cannon(1)], false),
        ship(vec![missile_launcher()], false),
    ];
    (
        Player::new(1, "Holder", defenders, true),
        Player::new(2, "Invader", attackers, false),
    )
}

fn bench_combat(c: &mut Criterion) {
    let config = CombatConfig {
        seed: 7,
        ..CombatConfig::default()
    };

    let mut group = c.benchmark_group("combat");
    group.sample_size(100);
    group.throughput(Throughput::Elements(1));

    let (duel_defender, duel_attacker) = duel();
    group.bench_function("duel", |b| {
        b.iter(|| black_box(simulate_combat(&duel_defender, &duel_attacker, config)));
    });

    let (battle_defender, battle_attacker) = fleet_battle();
    group.bench_function("fleet_battle", |b| {
        b.iter(|| black_box(simulate_combat(&battle_defender, &battle_attacker, config)));
    });

    let (volley_defender, volley_attacker) = missile_opening();
    group.bench_function("missile_opening", |b| {
        b.iter(|| black_box(simulate_combat(&volley_defender, &volley_attacker, config)));
    });

    group.finish();
}

criterion_group!(benches, bench_combat);
criterion_main!(benches);
