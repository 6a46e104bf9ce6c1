//! Run the trial runner once sequentially and once in parallel, then print
//! timings and speedup.
//!
//! Usage: cargo run --release --bin benchmark_speedup

use std::time::Instant;

use umbra::assembly::{parse_fleet_spec, FleetBuilder};
use umbra::combat::fleet::Player;
use umbra::data::catalog::Catalog;
use umbra::data::hull::HullRecord;
use umbra::data::part::PartRecord;
use umbra::sim::runner::{run_simulations, run_simulations_parallel};

/// Self-contained catalog so the benchmark runs from any directory.
fn demo_catalog() -> Catalog {
    let parts = vec![
        PartRecord {
            name: "Ion Cannon".to_string(),
            damage: 1,
            shots: 1,
            power: -1,
            weapon: true,
            ..PartRecord::default()
        },
        PartRecord {
            name: "Plasma Missile".to_string(),
            damage: 2,
            shots: 2,
            weapon: true,
            missile: true,
            ..PartRecord::default()
        },
        PartRecord {
            name: "Hull".to_string(),
            armor: 1,
            ..PartRecord::default()
        },
        PartRecord {
            name: "Electron Computer".to_string(),
            hit_bonus: 1,
            ..PartRecord::default()
        },
        PartRecord {
            name: "Nuclear Source".to_string(),
            power: 3,
            ..PartRecord::default()
        },
        PartRecord {
            name: "Nuclear Drive".to_string(),
            power: -1,
            initiative: 1,
            drive: true,
            ..PartRecord::default()
        },
    ];
    let hulls = vec![
        HullRecord {
            name: "Interceptor".to_string(),
            max_count: 8,
            slots: 4,
            bonus_initiative: 2,
            needs_drive: true,
            default_parts: vec![
                "Ion Cannon".to_string(),
                "Nuclear Source".to_string(),
                "Nuclear Drive".to_string(),
                "Empty Slot".to_string(),
            ],
            ..HullRecord::default()
        },
        HullRecord {
            name: "Cruiser".to_string(),
            max_count: 4,
            slots: 6,
            bonus_initiative: 1,
            needs_drive: true,
            default_parts: vec![
                "Ion Cannon".to_string(),
                "Hull".to_string(),
                "Electron Computer".to_string(),
                "Nuclear Source".to_string(),
                "Nuclear Drive".to_string(),
                "Empty Slot".to_string(),
            ],
            ..HullRecord::default()
        },
        HullRecord {
            name: "Starbase".to_string(),
            max_count: 4,
            slots: 5,
            bonus_power: 3,
            bonus_initiative: 4,
            mobile: false,
            default_parts: vec![
                "Ion Cannon".to_string(),
                "Hull".to_string(),
                "Hull".to_string(),
                "Electron Computer".to_string(),
                "Empty Slot".to_string(),
            ],
            ..HullRecord::default()
        },
    ];
    Catalog::from_records(&parts, &hulls).expect("demo catalog")
}

fn matchup(catalog: &Catalog) -> (Player, Player) {
    let mut builder = FleetBuilder::new(catalog);
    let defender_spec = parse_fleet_spec("starbase:2,interceptor:4").expect("defender spec");
    let attacker_spec = parse_fleet_spec("cruiser:3,interceptor:4").expect("attacker spec");
    let defender = builder
        .build_player("Holder", true, &defender_spec)
        .expect("defender fleet");
    let attacker = builder
        .build_player("Invader", false, &attacker_spec)
        .expect("attacker fleet");
    (defender, attacker)
}

fn main() {
    let seed = 12345u64;
    let trials = 10_000u32;
    let catalog = demo_catalog();
    let (defender, attacker) = matchup(&catalog);

    println!(
        "Monte Carlo: {} trials ({} ships vs {} ships)",
        trials,
        defender.fleet.len(),
        attacker.fleet.len()
    );
    println!();

    // Sequential
    let t0 = Instant::now();
    let results_seq = run_simulations(&defender, &attacker, trials, seed).expect("sequential run");
    let elapsed_seq = t0.elapsed();
    let seq_ms = elapsed_seq.as_secs_f64() * 1000.0;
    println!(
        "Sequential:  {:.2} ms  ({:.1} sims/s)",
        seq_ms,
        f64::from(trials) / elapsed_seq.as_secs_f64()
    );

    // Parallel
    let t0 = Instant::now();
    let results_par =
        run_simulations_parallel(&defender, &attacker, trials, seed).expect("parallel run");
    let elapsed_par = t0.elapsed();
    let par_ms = elapsed_par.as_secs_f64() * 1000.0;
    println!(
        "Parallel:    {:.2} ms  ({:.1} sims/s)",
        par_ms,
        f64::from(trials) / elapsed_par.as_secs_f64()
    );

    let speedup = seq_ms / par_ms;
    println!();
    println!("Speedup:     {:.2}x faster (parallel vs sequential)", speedup);

    assert_eq!(results_seq.defender_wins, results_par.defender_wins);
    assert_eq!(results_seq.attacker_wins, results_par.attacker_wins);
    assert_eq!(results_seq.stalemates, results_par.stalemates);
    assert_eq!(results_seq.defender_survivors, results_par.defender_survivors);
    assert_eq!(results_seq.attacker_survivors, results_par.attacker_survivors);
    println!("(Results match sequential vs parallel)");
}
