use std::env;

use crate::assembly::{parse_fleet_spec, FleetBuilder};
use crate::combat::engine::{simulate_combat, CombatConfig, TraceMode};
use crate::combat::fleet::Player;
use crate::combat::rng::entropy_seed;
use crate::combat::ship::{Hull, Ship};
use crate::data::catalog::Catalog;
use crate::data::hull::DEFAULT_HULLS_PATH;
use crate::data::part::DEFAULT_PARTS_PATH;
use crate::data::validate::validate_dataset;
use crate::parallel::batch::run_simulation_batches;
use crate::parallel::pool::WorkerPool;
use crate::sim::report::format_scoreboard;
use crate::sim::runner::run_simulations;

const DEFAULT_TRIALS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Simulate,
    Validate,
    List,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("simulate") => Some(Command::Simulate),
        Some("validate") => Some(Command::Validate),
        Some("list") => Some(Command::List),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Simulate) => handle_simulate(args),
        Some(Command::Validate) => handle_validate(args),
        Some(Command::List) => handle_list(),
        None => {
            eprintln!("usage: umbra <simulate|validate|list>");
            2
        }
    }
}

fn handle_simulate(args: &[String]) -> i32 {
    let as_json = args.iter().any(|arg| arg == "--json");
    let trace = args.iter().any(|arg| arg == "--trace");
    let threads_given = args.iter().any(|arg| arg == "--threads");
    let workers = match parse_flag_value(args, "--threads") {
        Some(value) => value.parse::<usize>().unwrap_or_else(|_| {
            eprintln!("invalid threads '{value}', defaulting to 0");
            0
        }),
        None => 0,
    };

    let positionals = positional_args(args);
    let (Some(defender_spec), Some(attacker_spec)) = (positionals.first(), positionals.get(1))
    else {
        eprintln!(
            "usage: umbra simulate <defender-fleet> <attacker-fleet> [trials] [seed] \
             [--threads N] [--json] [--trace]"
        );
        return 2;
    };
    let trials = parse_u32_arg(positionals.get(2).copied(), "trials", DEFAULT_TRIALS);
    let seed = parse_u64_arg(positionals.get(3).copied(), "seed", entropy_seed());

    let catalog = match load_catalog() {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("failed to load dataset: {err}");
            return 1;
        }
    };
    let (defender, attacker) = match assemble_matchup(&catalog, defender_spec, attacker_spec) {
        Ok(players) => players,
        Err(err) => {
            eprintln!("failed to assemble fleets: {err}");
            return 1;
        }
    };

    if trace {
        return print_traced_combat(&defender, &attacker, seed);
    }

    let outcome = if threads_given {
        let pool = WorkerPool::with_workers(workers);
        run_simulation_batches(&defender, &attacker, trials, seed, &pool)
    } else {
        run_simulations(&defender, &attacker, trials, seed)
    };
    let scoreboard = match outcome {
        Ok(scoreboard) => scoreboard,
        Err(err) => {
            eprintln!("simulation failed: {err}");
            return 1;
        }
    };

    if as_json {
        match serde_json::to_string_pretty(&scoreboard) {
            Ok(payload) => println!("{payload}"),
            Err(err) => {
                eprintln!("failed to serialize scoreboard: {err}");
                return 1;
            }
        }
    } else {
        print!("{}", format_scoreboard(&scoreboard));
    }

    0
}

fn print_traced_combat(defender: &Player, attacker: &Player, seed: u64) -> i32 {
    let config = CombatConfig {
        seed,
        trace_mode: TraceMode::Events,
        ..CombatConfig::default()
    };
    let result = simulate_combat(defender, attacker, config);
    let payload = serde_json::json!({
        "outcome": result.outcome,
        "rounds": result.rounds,
        "events": result.events,
    });
    match serde_json::to_string_pretty(&payload) {
        Ok(text) => {
            println!("{text}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize combat trace: {err}");
            1
        }
    }
}

fn handle_validate(args: &[String]) -> i32 {
    let (default_parts, default_hulls) = data_paths();
    let parts_path = args.get(2).map(String::as_str).unwrap_or(&default_parts);
    let hulls_path = args.get(3).map(String::as_str).unwrap_or(&default_hulls);

    match validate_dataset(parts_path, hulls_path) {
        Ok(report) => {
            if report.diagnostics.is_empty() {
                println!("validation passed: {parts_path}, {hulls_path}");
                return 0;
            }
            for diag in &report.diagnostics {
                println!("{} {}: {}", diag.severity, diag.context, diag.message);
            }
            if report.has_errors() {
                1
            } else {
                0
            }
        }
        Err(err) => {
            eprintln!("validation failed: {err}");
            1
        }
    }
}

fn handle_list() -> i32 {
    let catalog = match load_catalog() {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("failed to load dataset: {err}");
            return 1;
        }
    };

    println!("Hulls:");
    for hull in catalog.hulls() {
        println!("  {}", describe_hull(hull));
        let defaults: Vec<&str> = hull
            .default_parts
            .iter()
            .map(|part| part.name.as_str())
            .collect();
        println!("    defaults: {}", defaults.join(", "));
        let probe = Ship::new(0, hull.clone(), hull.default_parts.clone(), false);
        println!(
            "    baseline: damage {}, armor {}, shield {}, hit +{}, initiative {:.1}",
            probe.stats.net_damage,
            probe.stats.armor,
            probe.stats.shield,
            probe.stats.hit_bonus,
            probe.stats.initiative
        );
    }

    println!("Parts:");
    for part in catalog.parts() {
        let mut traits: Vec<String> = Vec::new();
        if part.is_weapon {
            traits.push(format!("damage {}x{}", part.damage, part.nshots));
        }
        if part.is_missile {
            traits.push("missile".to_string());
        }
        if part.armor != 0 {
            traits.push(format!("armor {:+}", part.armor));
        }
        if part.shield != 0 {
            traits.push(format!("shield {:+}", part.shield));
        }
        if part.hit_bonus != 0 {
            traits.push(format!("hit {:+}", part.hit_bonus));
        }
        if part.initiative != 0 {
            traits.push(format!("initiative {:+}", part.initiative));
        }
        if part.is_drive {
            traits.push("drive".to_string());
        }
        if part.power != 0 {
            traits.push(format!("power {:+}", part.power));
        }
        if part.is_ancient {
            traits.push("ancient".to_string());
        }
        if !part.is_available {
            traits.push("unavailable".to_string());
        }
        if traits.is_empty() {
            println!("  {}", part.name);
        } else {
            println!("  {}: {}", part.name, traits.join(", "));
        }
    }

    0
}

fn describe_hull(hull: &Hull) -> String {
    let mut text = format!("{} (slots {}, max {}", hull.name, hull.nslots, hull.nmax);
    if hull.needs_drive {
        text.push_str(", needs drive");
    }
    if !hull.is_mobile {
        text.push_str(", immobile");
    }
    text.push(')');
    text
}

fn assemble_matchup(
    catalog: &Catalog,
    defender_spec: &str,
    attacker_spec: &str,
) -> Result<(Player, Player), String> {
    let defender_entries = parse_fleet_spec(defender_spec)?;
    let attacker_entries = parse_fleet_spec(attacker_spec)?;
    let mut builder = FleetBuilder::new(catalog);
    let defender = builder.build_player(defender_spec, true, &defender_entries)?;
    let attacker = builder.build_player(attacker_spec, false, &attacker_entries)?;
    Ok((defender, attacker))
}

fn load_catalog() -> Result<Catalog, String> {
    let (parts_path, hulls_path) = data_paths();
    Catalog::load(&parts_path, &hulls_path)
}

/// Dataset locations, overridable by pointing UMBRA_DATA_DIR at a directory
/// holding parts.yaml and hulls.yaml.
fn data_paths() -> (String, String) {
    match env::var("UMBRA_DATA_DIR") {
        Ok(dir) => (format!("{dir}/parts.yaml"), format!("{dir}/hulls.yaml")),
        Err(_) => (
            DEFAULT_PARTS_PATH.to_string(),
            DEFAULT_HULLS_PATH.to_string(),
        ),
    }
}

/// Arguments after the subcommand that are neither flags nor flag values.
fn positional_args(args: &[String]) -> Vec<&String> {
    let mut positionals = Vec::new();
    let mut skip_next = false;
    for arg in args.iter().skip(2) {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg == "--threads" {
            skip_next = true;
            continue;
        }
        if arg.starts_with("--") {
            continue;
        }
        positionals.push(arg);
    }
    positionals
}

fn parse_flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a String> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|index| args.get(index + 1))
}

fn parse_u32_arg(raw: Option<&String>, name: &str, default: u32) -> u32 {
    raw.and_then(|value| value.parse::<u32>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                eprintln!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}

fn parse_u64_arg(raw: Option<&String>, name: &str, default: u64) -> u64 {
    raw.and_then(|value| value.parse::<u64>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                eprintln!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}
