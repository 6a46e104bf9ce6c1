//! Monte Carlo trial runner: bounds and matchup validation, sequential and
//! parallel execution over independent fleet clones.

use rayon::prelude::*;

use crate::combat::engine::{simulate_combat, CombatConfig, CombatResult};
use crate::combat::fleet::Player;
use crate::parallel::batch::batch_ranges;
use crate::parallel::pool::WorkerPool;
use crate::sim::scoreboard::Scoreboard;

pub const MIN_TRIALS: u32 = 1;
pub const MAX_TRIALS: u32 = 10_000;

/// Number of progress-reporting batches for progress runs.
const PROGRESS_BATCH_COUNT: usize = 40;

/// Runs `trials` independent combats sequentially and aggregates outcomes.
pub fn run_simulations(
    defender: &Player,
    attacker: &Player,
    trials: u32,
    seed: u64,
) -> Result<Scoreboard, String> {
    run_simulations_with_parallelism(defender, attacker, trials, seed, false)
}

/// Parallel variant of [`run_simulations`] on the global rayon pool.
/// Identical results for identical inputs: per-trial seeds depend only on
/// the trial index, and outcomes fold in trial order.
pub fn run_simulations_parallel(
    defender: &Player,
    attacker: &Player,
    trials: u32,
    seed: u64,
) -> Result<Scoreboard, String> {
    run_simulations_with_parallelism(defender, attacker, trials, seed, true)
}

fn run_simulations_with_parallelism(
    defender: &Player,
    attacker: &Player,
    trials: u32,
    seed: u64,
    parallel: bool,
) -> Result<Scoreboard, String> {
    check_matchup(defender, attacker)?;
    check_trials(trials)?;

    let run_one = |trial: u32| simulate_combat(defender, attacker, trial_config(seed, trial));
    let results: Vec<CombatResult> = if parallel {
        (0..trials).into_par_iter().map(run_one).collect()
    } else {
        (0..trials).map(run_one).collect()
    };

    let mut scoreboard = Scoreboard::new(defender, attacker);
    for result in &results {
        scoreboard.record(result);
    }
    Ok(scoreboard)
}

/// Like [`run_simulations_parallel`] but runs on the given pool in batches
/// and invokes `on_progress(done, total)` after each batch. Trial indices
/// are global, so batching never shifts per-trial seeds.
pub fn run_simulations_with_progress<F>(
    defender: &Player,
    attacker: &Player,
    trials: u32,
    seed: u64,
    pool: &WorkerPool,
    mut on_progress: F,
) -> Result<Scoreboard, String>
where
    F: FnMut(u32, u32),
{
    check_matchup(defender, attacker)?;
    check_trials(trials)?;

    // Report total immediately so callers can show "0 / total" while the
    // first batch runs.
    on_progress(0, trials);

    let num_batches = PROGRESS_BATCH_COUNT.min(trials as usize);
    let ranges = batch_ranges(trials as usize, num_batches);
    let mut scoreboard = Scoreboard::new(defender, attacker);
    for (start, end) in ranges {
        let results: Vec<CombatResult> = pool.install(|| {
            (start..end)
                .into_par_iter()
                .map(|trial| simulate_combat(defender, attacker, trial_config(seed, trial as u32)))
                .collect()
        });
        for result in &results {
            scoreboard.record(result);
        }
        on_progress(end as u32, trials);
    }
    Ok(scoreboard)
}

fn trial_config(seed: u64, trial: u32) -> CombatConfig {
    CombatConfig {
        seed: seed.wrapping_add(u64::from(trial)),
        ..CombatConfig::default()
    }
}

fn check_trials(trials: u32) -> Result<(), String> {
    if !(MIN_TRIALS..=MAX_TRIALS).contains(&trials) {
        return Err(format!(
            "trial count {trials} outside supported range [{MIN_TRIALS}, {MAX_TRIALS}]"
        ));
    }
    Ok(())
}

/// Exactly two combatants, one of them defending. Both role flags must match
/// the positions the players are passed in.
fn check_matchup(defender: &Player, attacker: &Player) -> Result<(), String> {
    if !defender.is_defending {
        return Err(format!(
            "player '{}' passed as defender but not flagged as defending",
            defender.name
        ));
    }
    if attacker.is_defending {
        return Err(format!(
            "player '{}' passed as attacker but flagged as defending",
            attacker.name
        ));
    }
    Ok(())
}
