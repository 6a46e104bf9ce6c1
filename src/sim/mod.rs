pub mod report;
pub mod runner;
pub mod scoreboard;

pub use report::{average_survivors, format_scoreboard, win_percentage};
pub use runner::{
    run_simulations, run_simulations_parallel, run_simulations_with_progress, MAX_TRIALS,
    MIN_TRIALS,
};
pub use scoreboard::Scoreboard;
