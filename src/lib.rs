//! Monte Carlo simulator for two-party fleet combat in a turn-based 4X
//! board game: assemble validated fleets from a parts/hulls dataset, run
//! many independent combat trials, and aggregate win and survivor
//! statistics.

pub mod assembly;
pub mod cli;
pub mod combat;
pub mod data;
pub mod parallel;
pub mod sim;
