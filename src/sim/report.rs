//! Report derivation: percentages, survivor averages, and the text summary
//! printed by the CLI.

use crate::sim::scoreboard::Scoreboard;

pub fn win_percentage(count: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    f64::from(count) * 100.0 / f64::from(total)
}

pub fn average_survivors(counts: &[u32]) -> f64 {
    if counts.is_empty() {
        return 0.0;
    }
    let sum: u64 = counts.iter().map(|&count| u64::from(count)).sum();
    sum as f64 / counts.len() as f64
}

/// Human-readable session summary. Survivor averages are per winning trial
/// of the respective side.
pub fn format_scoreboard(scoreboard: &Scoreboard) -> String {
    let total = scoreboard.total_trials();
    let mut out = String::new();

    out.push_str(&format!(
        "Defender {}: {} wins ({:.1}%)\n",
        scoreboard.defender_name,
        scoreboard.defender_wins,
        win_percentage(scoreboard.defender_wins, total)
    ));
    for (hull, counts) in &scoreboard.defender_survivors {
        out.push_str(&format!(
            "  {hull}: {:.2} ships surviving on average\n",
            average_survivors(counts)
        ));
    }

    out.push_str(&format!(
        "Attacker {}: {} wins ({:.1}%)\n",
        scoreboard.attacker_name,
        scoreboard.attacker_wins,
        win_percentage(scoreboard.attacker_wins, total)
    ));
    for (hull, counts) in &scoreboard.attacker_survivors {
        out.push_str(&format!(
            "  {hull}: {:.2} ships surviving on average\n",
            average_survivors(counts)
        ));
    }

    out.push_str(&format!(
        "Stalemates: {} ({:.1}%)\n",
        scoreboard.stalemates,
        win_percentage(scoreboard.stalemates, total)
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::fleet::Player;
    use crate::sim::scoreboard::Scoreboard;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn win_percentage_handles_zero_total() {
        assert_eq!(win_percentage(5, 0), 0.0);
        assert!(approx_eq(win_percentage(1, 3), 33.3333, 0.001));
    }

    #[test]
    fn average_survivors_handles_empty_list() {
        assert_eq!(average_survivors(&[]), 0.0);
        assert!(approx_eq(average_survivors(&[1, 2, 3]), 2.0, 1e-9));
    }

    #[test]
    fn formatted_report_names_both_sides_and_stalemates() {
        let defender = Player::new(1, "Holder", Vec::new(), true);
        let attacker = Player::new(2, "Invader", Vec::new(), false);
        let mut scoreboard = Scoreboard::new(&defender, &attacker);
        scoreboard.defender_wins = 3;
        scoreboard.attacker_wins = 1;
        scoreboard
            .defender_survivors
            .insert("Bulwark".to_string(), vec![2, 1, 0]);

        let report = format_scoreboard(&scoreboard);
        assert!(report.contains("Defender Holder: 3 wins (75.0%)"));
        assert!(report.contains("  Bulwark: 1.00 ships surviving on average"));
        assert!(report.contains("Attacker Invader: 1 wins (25.0%)"));
        assert!(report.contains("Stalemates: 0 (0.0%)"));
    }
}
