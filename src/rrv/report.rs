// The round-by-round text report.

use reweighted_voting::{format_decimal, VotingResult};

/// Number of fractional digits of the totals in the report.
const DISPLAY_PLACES: u32 = 3;

pub fn render_report(rs: &VotingResult) -> String {
    let mut out = String::new();
    for round_stat in rs.round_stats.iter() {
        let totals: Vec<String> = round_stat
            .tally
            .iter()
            .map(|(name, total)| format!("{} {}", name, format_decimal(total, DISPLAY_PLACES)))
            .collect();
        out.push_str(&format!("Round {}\n", round_stat.round));
        out.push_str(&format!("Totals: {}\n", totals.join(", ")));
        out.push_str(&format!("Next winner: {}\n", round_stat.elected));
    }
    out.push_str(&format!("Elected: {:?}\n", rs.elected));
    out.push_str(&format!("Winners: {}\n", rs.winners.join(", ")));
    out
}
