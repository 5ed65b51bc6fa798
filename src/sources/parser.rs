//! Parsers for the mining client's text output
//!
//! `ore rewards` prints one `<difficulty>: <reward> ORE` line per level.
//! `ore balance` and `ore config` print `Label: <amount> ORE` lines. Lines
//! that do not fit the expected shape are skipped.

use log::debug;

use super::SourceError;
use crate::model::{Difficulty, RewardTable};

/// Label of the miner's stake in `ore balance`
pub const STAKE_LABEL: &str = "Stake:";

/// Label of the top stake in `ore config`
pub const TOP_STAKE_LABEL: &str = "Top stake:";

/// Parse `ore rewards` output into a reward table
pub fn parse_reward_table(output: &str) -> RewardTable {
    output
        .lines()
        .filter_map(|line| {
            let parsed = parse_reward_line(line);
            if parsed.is_none() && !line.trim().is_empty() {
                debug!("Skipping reward line: {:?}", line);
            }
            parsed
        })
        .collect()
}

fn parse_reward_line(line: &str) -> Option<(Difficulty, f64)> {
    let parts: Vec<&str> = line.trim().split(": ").collect();
    if parts.len() != 2 {
        return None;
    }
    let difficulty = parts[0].trim().parse::<Difficulty>().ok()?;
    let reward = parts[1].split_whitespace().next()?.parse::<f64>().ok()?;
    if !reward.is_finite() {
        return None;
    }
    Some((difficulty, reward))
}

/// Amount on the first line containing `label`
///
/// `Ok(None)` when no line carries the label; an error when the line is
/// there but its amount does not parse.
pub fn parse_labeled_amount(output: &str, label: &str) -> Result<Option<f64>, SourceError> {
    let Some(line) = output.lines().find(|line| line.contains(label)) else {
        return Ok(None);
    };

    let malformed = || SourceError::Parse {
        label: label.trim_end_matches(':').to_string(),
        line: line.trim().to_string(),
    };

    let value = line
        .split(':')
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .ok_or_else(malformed)?;

    value.parse::<f64>().map(Some).map_err(|_| malformed())
}

/// Miner's stake from `ore balance`; absent line reads as zero
pub fn parse_stake(balance_output: &str) -> Result<f64, SourceError> {
    Ok(parse_labeled_amount(balance_output, STAKE_LABEL)?.unwrap_or(0.0))
}

/// Top stake from `ore config`; absent line reads as zero
pub fn parse_top_stake(config_output: &str) -> Result<f64, SourceError> {
    Ok(parse_labeled_amount(config_output, TOP_STAKE_LABEL)?.unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    const REWARDS_OUTPUT: &str = "\
8: 0.00001525 ORE
9: 0.00003051 ORE
10: 0.00006103 ORE
11: 0.00012207 ORE
";

    #[test]
    fn test_parse_reward_table() {
        let table = parse_reward_table(REWARDS_OUTPUT);
        assert_eq!(table.len(), 4);
        assert_eq!(table.get(8), 0.00001525);
        assert_eq!(table.get(11), 0.00012207);
        assert_eq!(table.observed_range(), Some((8, 11)));
    }

    #[test]
    fn test_non_conforming_lines_ignored() {
        let output = "\
Base Reward Rate: 8: 0.00001525 ORE
9: 0.00003051 ORE
garbage
ten: 0.1 ORE
11: lots ORE
12:0.5 ORE

13: 0.0005 ORE";
        let table = parse_reward_table(output);
        assert_eq!(table.len(), 2);
        assert!(table.contains(9));
        assert!(table.contains(13));
    }

    #[test]
    fn test_empty_output_gives_empty_table() {
        assert!(parse_reward_table("").is_empty());
    }

    #[test]
    fn test_parse_stake() {
        let balance = "Balance: 1.25000000000 ORE\nStake: 12.50000000000 ORE\n";
        assert_eq!(parse_stake(balance).unwrap(), 12.5);
    }

    #[test]
    fn test_parse_top_stake() {
        let config = "\
Last reset at: 1717000000
Min difficulty: 8
Base reward rate: 0.00001525 ORE
Top stake: 2500.75 ORE
";
        assert_eq!(parse_top_stake(config).unwrap(), 2500.75);
    }

    #[test]
    fn test_missing_label_reads_zero() {
        assert_eq!(parse_stake("Balance: 3.0 ORE").unwrap(), 0.0);
        assert_eq!(parse_top_stake("").unwrap(), 0.0);
    }

    #[test]
    fn test_top_stake_line_is_not_the_stake_line() {
        // Label matching is case sensitive
        assert_eq!(parse_stake("Top stake: 99 ORE").unwrap(), 0.0);
    }

    #[test]
    fn test_malformed_amount_is_error() {
        let err = parse_stake("Stake: unknown").unwrap_err();
        assert!(matches!(err, SourceError::Parse { .. }));
        assert!(parse_top_stake("Top stake:").is_err());
    }
}
