//! Terminal rendering
//!
//! Every function returns a `String` so output can be checked in tests and
//! printed by the binary.

use std::fmt::Write;

use colored::*;

use crate::model::{MultiplierPreview, ProbabilityDistribution, StakeState};
use crate::simulation::{
    lamports_to_sol, priority_fee_sol, BreakevenPrice, BreakevenSuggestion, CostModel, Estimate,
    MarketPrices, StakeScenario, TierRow,
};

const BOX_WIDTH: usize = 58;

/// Caveats printed after every Monte Carlo run
pub const MONTE_CARLO_NOTES: [&str; 3] = [
    "Results vary between runs; each run samples a different day of mining.",
    "Decay scenarios trim high difficulties to mimic network conditions.",
    "Rewards follow the live reward table and current stake multiplier.",
];

/// Boxed title line
pub fn banner(title: &str) -> String {
    let bar = "═".repeat(BOX_WIDTH);
    format!(
        "╔{bar}╗\n║{:^width$}║\n╚{bar}╝\n",
        title,
        bar = bar,
        width = BOX_WIDTH
    )
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}", title.bright_white().bold());
    let _ = writeln!(out, "{}", "─".repeat(BOX_WIDTH));
}

/// Green when non-negative, red otherwise
fn signed_usd(value: f64) -> ColoredString {
    let text = format!("${:.4}", value);
    if value >= 0.0 {
        text.green()
    } else {
        text.red()
    }
}

/// Probability table with the mean difficulty underneath
pub fn render_distribution(distribution: &ProbabilityDistribution) -> String {
    let mut out = String::new();
    section(&mut out, "Difficulty Distribution");
    let _ = writeln!(out, "{:>10}  {:>12}  {:>12}", "Difficulty", "Probability", "Cumulative");

    let mut cumulative = 0.0;
    for (difficulty, p) in distribution.iter() {
        cumulative += p;
        let _ = writeln!(
            out,
            "{:>10}  {:>11.4}%  {:>11.4}%",
            difficulty,
            p * 100.0,
            cumulative * 100.0
        );
    }

    let _ = writeln!(
        out,
        "\nDifficulty mean: {}",
        format!("{:.2}", distribution.mean_difficulty()).bright_cyan()
    );
    out
}

/// Solved-difficulty breakdown of a simulation run
pub fn render_tiers(tiers: &[TierRow]) -> String {
    let mut out = String::new();
    section(&mut out, "Tier Summary");
    let _ = writeln!(
        out,
        "{:>10}  {:>14}  {:>7}  {:>8}  {:>10}",
        "Difficulty", "Reward (ORE)", "Solves", "Share", "Cumulative"
    );

    for row in tiers.iter().filter(|row| row.solves > 0) {
        let _ = writeln!(
            out,
            "{:>10}  {:>14.8}  {:>7}  {:>7.2}%  {:>9.2}%",
            row.difficulty, row.reward_rate, row.solves, row.percentage, row.cumulative_percentage
        );
    }
    out
}

/// Current multiplier and the bare preview, without simulated output
pub fn render_multiplier_preview(stake: &StakeState, previews: &[MultiplierPreview]) -> String {
    let mut out = String::new();
    section(&mut out, "Stake Multiplier");
    let _ = writeln!(out, "  Stake:       {:.4} ORE", stake.stake);
    let _ = writeln!(out, "  Top stake:   {:.4} ORE", stake.top_stake);
    let _ = writeln!(
        out,
        "  Multiplier:  {}\n",
        format!("{:.8}x", stake.multiplier()).bright_cyan()
    );

    let _ = writeln!(out, "{:>12}  {:>14}", "+ORE", "Multiplier");
    for preview in previews {
        let _ = writeln!(out, "{:>12.2}  {:>13.8}x", preview.increment, preview.multiplier);
    }
    out
}

/// Stake preview replayed against the simulated hits
pub fn render_stake_scenarios(stake: &StakeState, scenarios: &[StakeScenario]) -> String {
    let mut out = String::new();
    section(&mut out, "Multiplier Preview");
    let _ = writeln!(
        out,
        "  Current multiplier: {:.8}x ({:.4} / {:.4} ORE)\n",
        stake.multiplier(),
        stake.stake,
        stake.top_stake
    );
    let _ = writeln!(
        out,
        "{:>8}  {:>12}  {:>9}  {:>12}  {:>12}  {:>12}",
        "+ORE", "Multiplier", "Increase", "Cost (USD)", "ORE/day", "USD/day"
    );

    for s in scenarios {
        let _ = writeln!(
            out,
            "{:>8.2}  {:>11.6}x  {:>8.2}%  {:>12.2}  {:>12.6}  {:>12.4}",
            s.increment,
            s.multiplier,
            s.increase_pct,
            s.purchase_cost_usd,
            s.expected_ore_per_day,
            s.expected_usd_per_day
        );
    }
    out
}

/// Prices and per-pass cost components
pub fn render_cost_breakdown(prices: &MarketPrices, costs: &CostModel) -> String {
    let mut out = String::new();
    section(&mut out, "Cost Breakdown");
    let _ = writeln!(out, "  SOL price:     ${:.4}", prices.sol_usd);
    let _ = writeln!(out, "  ORE price:     ${:.4}", prices.ore_usd);
    let _ = writeln!(
        out,
        "  Priority fee:  {:.9} SOL ({} lamports)",
        priority_fee_sol(costs),
        costs.priority_fee_lamports
    );
    let _ = writeln!(
        out,
        "  Mining fee:    {:.9} SOL ({} lamports)",
        lamports_to_sol(costs.mining_fee_lamports),
        costs.mining_fee_lamports
    );
    let _ = writeln!(out, "  Hourly cost:   ${:.4}", costs.hourly_cost_usd);
    let _ = writeln!(
        out,
        "  Cost per pass: ${:.6}",
        costs.cost_per_pass_usd(prices.sol_usd)
    );
    out
}

/// Totals for the simulated day
pub fn render_summary(estimate: &Estimate) -> String {
    let result = &estimate.result;
    let mut out = String::new();
    section(&mut out, "Summary");
    let _ = writeln!(out, "  Passes simulated:   {}", result.trials());
    let _ = writeln!(out, "  Total mined:        {:.8} ORE", result.total_mined());
    let _ = writeln!(out, "  Mined value:        ${:.4}", estimate.mined_value_usd());
    let _ = writeln!(
        out,
        "  Expected per day:   {:.8} ORE",
        estimate.expected_ore_per_day
    );
    let _ = writeln!(out, "  Total profit:       {}", signed_usd(result.total_profit_usd()));
    let _ = writeln!(
        out,
        "  Profit per hour:    {}",
        signed_usd(result.profit_per_hour_usd())
    );
    out
}

/// Breakeven price and fee for one reward basis
pub fn render_breakeven(label: &str, suggestion: &BreakevenSuggestion) -> String {
    let mut out = String::new();
    section(&mut out, &format!("Breakeven ({})", label));
    let _ = writeln!(out, "  Reward per pass:    {:.8} ORE", suggestion.reward_per_pass);
    let _ = writeln!(out, "  Revenue per pass:   ${:.6}", suggestion.revenue_per_pass_usd);
    let _ = writeln!(out, "  Cost per pass:      ${:.6}", suggestion.cost_per_pass_usd);
    let _ = writeln!(
        out,
        "  Profit per pass:    {}",
        signed_usd(suggestion.profit_per_pass_usd)
    );

    match suggestion.ore_price {
        BreakevenPrice::Price(price) => {
            let _ = writeln!(out, "  Breakeven ORE:      ${:.4}", price);
        }
        BreakevenPrice::Unattainable => {
            let _ = writeln!(out, "  Breakeven ORE:      {}", "unattainable (no reward)".red());
        }
    }
    let _ = writeln!(
        out,
        "  Max priority fee:   {} lamports",
        suggestion.max_priority_fee_lamports
    );
    out
}

/// Full `simulate` report
pub fn render_estimate(estimate: &Estimate) -> String {
    let mut out = banner("ORE MINING ESTIMATE");
    if let Some(scenario) = estimate.scenario {
        let _ = writeln!(out, "Decay scenario: {}", scenario);
    }
    let _ = writeln!(
        out,
        "Difficulty mean: {:.2}  (levels {}-{})\n",
        estimate.mean_difficulty,
        estimate.distribution.min_level(),
        estimate.distribution.max_level()
    );

    out.push_str(&render_tiers(&estimate.tiers));
    out.push('\n');
    out.push_str(&render_stake_scenarios(&estimate.stake, &estimate.stake_scenarios));
    out.push('\n');
    out.push_str(&render_cost_breakdown(&estimate.prices, &estimate.costs));
    out.push('\n');
    out.push_str(&render_summary(estimate));
    out.push('\n');
    for note in MONTE_CARLO_NOTES {
        let _ = writeln!(out, "{} {}", "note:".yellow(), note);
    }
    out
}
