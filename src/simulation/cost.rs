//! Per-pass operating costs and market prices

use serde::{Deserialize, Serialize};

use crate::constants::{LAMPORTS_PER_SOL, ORE_MINING_FEE_LAMPORTS};
use crate::model::SimError;

/// Convert lamports to SOL
pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL
}

/// Fixed costs paid on every pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    /// Priority fee per transaction (lamports)
    pub priority_fee_lamports: u64,
    /// Flat mining fee per transaction (lamports)
    pub mining_fee_lamports: u64,
    /// Electricity or rental cost (USD per hour)
    pub hourly_cost_usd: f64,
}

impl CostModel {
    pub fn new(priority_fee_lamports: u64, hourly_cost_usd: f64) -> Self {
        Self {
            priority_fee_lamports,
            mining_fee_lamports: ORE_MINING_FEE_LAMPORTS,
            hourly_cost_usd,
        }
    }

    pub fn with_mining_fee(mut self, mining_fee_lamports: u64) -> Self {
        self.mining_fee_lamports = mining_fee_lamports;
        self
    }

    /// Total transaction fee per pass (lamports)
    pub fn fee_lamports(&self) -> u64 {
        self.priority_fee_lamports.saturating_add(self.mining_fee_lamports)
    }

    /// Amortized external cost per one-minute pass (USD)
    pub fn external_cost_per_pass_usd(&self) -> f64 {
        self.hourly_cost_usd / 60.0
    }

    /// Total cost of one pass in USD
    pub fn cost_per_pass_usd(&self, sol_price: f64) -> f64 {
        lamports_to_sol(self.fee_lamports()) * sol_price + self.external_cost_per_pass_usd()
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !self.hourly_cost_usd.is_finite() || self.hourly_cost_usd < 0.0 {
            return Err(SimError::invalid(format!(
                "hourly cost must be non-negative, got {}",
                self.hourly_cost_usd
            )));
        }
        Ok(())
    }
}

/// USD quotes for the mined and the fee token
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketPrices {
    pub ore_usd: f64,
    pub sol_usd: f64,
}

impl MarketPrices {
    pub fn new(ore_usd: f64, sol_usd: f64) -> Result<Self, SimError> {
        let prices = Self { ore_usd, sol_usd };
        prices.validate()?;
        Ok(prices)
    }

    /// Build from fetched quotes; an absent quote is missing data
    pub fn from_quotes(ore_usd: Option<f64>, sol_usd: Option<f64>) -> Result<Self, SimError> {
        let ore_usd = ore_usd.ok_or_else(|| SimError::missing("ORE price unavailable"))?;
        let sol_usd = sol_usd.ok_or_else(|| SimError::missing("SOL price unavailable"))?;
        Self::new(ore_usd, sol_usd)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        for (name, price) in [("ORE", self.ore_usd), ("SOL", self.sol_usd)] {
            if !price.is_finite() || price <= 0.0 {
                return Err(SimError::invalid(format!(
                    "{} price must be positive, got {}",
                    name, price
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_per_pass() {
        let costs = CostModel::new(95_000, 0.6);
        // 100_000 lamports = 0.0001 SOL at $150 = $0.015, plus $0.01 per minute
        let cost = costs.cost_per_pass_usd(150.0);
        assert!((cost - 0.025).abs() < 1e-12);
    }

    #[test]
    fn test_default_mining_fee() {
        let costs = CostModel::new(0, 0.0);
        assert_eq!(costs.mining_fee_lamports, ORE_MINING_FEE_LAMPORTS);
        assert_eq!(costs.fee_lamports(), 5000);
        assert_eq!(costs.with_mining_fee(0).fee_lamports(), 0);
    }

    #[test]
    fn test_fee_sum_saturates() {
        let costs = CostModel::new(u64::MAX, 0.0);
        assert_eq!(costs.fee_lamports(), u64::MAX);
    }

    #[test]
    fn test_negative_hourly_cost_rejected() {
        assert!(CostModel::new(0, -1.0).validate().is_err());
        assert!(CostModel::new(0, f64::INFINITY).validate().is_err());
        assert!(CostModel::new(0, 0.0).validate().is_ok());
    }

    #[test]
    fn test_prices_must_be_positive() {
        assert!(MarketPrices::new(20.0, 150.0).is_ok());
        assert!(matches!(MarketPrices::new(0.0, 150.0), Err(SimError::InvalidInput(_))));
        assert!(matches!(MarketPrices::new(20.0, -1.0), Err(SimError::InvalidInput(_))));
        assert!(matches!(MarketPrices::new(f64::NAN, 1.0), Err(SimError::InvalidInput(_))));
    }

    #[test]
    fn test_absent_quote_is_missing_data() {
        assert!(matches!(
            MarketPrices::from_quotes(None, Some(150.0)),
            Err(SimError::MissingExternalData(_))
        ));
        assert!(matches!(
            MarketPrices::from_quotes(Some(20.0), None),
            Err(SimError::MissingExternalData(_))
        ));
    }
}
