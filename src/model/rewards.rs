//! Reward table
//!
//! Base ORE paid per pass at each difficulty, as reported by the mining
//! client. Read-only input to the simulation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Difficulty;

/// Difficulty -> ORE per pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardTable {
    rates: BTreeMap<Difficulty, f64>,
}

impl RewardTable {
    pub fn new(rates: BTreeMap<Difficulty, f64>) -> Self {
        Self { rates }
    }

    /// Base reward at `difficulty`; levels the client did not report pay nothing
    pub fn get(&self, difficulty: Difficulty) -> f64 {
        self.rates.get(&difficulty).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, difficulty: Difficulty) -> bool {
        self.rates.contains_key(&difficulty)
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Difficulty, f64)> + '_ {
        self.rates.iter().map(|(d, r)| (*d, *r))
    }

    /// Lowest and highest difficulty present, if any
    pub fn observed_range(&self) -> Option<(Difficulty, Difficulty)> {
        let min = *self.rates.keys().next()?;
        let max = *self.rates.keys().next_back()?;
        Some((min, max))
    }
}

impl FromIterator<(Difficulty, f64)> for RewardTable {
    fn from_iter<I: IntoIterator<Item = (Difficulty, f64)>>(iter: I) -> Self {
        Self {
            rates: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_level_pays_nothing() {
        let table = RewardTable::from_iter([(8, 0.0001), (9, 0.0002)]);
        assert_eq!(table.get(8), 0.0001);
        assert_eq!(table.get(10), 0.0);
        assert!(!table.contains(10));
    }

    #[test]
    fn test_observed_range() {
        let table = RewardTable::from_iter([(12, 0.1), (8, 0.01), (40, 1.0)]);
        assert_eq!(table.observed_range(), Some((8, 40)));
        assert_eq!(RewardTable::default().observed_range(), None);
    }

    #[test]
    fn test_duplicate_keys_keep_last() {
        let table = RewardTable::from_iter([(8, 0.1), (8, 0.2)]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(8), 0.2);
    }
}
