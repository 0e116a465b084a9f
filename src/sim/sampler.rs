//! Weighted discrete sampling
//!
//! A `WeightedSampler` draws table indices with probability `w_i / Σw`.
//! Identical seed + identical table always yields the identical draw sequence.

use rand::SeedableRng;
use rand::distr::Distribution;
use rand::distr::weighted::{Error as WeightError, WeightedIndex};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// One named outcome and its integer weight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub name: String,
    pub weight: u32,
}

/// Ordered (name, weight) table as authored per map
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightTable(pub Vec<WeightEntry>);

impl WeightTable {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, u32)>) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(name, weight)| WeightEntry {
                    name: name.to_string(),
                    weight,
                })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all weights
    pub fn total_weight(&self) -> u64 {
        self.0.iter().map(|e| u64::from(e.weight)).sum()
    }

    /// Outcome name at `index`
    pub fn name(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(|e| e.name.as_str())
    }

    pub fn weights(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().map(|e| e.weight)
    }
}

/// PCG generator for `seed`, or from the thread RNG when `seed == 0`
pub fn seeded_rng(seed: u64) -> Pcg32 {
    if seed == 0 {
        Pcg32::from_rng(&mut rand::rng())
    } else {
        Pcg32::seed_from_u64(seed)
    }
}

/// Why a table cannot be drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Degenerate {
    ZeroTotal,
    Overflow,
}

/// Seeded weighted sampler over a `WeightTable`
#[derive(Debug, Clone)]
pub struct WeightedSampler {
    label: String,
    table: WeightTable,
    dist: Result<WeightedIndex<u32>, Degenerate>,
    rng: Pcg32,
}

impl WeightedSampler {
    /// Build a sampler. `seed == 0` seeds from the thread RNG.
    ///
    /// A degenerate table still yields a sampler; it rejects every draw.
    pub fn new(label: &str, table: WeightTable, seed: u64) -> Self {
        let rng = seeded_rng(seed);
        let dist = WeightedIndex::new(table.weights()).map_err(|e| match e {
            WeightError::Overflow => Degenerate::Overflow,
            _ => Degenerate::ZeroTotal,
        });

        if dist.is_err() {
            log::warn!("Weight table {label} cannot be sampled ({} entries, total {})", table.len(), table.total_weight());
        }

        Self {
            label: label.to_string(),
            table,
            dist,
            rng,
        }
    }

    /// Draw the next index
    pub fn next(&mut self) -> Result<usize, WorldError> {
        match &self.dist {
            Ok(dist) => Ok(dist.sample(&mut self.rng)),
            Err(Degenerate::ZeroTotal) => Err(WorldError::ZeroTotalWeight {
                table: self.label.clone(),
            }),
            Err(Degenerate::Overflow) => Err(WorldError::WeightOverflow {
                table: self.label.clone(),
            }),
        }
    }

    /// Draw the next outcome name
    pub fn next_name(&mut self) -> Result<&str, WorldError> {
        let index = self.next()?;
        Ok(self.table.name(index).unwrap_or_default())
    }

    /// Whether draws are possible at all
    pub fn is_usable(&self) -> bool {
        self.dist.is_ok()
    }

    pub fn table(&self) -> &WeightTable {
        &self.table
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_none_tree_frequencies() {
        let table = WeightTable::from_pairs([("none", 1), ("tree", 3)]);
        let mut sampler = WeightedSampler::new("center", table, 10403);

        let mut counts = [0u32; 2];
        for _ in 0..4000 {
            counts[sampler.next().unwrap()] += 1;
        }

        // σ ≈ 27 for n=4000, p=0.75
        assert!((2850..=3150).contains(&counts[1]), "tree drawn {} times", counts[1]);
        assert!((850..=1150).contains(&counts[0]), "none drawn {} times", counts[0]);
    }

    #[test]
    fn test_frequencies_track_weights() {
        let table = WeightTable::from_pairs([("a", 5), ("b", 0), ("c", 2), ("d", 13)]);
        let total = table.total_weight() as f64;
        let weights: Vec<u32> = table.weights().collect();
        let mut sampler = WeightedSampler::new("mixed", table, 7);

        let n = 20_000;
        let mut counts = vec![0u32; weights.len()];
        for _ in 0..n {
            counts[sampler.next().unwrap()] += 1;
        }

        for (i, &w) in weights.iter().enumerate() {
            let expected = w as f64 / total;
            let observed = counts[i] as f64 / n as f64;
            assert!((expected - observed).abs() < 0.02, "index {i}: {observed} vs {expected}");
        }
        assert_eq!(counts[1], 0);
    }

    #[test]
    fn test_zero_total_weight_rejects_draws() {
        let mut sampler = WeightedSampler::new("empty", WeightTable::from_pairs([("none", 0)]), 1);
        assert!(!sampler.is_usable());
        assert!(matches!(sampler.next(), Err(WorldError::ZeroTotalWeight { .. })));

        let mut sampler = WeightedSampler::new("nothing", WeightTable::default(), 1);
        assert!(matches!(sampler.next(), Err(WorldError::ZeroTotalWeight { .. })));
    }

    #[test]
    fn test_overflow_is_reported() {
        let table = WeightTable::from_pairs([("a", u32::MAX), ("b", u32::MAX)]);
        let mut sampler = WeightedSampler::new("huge", table, 1);
        assert!(matches!(sampler.next(), Err(WorldError::WeightOverflow { .. })));
    }

    #[test]
    fn test_next_name() {
        let table = WeightTable::from_pairs([("none", 0), ("stay", 1)]);
        let mut sampler = WeightedSampler::new("path", table, 3);
        assert_eq!(sampler.next_name().unwrap(), "stay");
    }

    #[test]
    fn test_table_json_shape() {
        let table: WeightTable =
            serde_json::from_str(r#"[{"name":"none","weight":4},{"name":"Shrub","weight":1}]"#).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.name(1), Some("Shrub"));
        assert_eq!(table.total_weight(), 5);
    }

    proptest! {
        #[test]
        fn prop_same_seed_same_sequence(
            weights in prop::collection::vec(0u32..50, 1..12),
            seed in 1u64..u64::MAX,
        ) {
            let table = WeightTable(
                weights.iter().enumerate()
                    .map(|(i, &w)| WeightEntry { name: format!("o{i}"), weight: w })
                    .collect(),
            );
            let mut a = WeightedSampler::new("a", table.clone(), seed);
            let mut b = WeightedSampler::new("b", table, seed);
            for _ in 0..64 {
                prop_assert_eq!(a.next().ok(), b.next().ok());
            }
        }

        #[test]
        fn prop_never_draws_zero_weight(
            weights in prop::collection::vec(0u32..5, 1..12),
            seed in 1u64..u64::MAX,
        ) {
            let table = WeightTable(
                weights.iter().map(|&w| WeightEntry { name: String::new(), weight: w }).collect(),
            );
            let mut sampler = WeightedSampler::new("p", table, seed);
            if weights.iter().all(|&w| w == 0) {
                prop_assert!(sampler.next().is_err());
            } else {
                for _ in 0..64 {
                    let i = sampler.next().unwrap();
                    prop_assert!(weights[i] > 0);
                }
            }
        }
    }
}
