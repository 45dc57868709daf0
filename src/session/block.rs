//! Block planning: target sampling and trial order
//!
//! Targets and distractors come out of one draw of distinct pool indices,
//! so the two sets never share an item.

use rand::seq::{index, SliceRandom};
use rand::Rng;
use std::fmt;

use super::errors::{ExperimentError, Result};

/// Item type of a block
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Word,
    Number,
    Pair,
}

impl Stage {
    /// Blocks in the order they are run
    pub const ALL: [Stage; 3] = [Stage::Word, Stage::Number, Stage::Pair];

    /// Label written to the results file
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Word => "word",
            Stage::Number => "number",
            Stage::Pair => "pair",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Targets and shuffled trial sequence for one block
#[derive(Clone, Debug)]
pub struct BlockPlan {
    pub stage: Stage,
    pub targets: Vec<String>,
    pub distractors: Vec<String>,
    pub trials: Vec<String>,
}

impl BlockPlan {
    /// Sample `target_count` targets and `trial_count - target_count`
    /// distractors from `pool`, then shuffle them into the trial sequence.
    pub fn sample<R: Rng + ?Sized>(
        stage: Stage,
        pool: &[String],
        target_count: usize,
        trial_count: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if target_count > trial_count {
            return Err(ExperimentError::InvalidBlockSize {
                targets: target_count,
                trials: trial_count,
            });
        }
        if trial_count > pool.len() {
            return Err(ExperimentError::PoolTooSmall {
                stage,
                needed: trial_count,
                available: pool.len(),
            });
        }

        let drawn = index::sample(rng, pool.len(), trial_count).into_vec();
        let (target_idx, distractor_idx) = drawn.split_at(target_count);

        let targets: Vec<String> = target_idx.iter().map(|&i| pool[i].clone()).collect();
        let distractors: Vec<String> = distractor_idx.iter().map(|&i| pool[i].clone()).collect();

        let mut trials = distractors.clone();
        trials.extend(targets.iter().cloned());
        trials.shuffle(rng);

        Ok(BlockPlan {
            stage,
            targets,
            distractors,
            trials,
        })
    }

    /// Whether `item` belongs to this block's target set
    pub fn is_target(&self, item: &str) -> bool {
        self.targets.iter().any(|t| t == item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn pool(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("item{}", i)).collect()
    }

    #[test]
    fn test_sizes_match_constants() {
        let mut rng = StdRng::seed_from_u64(7);
        let items = pool(40);

        for seed_round in 0..20 {
            let plan = BlockPlan::sample(Stage::Word, &items, 5, 18, &mut rng).unwrap();
            assert_eq!(plan.targets.len(), 5, "round {}", seed_round);
            assert_eq!(plan.distractors.len(), 13);
            assert_eq!(plan.trials.len(), 18);
        }
    }

    #[test]
    fn test_targets_and_distractors_disjoint() {
        let mut rng = StdRng::seed_from_u64(11);
        // Tight pool: every item gets used
        let items = pool(18);

        for _ in 0..50 {
            let plan = BlockPlan::sample(Stage::Number, &items, 5, 18, &mut rng).unwrap();
            let targets: HashSet<_> = plan.targets.iter().collect();
            assert!(plan.distractors.iter().all(|d| !targets.contains(d)));
            assert!(plan.distractors.iter().all(|d| !plan.is_target(d)));
        }
    }

    #[test]
    fn test_trials_contain_every_target_once() {
        let mut rng = StdRng::seed_from_u64(3);
        let items = pool(100);
        let plan = BlockPlan::sample(Stage::Pair, &items, 5, 18, &mut rng).unwrap();

        let unique: HashSet<_> = plan.trials.iter().collect();
        assert_eq!(unique.len(), plan.trials.len());
        for target in &plan.targets {
            assert_eq!(plan.trials.iter().filter(|t| *t == target).count(), 1);
        }
        assert_eq!(plan.trials.iter().filter(|t| plan.is_target(t)).count(), 5);
    }

    #[test]
    fn test_same_seed_same_plan() {
        let items = pool(60);
        let a = BlockPlan::sample(Stage::Word, &items, 5, 18, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = BlockPlan::sample(Stage::Word, &items, 5, 18, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a.trials, b.trials);
        assert_eq!(a.targets, b.targets);
    }

    #[test]
    fn test_pool_too_small() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = BlockPlan::sample(Stage::Word, &pool(10), 5, 18, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            ExperimentError::PoolTooSmall {
                stage: Stage::Word,
                needed: 18,
                available: 10
            }
        ));
    }

    #[test]
    fn test_stage_labels() {
        let labels: Vec<_> = Stage::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(labels, vec!["word", "number", "pair"]);
    }
}
