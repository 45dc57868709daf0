//! Stimulus pools: words, two-digit numbers and word-number pairs

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::block::Stage;
use super::errors::{ExperimentError, Result};

/// Column width the word is padded to inside a pair
const PAIR_WORD_WIDTH: usize = 18;

/// All items a session can draw from
#[derive(Clone, Debug)]
pub struct ItemPools {
    pub words: Vec<String>,
    pub numbers: Vec<String>,
    pub pairs: Vec<String>,
}

impl ItemPools {
    /// Build pools from a word list file
    pub fn load(path: &Path, exclude_round_numbers: bool) -> Result<Self> {
        let words = load_words(path)?;
        Ok(Self::from_words(words, exclude_round_numbers))
    }

    /// Derive the number and pair pools from `words`
    pub fn from_words(words: Vec<String>, exclude_round_numbers: bool) -> Self {
        let numbers = number_pool(exclude_round_numbers);
        let pairs = pair_pool(&words, &numbers);
        ItemPools {
            words,
            numbers,
            pairs,
        }
    }

    pub fn for_stage(&self, stage: Stage) -> &[String] {
        match stage {
            Stage::Word => &self.words,
            Stage::Number => &self.numbers,
            Stage::Pair => &self.pairs,
        }
    }
}

/// Read one word per line, skipping blank lines and repeats
pub fn load_words(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|source| ExperimentError::WordList {
        path: path.to_path_buf(),
        source,
    })?;

    let mut seen = HashSet::new();
    let words: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|w| !w.is_empty() && seen.insert(*w))
        .map(str::to_string)
        .collect();

    if words.is_empty() {
        return Err(ExperimentError::EmptyWordList(path.to_path_buf()));
    }

    Ok(words)
}

/// Two-digit numbers 10..=99 as strings
pub fn number_pool(exclude_round_numbers: bool) -> Vec<String> {
    (10..100u32)
        .filter(|n| !exclude_round_numbers || n % 10 != 0)
        .map(|n| n.to_string())
        .collect()
}

/// Every word combined with every number, word-major
pub fn pair_pool(words: &[String], numbers: &[String]) -> Vec<String> {
    words
        .iter()
        .flat_map(|word| numbers.iter().map(move |number| format_pair(word, number)))
        .collect()
}

/// Word left-justified in a fixed column, number right after it
pub fn format_pair(word: &str, number: &str) -> String {
    format!("{:<width$}{}", word, number, width = PAIR_WORD_WIDTH)
}
