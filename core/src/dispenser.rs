use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::*;

/// Splits a phrase file into phrases, one per line.
///
/// Lines are trimmed, blank lines and lines starting with `#` are dropped.
pub fn parse_phrases(source: &str) -> Vec<String> {
    source.lines().filter_map(phrase_line).collect()
}

fn phrase_line(line: &str) -> Option<String> {
    let line = line.trim();
    (!line.is_empty() && !line.starts_with('#')).then(|| line.to_string())
}

/// Shuffled, non-repeating source of phrases for the cards of one board.
///
/// The pool is fixed once shuffled, only the cursor moves forward.
#[derive(Clone, Debug, PartialEq)]
pub struct PhraseDispenser {
    pool: Vec<String>,
    cursor: usize,
}

impl PhraseDispenser {
    /// Builds a dispenser from raw phrase lines, see [`parse_phrases`] for the filtering rules.
    pub fn new<I, S>(phrases: I, seed: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pool = phrases
            .into_iter()
            .filter_map(|phrase| phrase_line(phrase.as_ref()))
            .collect();
        let mut dispenser = Self { pool, cursor: 0 };
        dispenser.reset(seed);
        dispenser
    }

    pub fn from_source(source: &str, seed: u64) -> Self {
        Self::new(source.lines(), seed)
    }

    /// Reshuffles the whole pool and rewinds the cursor.
    pub fn reset(&mut self, seed: u64) {
        use rand::prelude::*;

        let mut rng = SmallRng::seed_from_u64(seed);
        for i in (1..self.pool.len()).rev() {
            let j = rng.random_range(0..=i);
            self.pool.swap(i, j);
        }
        self.cursor = 0;
        log::debug!("phrase pool shuffled, {} phrases", self.pool.len());
    }

    pub fn remaining(&self) -> usize {
        self.pool.len() - self.cursor
    }

    pub fn total(&self) -> usize {
        self.pool.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.pool.len()
    }

    pub fn next(&mut self) -> Result<String> {
        let phrase = self.pool.get(self.cursor).ok_or(BingoError::Exhausted)?;
        self.cursor += 1;
        Ok(phrase.clone())
    }
}
