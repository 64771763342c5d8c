//! Word sources for event titles.

use std::path::Path;

use fake::{Fake, faker::lorem::en::Word};
use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Failed to read word list: {0}")]
    Io(#[from] std::io::Error),
    #[error("Word list contains no words")]
    Empty,
}

/// A source of title tokens.
pub trait WordSource {
    /// Picks one token uniformly from the source.
    fn pick_word<R: Rng>(&self, rng: &mut R) -> String;
}

/// Built-in English lorem corpus.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoremWords;

impl WordSource for LoremWords {
    fn pick_word<R: Rng>(&self, rng: &mut R) -> String {
        Word().fake_with_rng(rng)
    }
}

/// An owned list of tokens, never empty.
#[derive(Debug, Clone)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// Builds a list from explicit tokens.
    pub fn new(words: Vec<String>) -> Result<Self, CorpusError> {
        if words.is_empty() {
            return Err(CorpusError::Empty);
        }
        Ok(Self { words })
    }

    /// Splits text on whitespace.
    pub fn from_text(text: &str) -> Result<Self, CorpusError> {
        Self::new(text.split_whitespace().map(str::to_string).collect())
    }

    /// Reads a whitespace-separated word file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CorpusError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_text(&text)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }
}

impl WordSource for WordList {
    fn pick_word<R: Rng>(&self, rng: &mut R) -> String {
        // Non-empty by construction.
        self.words.choose(rng).cloned().unwrap_or_default()
    }
}

/// Corpus selected at runtime by the `seed` binary.
#[derive(Debug, Clone)]
pub enum Corpus {
    Lorem(LoremWords),
    List(WordList),
}

impl WordSource for Corpus {
    fn pick_word<R: Rng>(&self, rng: &mut R) -> String {
        match self {
            Corpus::Lorem(words) => words.pick_word(rng),
            Corpus::List(words) => words.pick_word(rng),
        }
    }
}
