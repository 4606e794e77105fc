//!
//! Narrows a word list down to the answer of a Wordle style puzzle.
//!
//! Each round the solver suggests a guess, takes the colors shown for it, folds them into a
//! [wordle::ConstraintState] and drops every candidate the colors rule out. Guesses are ranked by
//! how evenly their letters split the remaining candidates, plus how common the word is.
//!
//! ```no_run
//! use wordle_solver::wordle::*;
//!
//! let mut cache = CorpusCache::new(CorpusSource::Embedded);
//! let corpus = cache.get(DEFAULT_WORD_LENGTH).unwrap();
//! let result = run_session(&corpus, "crate", &ScoreConfig::default()).unwrap();
//! println!("solved in {} guesses: {}", result.guesses_used, result.won);
//! ```
//!

pub mod wordle;
pub mod util;
