/*
 * MIT License
 *
 * Copyright (c) 2022 Joseph Sacchini
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

use std::cmp::Ordering;
use serde::{Deserialize, Serialize};
use super::{prelude::*, constraints::*, game::SolverErr};

pub const DEFAULT_LETTER_FREQ_FACTOR: WordleFloat = 3.0;
pub const DEFAULT_POSITION_FREQ_FACTOR: WordleFloat = 0.5;
pub const DEFAULT_WORD_FREQ_FACTOR: WordleFloat = 1.5;
pub const DEFAULT_MISPLACED_LETTER_FACTOR: WordleFloat = 0.5;
pub const DEFAULT_BEST_WORD_CUTOFF_FACTOR: WordleFloat = 0.2;

///
/// The weighting factors used to turn letter/position/word frequencies into a single score, plus
/// the hard/easy mode switch. Fixed for the lifetime of a session.
///
/// Missing fields take their default when deserialized, so a config file only needs to list the
/// factors it changes.
///
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    pub letter_freq_factor: WordleFloat,
    pub position_freq_factor: WordleFloat,
    pub word_freq_factor: WordleFloat,
    /// tally weight of a letter known to be in the answer but not yet placed (instead of 1.0)
    pub misplaced_letter_factor: WordleFloat,
    /// how far (multiplicatively) the best candidate must lead the runner-up to be guessed directly
    pub best_word_cutoff_factor: WordleFloat,
    /// only ever guess words that could still be the answer
    pub hard_mode: bool,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            letter_freq_factor: DEFAULT_LETTER_FREQ_FACTOR,
            position_freq_factor: DEFAULT_POSITION_FREQ_FACTOR,
            word_freq_factor: DEFAULT_WORD_FREQ_FACTOR,
            misplaced_letter_factor: DEFAULT_MISPLACED_LETTER_FACTOR,
            best_word_cutoff_factor: DEFAULT_BEST_WORD_CUTOFF_FACTOR,
            hard_mode: false,
        }
    }
}

impl ScoreConfig {
    pub fn hard() -> Self {
        Self {
            hard_mode: true,
            ..Self::default()
        }
    }

    ///
    /// Every factor must be finite and non-negative, and at least one of the letter, positional and
    /// word frequency factors must be positive (otherwise every word scores 0 and nothing is ever
    /// suggested).
    ///
    pub fn validate(&self) -> Result<(), SolverErr> {
        let factors = [
            ("letter_freq_factor", self.letter_freq_factor),
            ("position_freq_factor", self.position_freq_factor),
            ("word_freq_factor", self.word_freq_factor),
            ("misplaced_letter_factor", self.misplaced_letter_factor),
            ("best_word_cutoff_factor", self.best_word_cutoff_factor),
        ];

        for (name, value) in factors {
            if !value.is_finite() || value < 0.0 {
                return Err(SolverErr::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}", name, value)));
            }
        }

        if self.primary_factor_sum() <= 0.0 {
            return Err(SolverErr::InvalidConfig(
                "at least one of the letter, position or word frequency factors must be positive".to_string()));
        }

        Ok(())
    }

    pub fn primary_factor_sum(&self) -> WordleFloat {
        self.letter_freq_factor + self.position_freq_factor + self.word_freq_factor
    }
}

///
/// Maps an occurrence probability to how useful it is to guess that letter: 0.5 maps to 1.0, and
/// both 0.0 and 1.0 map to 0.0. A letter found in half of the remaining words splits them evenly,
/// which is as much as one guess can learn from it.
///
pub fn fold_to_middle(p: WordleFloat) -> WordleFloat {
    1.0 - 2.0 * (p.clamp(0.0, 1.0) - 0.5).abs()
}

///
/// Per-letter and per-(position, letter) scores computed from a set of candidates.
///
/// Letters that never showed up (and every letter at a green position) score 0.0.
///
#[derive(Clone, Debug, PartialEq)]
pub struct FrequencyScores {
    num_candidates: usize,
    letters: [WordleFloat; ALPHABET_SIZE],
    positions: Vec<[WordleFloat; ALPHABET_SIZE]>,
}

impl FrequencyScores {
    pub fn empty(word_len: usize) -> Self {
        Self {
            num_candidates: 0,
            letters: [0.0; ALPHABET_SIZE],
            positions: vec![[0.0; ALPHABET_SIZE]; word_len],
        }
    }

    ///
    /// Tallies letters across the candidates, skipping green positions:
    ///   * the letter tally counts a letter once per word, no matter how often it repeats
    ///   * the positional tally counts every occurrence at its own position
    ///
    /// A tally adds misplaced_letter_factor instead of 1.0 for letters currently recorded as
    /// misplaced. Both tallies are then divided by the number of candidates and folded to the
    /// middle. No candidates means empty scores.
    ///
    pub fn compute(candidates: &[&str], constraints: &ConstraintState, config: &ScoreConfig) -> Self {
        let word_len = constraints.word_len();
        let mut out = Self::empty(word_len);
        if candidates.is_empty() {
            return out;
        }

        let misplaced = constraints.misplaced_letters();
        let green: Vec<bool> = (0..word_len).map(|pos| constraints.is_green(pos)).collect();

        for word in candidates {
            let mut seen = [false; ALPHABET_SIZE];
            for (pos, &c) in word.as_bytes().iter().enumerate().take(word_len) {
                if green[pos] {
                    continue;
                }

                let idx = letter_idx(c);
                let amount = if misplaced[idx] { config.misplaced_letter_factor } else { 1.0 };
                out.positions[pos][idx] += amount;
                if !seen[idx] {
                    seen[idx] = true;
                    out.letters[idx] += amount;
                }
            }
        }

        let n = candidates.len() as WordleFloat;
        for v in out.letters.iter_mut().chain(out.positions.iter_mut().flatten()) {
            *v = fold_to_middle(*v / n);
        }
        out.num_candidates = candidates.len();

        out
    }

    pub fn is_empty(&self) -> bool {
        self.num_candidates == 0
    }

    pub fn num_candidates(&self) -> usize {
        self.num_candidates
    }

    pub fn letter(&self, letter: u8) -> WordleFloat {
        self.letters[letter_idx(letter)]
    }

    /// Positional score of a letter at a 0-based position, 0.0 past the end of the word
    pub fn position(&self, pos: usize, letter: u8) -> WordleFloat {
        self.positions
            .get(pos)
            .map(|scores| scores[letter_idx(letter)])
            .unwrap_or(0.0)
    }

    /// The k highest scoring letters, ties broken alphabetically
    pub fn top_letters(&self, k: usize) -> Vec<(char, WordleFloat)> {
        self.letters
            .iter()
            .enumerate()
            .filter(|(_, score)| **score > 0.0)
            .map(|(idx, score)| (idx_letter(idx), *score))
            .top_k_by(k, |a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)))
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct Score {
    pub abs: WordleFloat,
    /// sum of letter scores over the unique letters of the word
    pub letter: WordleFloat,
    /// sum of positional scores over every position of the word
    pub position: WordleFloat,
    pub weight: WordleFloat,
}

impl Score {
    pub fn new(letter: WordleFloat, position: WordleFloat, weight: WordleFloat, config: &ScoreConfig) -> Self {
        let abs = Self::calculate_abs(letter, position, weight, config);
        Self {
            abs,
            letter,
            position,
            weight,
        }
    }

    pub fn calculate_abs(letter: WordleFloat, position: WordleFloat, weight: WordleFloat, config: &ScoreConfig) -> WordleFloat {
        weight * config.word_freq_factor
            + letter * config.letter_freq_factor
            + position * config.position_freq_factor
    }
}

#[derive(Copy, Clone, Debug)]
pub struct ScoredCandidate<'a> {
    pub word: &'a str,
    pub score: Score,
}

impl<'a> ScoredCandidate<'a> {
    ///
    /// Ranking order: higher score first, then higher weight, then alphabetical. This is a total
    /// order, so rankings come out the same on every run.
    ///
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other.score.abs.total_cmp(&self.score.abs)
            .then_with(|| other.score.weight.total_cmp(&self.score.weight))
            .then_with(|| self.word.cmp(other.word))
    }
}

///
/// Scores one word. Already guessed words always score 0 so they're never suggested again.
///
/// weight is the word's frequency weight from whichever table the caller ranks against (the
/// re-normalized candidate weights or the whole-corpus weights).
///
pub fn score_word(
    word: &str,
    scores: &FrequencyScores,
    weight: WordleFloat,
    constraints: &ConstraintState,
    config: &ScoreConfig,
) -> Score {
    if constraints.has_guessed(word) {
        return Score::default();
    }

    let mut seen = [false; ALPHABET_SIZE];
    let mut letter = 0.0;
    let mut position = 0.0;
    for (pos, &c) in word.as_bytes().iter().enumerate() {
        let idx = letter_idx(c);
        if !seen[idx] {
            seen[idx] = true;
            letter += scores.letter(c);
        }
        position += scores.position(pos, c);
    }

    Score::new(letter, position, weight, config)
}

///
/// Scores every word and returns the k best with a strictly positive score, best first.
///
pub fn rank_words<'a, I, W>(
    words: I,
    weight_of: W,
    scores: &FrequencyScores,
    constraints: &ConstraintState,
    config: &ScoreConfig,
    k: usize,
) -> Vec<ScoredCandidate<'a>>
    where
        I: IntoIterator<Item=&'a str>,
        W: Fn(&str) -> WordleFloat,
{
    words.into_iter()
        .map(|word| ScoredCandidate {
            word,
            score: score_word(word, scores, weight_of(word), constraints, config),
        })
        .filter(|candidate| candidate.score.abs > 0.0)
        .top_k_by(k, |a, b| a.rank_cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordle::Colorings;
    use test_case::test_case;

    const EPSILON: WordleFloat = 1e-12;

    #[test_case(0.0, 0.0)]
    #[test_case(0.25, 0.5)]
    #[test_case(0.5, 1.0)]
    #[test_case(0.75, 0.5)]
    #[test_case(1.0, 0.0)]
    #[test_case(1.5, 0.0 ; "clamped above one")]
    fn test_fold_to_middle(p: WordleFloat, expected: WordleFloat) {
        assert!((fold_to_middle(p) - expected).abs() < EPSILON, "p={}", p);
    }

    #[test]
    fn test_letter_counted_once_per_word() {
        let constraints = ConstraintState::new(5);
        let candidates = ["geese", "crane"];
        let scores = FrequencyScores::compute(&candidates, &constraints, &ScoreConfig::default());

        // 'e' is in both words: p = 1.0 despite geese having three of them
        assert!((scores.letter(b'e') - 0.0).abs() < EPSILON);
        // 'g' is in one of two: p = 0.5
        assert!((scores.letter(b'g') - 1.0).abs() < EPSILON);
        // last position is 'e' for both words
        assert!((scores.position(4, b'e') - 0.0).abs() < EPSILON);
        // position 1: 'e' once, 'r' once
        assert!((scores.position(1, b'e') - 1.0).abs() < EPSILON);
        assert_eq!(scores.position(9, b'e'), 0.0);
    }

    #[test]
    fn test_green_positions_not_scored() {
        let mut constraints = ConstraintState::new(5);
        constraints.apply("crate", &Colorings::from_positions(5, &[], &[3]).unwrap()).unwrap();
        let candidates = ["brake", "snake", "stake", "shade"];
        let scores = FrequencyScores::compute(&candidates, &constraints, &ScoreConfig::default());
        assert_eq!(scores.position(2, b'a'), 0.0);
        // 'a' only appears at the green position, so it tallies nothing at all
        assert_eq!(scores.letter(b'a'), 0.0);
    }

    #[test]
    fn test_misplaced_letter_weight() {
        let mut constraints = ConstraintState::new(5);
        constraints.apply("tonic", &Colorings::from_positions(5, &[1], &[]).unwrap()).unwrap();
        let candidates = ["beast", "blurt", "bathe", "latch"];

        let config = ScoreConfig { misplaced_letter_factor: 0.5, ..ScoreConfig::default() };
        let scores = FrequencyScores::compute(&candidates, &constraints, &config);
        // every candidate has a 't', each tally worth 0.5: p = 0.5
        assert!((scores.letter(b't') - 1.0).abs() < EPSILON);

        let config = ScoreConfig { misplaced_letter_factor: 1.0, ..ScoreConfig::default() };
        let scores = FrequencyScores::compute(&candidates, &constraints, &config);
        assert!((scores.letter(b't') - 0.0).abs() < EPSILON);
    }

    #[test]
    fn test_empty_candidates_give_empty_scores() {
        let constraints = ConstraintState::new(5);
        let scores = FrequencyScores::compute(&[], &constraints, &ScoreConfig::default());
        assert!(scores.is_empty());
        assert!(scores.top_letters(3).is_empty());
        assert_eq!(scores, FrequencyScores::empty(5));
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let constraints = ConstraintState::new(5);
        let candidates = ["crate", "trace", "react", "cater", "slate"];
        let config = ScoreConfig::default();
        let first = FrequencyScores::compute(&candidates, &constraints, &config);
        let second = FrequencyScores::compute(&candidates, &constraints, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn test_score_word_sums_factors() {
        let constraints = ConstraintState::new(5);
        let candidates = ["abbey", "cabin"];
        let config = ScoreConfig::default();
        let scores = FrequencyScores::compute(&candidates, &constraints, &config);

        let score = score_word("abbey", &scores, 0.5, &constraints, &config);
        let letter: WordleFloat = [b'a', b'b', b'e', b'y'].iter().map(|c| scores.letter(*c)).sum();
        let position: WordleFloat = "abbey".bytes().enumerate().map(|(i, c)| scores.position(i, c)).sum();
        assert!((score.letter - letter).abs() < EPSILON);
        assert!((score.position - position).abs() < EPSILON);
        let expected = 0.5 * config.word_freq_factor
            + letter * config.letter_freq_factor
            + position * config.position_freq_factor;
        assert!((score.abs - expected).abs() < EPSILON);
    }

    #[test]
    fn test_guessed_word_scores_zero() {
        let mut constraints = ConstraintState::new(5);
        constraints.apply("crate", &Colorings::all_excluded(5)).unwrap();
        let scores = FrequencyScores::compute(&["slump", "bloom"], &constraints, &ScoreConfig::default());
        let score = score_word("crate", &scores, 1.0, &constraints, &ScoreConfig::default());
        assert_eq!(score.abs, 0.0);
    }

    #[test]
    fn test_rank_breaks_ties_by_weight_then_word() {
        let constraints = ConstraintState::new(5);
        // anagrams score identically on letters; positions differ but are all p = 1/3 here
        let candidates = ["abcde", "bcdea", "cdeab"];
        let config = ScoreConfig { word_freq_factor: 1.0, ..ScoreConfig::default() };
        let scores = FrequencyScores::compute(&candidates, &constraints, &config);

        let equal = rank_words(candidates, |_| 0.5, &scores, &constraints, &config, 3);
        let words: Vec<&str> = equal.iter().map(|c| c.word).collect();
        assert_eq!(words, vec!["abcde", "bcdea", "cdeab"]);

        // same total score, different weights: weight decides
        let zero_wf = ScoreConfig { word_freq_factor: 0.0, ..config };
        let ranked = rank_words(
            candidates, |w| if w == "cdeab" { 1.0 } else { 0.2 }, &scores, &constraints, &zero_wf, 3);
        assert_eq!(ranked[0].word, "cdeab");
        assert_eq!(ranked[1].word, "abcde");
    }

    #[test]
    fn test_rank_drops_non_positive() {
        let constraints = ConstraintState::new(5);
        let candidates = ["crate"];
        // a lone candidate has p = 1.0 for every letter, so only the weight can score
        let config = ScoreConfig { word_freq_factor: 0.0, ..ScoreConfig::default() };
        let scores = FrequencyScores::compute(&candidates, &constraints, &config);
        assert!(rank_words(candidates, |_| 1.0, &scores, &constraints, &config, 5).is_empty());

        let config = ScoreConfig::default();
        let ranked = rank_words(candidates, |_| 1.0, &scores, &constraints, &config, 5);
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn test_top_letters() {
        let constraints = ConstraintState::new(5);
        let scores = FrequencyScores::compute(&["crate", "slump"], &constraints, &ScoreConfig::default());
        let top = scores.top_letters(3);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].0, 'a');
        assert!(top.iter().all(|(_, s)| (*s - 1.0).abs() < EPSILON));
    }

    #[test_case(ScoreConfig::default(), true ; "defaults")]
    #[test_case(ScoreConfig { letter_freq_factor: -1.0, ..ScoreConfig::default() }, false ; "negative")]
    #[test_case(ScoreConfig { best_word_cutoff_factor: WordleFloat::NAN, ..ScoreConfig::default() }, false ; "nan")]
    #[test_case(ScoreConfig { letter_freq_factor: 0.0, position_freq_factor: 0.0, word_freq_factor: 0.0, ..ScoreConfig::default() }, false ; "all zero")]
    #[test_case(ScoreConfig { letter_freq_factor: 0.0, position_freq_factor: 0.0, ..ScoreConfig::default() }, true ; "word only")]
    fn test_validate(config: ScoreConfig, ok: bool) {
        assert_eq!(config.validate().is_ok(), ok);
    }

    #[test]
    fn test_config_partial_json() {
        let config: ScoreConfig = serde_json::from_str(r#"{"hard_mode": true, "letter_freq_factor": 2.0}"#).unwrap();
        assert!(config.hard_mode);
        assert_eq!(config.letter_freq_factor, 2.0);
        assert_eq!(config.word_freq_factor, DEFAULT_WORD_FREQ_FACTOR);
    }
}
