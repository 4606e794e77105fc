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

use std::collections::{BTreeMap, HashSet};
use super::{prelude::*, color::*, game::SolverErr};

///
/// Everything learned from the feedback received so far in a game.
///
/// Positions are 0-based in here. Letter counts are stored per letter of the alphabet, indexed by
/// letter_idx.
///
/// Repeated letters are the tricky part. Green and yellow squares only ever tell us the answer has
/// *at least* that many of a letter, which is tracked in min_counts. Only when a guess also shows a
/// grey square for that letter do we learn the count *exactly* (the green + yellow tally from that
/// same guess), which is tracked in exact_counts. A grey letter does not mean zero occurrences.
///
#[derive(Clone, Debug)]
pub struct ConstraintState {
    word_len: usize,
    /// position -> letter that must be there (green). Never cleared or changed once set.
    correct_positions: BTreeMap<usize, u8>,
    /// position -> letter that must NOT be there (yellow). The latest yellow for a position wins.
    excluded_at_position: BTreeMap<usize, u8>,
    min_counts: [Option<usize>; ALPHABET_SIZE],
    exact_counts: [Option<usize>; ALPHABET_SIZE],
    guessed_words: HashSet<String>,
}

impl ConstraintState {
    pub fn new(word_len: usize) -> Self {
        Self {
            word_len,
            correct_positions: BTreeMap::new(),
            excluded_at_position: BTreeMap::new(),
            min_counts: [None; ALPHABET_SIZE],
            exact_counts: [None; ALPHABET_SIZE],
            guessed_words: HashSet::new(),
        }
    }

    ///
    /// Folds the colorings shown for one guess into the accumulated state.
    ///
    /// The guess must already be a valid word of this state's length (lowercase letters only).
    ///
    pub fn apply(&mut self, guess: &str, colorings: &Colorings) -> Result<(), SolverErr> {
        if !is_wordle_str(guess, self.word_len) {
            return Err(SolverErr::InvalidGuess(guess.to_string()));
        }
        if colorings.len() != self.word_len {
            return Err(SolverErr::InvalidFeedback(format!(
                "expected {} colors, got {}", self.word_len, colorings.len())));
        }

        // green + yellow squares per letter in this guess
        let mut observed = [0usize; ALPHABET_SIZE];
        // letters with at least one grey square in this guess
        let mut greyed = [false; ALPHABET_SIZE];

        for (pos, &c) in guess.as_bytes().iter().enumerate() {
            let idx = letter_idx(c);
            match colorings[pos] {
                Coloring::Correct => {
                    let known = *self.correct_positions.entry(pos).or_insert(c);
                    if known != c {
                        log::warn!(
                            "position {} was already green for '{}', ignoring '{}'",
                            pos + 1, known as char, c as char);
                    }
                    observed[idx] += 1;
                }
                Coloring::Misplaced => {
                    self.excluded_at_position.insert(pos, c);
                    observed[idx] += 1;
                }
                Coloring::Excluded => greyed[idx] = true,
            }
        }

        // the grey squares are processed last, once this guess' green/yellow tallies are complete
        for idx in 0..ALPHABET_SIZE {
            if greyed[idx] {
                self.exact_counts[idx] = Some(observed[idx]);
            }

            if observed[idx] > 0 {
                let min = self.min_counts[idx].get_or_insert(0);
                *min = (*min).max(observed[idx]);
            }

            if let (Some(exact), Some(min)) = (self.exact_counts[idx], self.min_counts[idx]) {
                if exact < min {
                    log::warn!(
                        "contradictory feedback for '{}': needs at least {} but exactly {}",
                        idx_letter(idx), min, exact);
                }
            }
        }

        self.guessed_words.insert(guess.to_string());
        Ok(())
    }

    ///
    /// The validity predicate. A word is allowed when:
    ///   * it has the green letter at every green position
    ///   * it doesn't have a known-misplaced letter back at the position it was seen yellow
    ///   * it has at least min_counts[L] of every letter L with a minimum
    ///   * it has exactly exact_counts[L] of every letter L with an exact count
    ///
    /// This doesn't look at guessed_words, see [ConstraintState::is_candidate].
    ///
    pub fn allows(&self, word: &str) -> bool {
        let bytes = word.as_bytes();
        if !is_wordle_str_bytes(bytes, self.word_len) {
            return false;
        }

        if self.correct_positions.iter().any(|(&pos, &c)| bytes[pos] != c) {
            return false;
        }

        if self.excluded_at_position.iter().any(|(&pos, &c)| bytes[pos] == c) {
            return false;
        }

        let counts = count_letters_bytes(bytes);
        let meets_min = self.min_counts.iter()
            .zip(counts.iter())
            .all(|(min, count)| min.map_or(true, |min| *count >= min));
        let meets_exact = self.exact_counts.iter()
            .zip(counts.iter())
            .all(|(exact, count)| exact.map_or(true, |exact| *count == exact));

        meets_min && meets_exact
    }

    /// Whether the word could still be the answer: allowed, and not already guessed
    pub fn is_candidate(&self, word: &str) -> bool {
        !self.has_guessed(word) && self.allows(word)
    }

    pub fn word_len(&self) -> usize {
        self.word_len
    }

    /// Whether position (0-based) is green
    pub fn is_green(&self, pos: usize) -> bool {
        self.correct_positions.contains_key(&pos)
    }

    pub fn correct_letter(&self, pos: usize) -> Option<char> {
        self.correct_positions.get(&pos).map(|c| *c as char)
    }

    pub fn excluded_letter(&self, pos: usize) -> Option<char> {
        self.excluded_at_position.get(&pos).map(|c| *c as char)
    }

    pub fn num_green(&self) -> usize {
        self.correct_positions.len()
    }

    pub fn min_count(&self, letter: char) -> Option<usize> {
        char_idx(letter).and_then(|idx| self.min_counts[idx])
    }

    pub fn exact_count(&self, letter: char) -> Option<usize> {
        char_idx(letter).and_then(|idx| self.exact_counts[idx])
    }

    ///
    /// Flags for each letter of the alphabet that is the latest yellow recorded at some position.
    /// A flag stays set after the letter turns green somewhere else, it's only cleared once a later
    /// yellow at the same position replaces it.
    ///
    pub fn misplaced_letters(&self) -> [bool; ALPHABET_SIZE] {
        let mut out = [false; ALPHABET_SIZE];
        for c in self.excluded_at_position.values() {
            out[letter_idx(*c)] = true;
        }

        out
    }

    pub fn has_guessed(&self, word: &str) -> bool {
        self.guessed_words.contains(word)
    }

    pub fn guessed_words(&self) -> &HashSet<String> {
        &self.guessed_words
    }
}

fn char_idx(letter: char) -> Option<usize> {
    if letter.is_ascii_lowercase() {
        Some(letter_idx(letter as u8))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn state_after(rounds: &[(&str, &str)]) -> ConstraintState {
        let mut state = ConstraintState::new(rounds[0].0.len());
        for (guess, answer) in rounds {
            let colorings = Colorings::with_guess_answer(guess, answer).unwrap();
            state.apply(guess, &colorings).unwrap();
        }
        state
    }

    #[test]
    fn test_green_and_yellow_recorded() {
        let state = state_after(&[("crate", "react")]);
        assert_eq!(state.correct_letter(2), Some('a'));
        assert!(state.is_green(2));
        assert_eq!(state.excluded_letter(0), Some('c'));
        assert_eq!(state.excluded_letter(4), Some('e'));
        assert_eq!(state.excluded_letter(2), None);
        for c in "crate".chars() {
            assert_eq!(state.min_count(c), Some(1), "letter {}", c);
            assert_eq!(state.exact_count(c), None, "letter {}", c);
        }
        assert!(state.has_guessed("crate"));
    }

    #[test]
    fn test_repeated_letter_with_single_copy_gets_exact_count() {
        // "geese" against "those": the last 'e' is green, the other two are grey
        let colorings = Colorings::with_guess_answer("geese", "those").unwrap();
        assert_eq!(colorings.num_correct() + colorings.yellow_positions().len(), 2);

        let state = state_after(&[("geese", "those")]);
        assert_eq!(state.exact_count('e'), Some(1));
        assert_eq!(state.min_count('e'), Some(1));
        assert_eq!(state.exact_count('g'), Some(0));
        assert_eq!(state.min_count('g'), None);

        assert!(state.allows("those"));
        assert!(state.allows("chose"));
        assert!(!state.allows("tease"), "two e's must be rejected once the count is exact");
    }

    #[test]
    fn test_grey_letter_not_assumed_absent() {
        // "speed" against "abide": one 'e' yellow, one grey. The answer still has an 'e'.
        let state = state_after(&[("speed", "abide")]);
        assert_eq!(state.exact_count('e'), Some(1));
        assert!(state.allows("abide"));
        assert!(!state.allows("abbot"), "an answer without 'e' is not allowed");
    }

    #[test]
    fn test_min_count_is_max_across_rounds() {
        let mut state = ConstraintState::new(5);
        state.apply("eerie", &Colorings::from_positions(5, &[1, 2], &[]).unwrap()).unwrap();
        assert_eq!(state.min_count('e'), Some(2));
        assert_eq!(state.exact_count('e'), Some(2));

        state.apply("steep", &Colorings::from_positions(5, &[3], &[]).unwrap()).unwrap();
        assert_eq!(state.min_count('e'), Some(2), "a lower tally never lowers the minimum");
        assert_eq!(state.exact_count('e'), Some(1), "a later grey overwrites the exact count");
    }

    #[test]
    fn test_latest_yellow_overwrites_position() {
        let mut state = ConstraintState::new(5);
        state.apply("alert", &Colorings::from_positions(5, &[1], &[]).unwrap()).unwrap();
        assert_eq!(state.excluded_letter(0), Some('a'));
        state.apply("trade", &Colorings::from_positions(5, &[1], &[]).unwrap()).unwrap();
        assert_eq!(state.excluded_letter(0), Some('t'));
        assert!(state.misplaced_letters()[letter_idx(b't')]);
        assert!(!state.misplaced_letters()[letter_idx(b'a')]);
    }

    #[test]
    fn test_misplaced_flag_survives_going_green() {
        let mut state = ConstraintState::new(5);
        state.apply("alert", &Colorings::from_positions(5, &[1], &[]).unwrap()).unwrap();
        state.apply("crate", &Colorings::from_positions(5, &[], &[3]).unwrap()).unwrap();
        assert_eq!(state.correct_letter(2), Some('a'));
        assert_eq!(state.excluded_letter(0), Some('a'));
        assert!(state.misplaced_letters()[letter_idx(b'a')]);
    }

    #[test]
    fn test_green_position_never_changes() {
        let mut state = ConstraintState::new(5);
        state.apply("crate", &Colorings::from_positions(5, &[], &[1]).unwrap()).unwrap();
        state.apply("brake", &Colorings::from_positions(5, &[], &[1]).unwrap()).unwrap();
        assert_eq!(state.correct_letter(0), Some('c'));
    }

    #[test_case("react", true ; "consistent")]
    #[test_case("trace", false ; "r back on its yellow spot")]
    #[test_case("cater", false ; "c back on its yellow spot")]
    #[test_case("reach", false ; "missing the t")]
    #[test_case("craters", false ; "wrong length")]
    fn test_allows_after_crate_against_react(word: &str, expected: bool) {
        let state = state_after(&[("crate", "react")]);
        assert_eq!(state.allows(word), expected, "word={}", word);
    }

    #[test]
    fn test_guessed_word_is_not_candidate() {
        let state = state_after(&[("crate", "crate")]);
        assert!(state.allows("crate"));
        assert!(!state.is_candidate("crate"));
    }

    #[test]
    fn test_apply_rejects_bad_input() {
        let mut state = ConstraintState::new(5);
        assert!(matches!(
            state.apply("crates", &Colorings::all_excluded(6)),
            Err(SolverErr::InvalidGuess(_))
        ));
        assert!(matches!(
            state.apply("crate", &Colorings::all_excluded(4)),
            Err(SolverErr::InvalidFeedback(_))
        ));
        assert!(state.guessed_words().is_empty());
    }

    #[test]
    fn test_true_answer_always_allowed() {
        let answer = "llama";
        let guesses = ["hello", "allay", "mamma", "label", "llama"];
        let mut state = ConstraintState::new(5);
        for guess in guesses {
            let colorings = Colorings::with_guess_answer(guess, answer).unwrap();
            state.apply(guess, &colorings).unwrap();
            assert!(state.allows(answer), "answer dropped after guessing {}", guess);
        }
    }
}
