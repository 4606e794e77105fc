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

use std::fmt::{Display, Formatter};
use std::ops::{Index, IndexMut};
use self::Coloring::*;
use super::{prelude::*, game::SolverErr};

///
/// The three different colors that a wordle square can be...
///   * Excluded = the letter is not in the answer (also indicates no further instances of a letter
///                when another square with the same letter is colored misplaced/correct)
///   * Misplaced = the letter is in the answer, but not in this position
///   * Correct = the letter is in the answer at this position
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coloring {
    Excluded,
    Misplaced,
    Correct,
}

impl Coloring {
    /// Gives the best emoji to represent the coloring (used for debug printing)
    pub fn emoji(&self) -> &'static str {
        match self {
            Excluded => "⬛",
            Misplaced => "🟨",
            Correct => "🟩",
        }
    }
}

///
/// The colors shown for one guess, one square per letter. Built either from what the player typed
/// in (1-based yellow/green position lists) or computed from a guess and a known answer.
///
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Colorings(pub Vec<Coloring>);

impl From<Vec<Coloring>> for Colorings {
    fn from(v: Vec<Coloring>) -> Self {
        Self(v)
    }
}

/// Delegate indexing of the struct to it's inner value
impl Index<usize> for Colorings {
    type Output = Coloring;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// Delegate mutable indexing of the struct to it's inner value
impl IndexMut<usize> for Colorings {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl Colorings {
    /// All squares Excluded
    pub fn all_excluded(word_len: usize) -> Self {
        Self(vec![Excluded; word_len])
    }

    ///
    /// Compute what colors would be shown given some guess & answer. For example if the guess was
    /// "tares" and the answer was "scare" we should compute [Excluded, Misplaced, Misplaced, Misplaced, Misplaced]
    ///
    /// This is implemented by:
    /// * computing a "budget" for each letter in the alphabet (based on their frequency in the answer)
    /// * performing a "GREEN pass" which marks all correctly positioned letters (and updates the budget)
    /// * performing a "YELLOW pass" to mark all misplaced letters (based on the remaining budget for each letter)
    ///
    /// A repeated guess letter therefore only gets as many green/yellow squares as the answer has
    /// copies of it; the rest stay Excluded.
    ///
    pub fn with_guess_answer(guess: &str, answer: &str) -> Result<Self, SolverErr> {
        let word_len = answer.len();
        if !is_wordle_str(answer, word_len) {
            return Err(SolverErr::InvalidGuess(answer.to_string()));
        }
        if !is_wordle_str(guess, word_len) {
            return Err(SolverErr::InvalidGuess(guess.to_string()));
        }

        let mut out = Self::all_excluded(word_len);
        let mut answer_letter_counts = count_letters(answer);
        let answer_bytes = answer.as_bytes();
        let guess_bytes = guess.as_bytes();

        // GREEN pass
        for i in 0..word_len {
            let gc = guess_bytes[i];
            if gc == answer_bytes[i] {
                answer_letter_counts[letter_idx(gc)] -= 1;
                out[i] = Correct;
            }
        }

        // YELLOW pass
        for i in 0..word_len {
            if out[i] != Correct {
                let counter = &mut answer_letter_counts[letter_idx(guess_bytes[i])];
                if *counter > 0 {
                    *counter -= 1;
                    out[i] = Misplaced;
                }
            }
        }

        Ok(out)
    }

    ///
    /// Builds colorings from the 1-based position lists a player reports. Every position not listed
    /// is Excluded.
    ///
    /// Fails with InvalidFeedback when a position is outside [1, word_len] or is listed as both
    /// yellow and green. Listing the same position twice in one list is harmless.
    ///
    pub fn from_positions(word_len: usize, yellow: &[usize], green: &[usize]) -> Result<Self, SolverErr> {
        let mut out = Self::all_excluded(word_len);
        for (positions, coloring) in [(green, Correct), (yellow, Misplaced)] {
            for &pos in positions {
                if pos == 0 || pos > word_len {
                    return Err(SolverErr::InvalidFeedback(format!(
                        "position {} is outside 1..={}", pos, word_len)));
                }

                let square = &mut out[pos - 1];
                if *square != Excluded && *square != coloring {
                    return Err(SolverErr::InvalidFeedback(format!(
                        "position {} is marked both green and yellow", pos)));
                }
                *square = coloring;
            }
        }

        Ok(out)
    }

    /// Parses whitespace separated 1-based positions such as "2 5". Empty input means no positions.
    pub fn parse_positions(text: &str) -> Result<Vec<usize>, SolverErr> {
        text.split_whitespace()
            .map(|part| part.parse::<usize>()
                .map_err(|_| SolverErr::InvalidFeedback(format!("'{}' is not a position", part))))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 1-based positions colored Misplaced
    pub fn yellow_positions(&self) -> Vec<usize> {
        self.positions_of(Misplaced)
    }

    /// 1-based positions colored Correct
    pub fn green_positions(&self) -> Vec<usize> {
        self.positions_of(Correct)
    }

    fn positions_of(&self, coloring: Coloring) -> Vec<usize> {
        self.0.iter()
            .enumerate()
            .filter(|(_, c)| **c == coloring)
            .map(|(i, _)| i + 1)
            .collect()
    }

    /// How many squares are green
    pub fn num_correct(&self) -> usize {
        self.0.iter().filter(|c| **c == Correct).count()
    }

    /// Whether or not every square is green (the guess was the answer)
    pub fn is_correct(&self) -> bool {
        !self.is_empty() && self.num_correct() == self.len()
    }
}

impl Display for Colorings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for c in &self.0 {
            f.write_str(c.emoji())?;
        }

        Ok(())
    }
}
