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
use serde::Serialize;
use thiserror::Error;
use super::{prelude::*, color::*, constraints::*, corpus::*, scoring::*};

/// How many ranked words/letters are logged each round
const DIAGNOSTIC_TOP_WORDS: usize = 5;
const DIAGNOSTIC_TOP_LETTERS: usize = 3;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverErr {
    #[error("invalid feedback: {0}")]
    InvalidFeedback(String),
    #[error("provided guess is not valid: {0}")]
    InvalidGuess(String),
    #[error("the game is already over ({0})")]
    GameOver(GameState),
    #[error("invalid score config: {0}")]
    InvalidConfig(String),
}

///
/// Where a game stands. Every state other than InProgress is terminal.
///
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum GameState {
    InProgress,
    Won,
    /// used every try without seeing an all green guess
    LostByTries,
    /// the feedback ruled out every word, nothing is left to guess
    LostByExhaustion,
}

impl GameState {
    pub fn is_terminal(&self) -> bool {
        *self != GameState::InProgress
    }
}

impl Display for GameState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            GameState::InProgress => "in progress",
            GameState::Won => "won",
            GameState::LostByTries => "lost, out of tries",
            GameState::LostByExhaustion => "lost, no candidates left",
        })
    }
}

/// Which ranking a suggested guess came from
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GuessSource {
    /// the word could still be the answer
    Candidates,
    /// the word was picked from the whole corpus to split the remaining candidates
    Corpus,
}

#[derive(Copy, Clone, Debug)]
pub struct Selection<'a> {
    pub word: &'a str,
    pub score: Score,
    pub source: GuessSource,
}

impl<'a> Selection<'a> {
    fn new(candidate: ScoredCandidate<'a>, source: GuessSource) -> Self {
        Self {
            word: candidate.word,
            score: candidate.score,
            source,
        }
    }
}

///
/// Picks the next guess.
///
/// Candidates are ranked using their corpus weights re-normalized over the candidates. The best
/// candidate is returned when:
///   * hard mode is on
///   * fewer than 3 candidates remain
///   * there's no runner-up, or the best score beats the runner-up by more than a factor of
///     (1 + best_word_cutoff_factor)
///
/// Otherwise the whole corpus is ranked with the same letter/position scores but corpus-wide weights,
/// and its best word is returned even though it may not be a candidate itself.
///
/// When no candidate scores above 0 the best one by weight (then alphabetically) is still returned,
/// so None means there are no candidates at all.
///
pub fn select_guess<'a>(
    candidates: &[&'a str],
    corpus: &'a WordCorpus,
    constraints: &ConstraintState,
    config: &ScoreConfig,
) -> Option<Selection<'a>> {
    if candidates.is_empty() {
        return None;
    }

    let scores = FrequencyScores::compute(candidates, constraints, config);
    let ranked = rank_candidates(candidates, corpus, &scores, constraints, config, 2);
    if ranked.is_empty() {
        // nothing scores above 0 (one candidate left with a zero word_freq_factor, for example)
        return best_unscored_candidate(candidates, corpus, &scores, constraints, config)
            .map(|best| Selection::new(best, GuessSource::Candidates));
    }

    let decisive = match ranked.as_slice() {
        [best, second, ..] => best.score.abs > second.score.abs * (1.0 + config.best_word_cutoff_factor),
        [_] => true,
        [] => false,
    };

    if config.hard_mode || candidates.len() < 3 || decisive {
        return ranked.first().map(|best| Selection::new(*best, GuessSource::Candidates));
    }

    let corpus_ranked = rank_words(
        corpus.iter(), |w| corpus.weight(w), &scores, constraints, config, 1);

    corpus_ranked.first()
        .map(|best| Selection::new(*best, GuessSource::Corpus))
        .or_else(|| ranked.first().map(|best| Selection::new(*best, GuessSource::Candidates)))
}

fn best_unscored_candidate<'a>(
    candidates: &[&'a str],
    corpus: &WordCorpus,
    scores: &FrequencyScores,
    constraints: &ConstraintState,
    config: &ScoreConfig,
) -> Option<ScoredCandidate<'a>> {
    let weights = subset_weights(candidates, corpus);
    candidates.iter()
        .map(|&word| ScoredCandidate {
            word,
            score: score_word(word, scores, weights.get(word).copied().unwrap_or(0.0), constraints, config),
        })
        .top_k_by(1, |a, b| a.rank_cmp(b))
        .into_iter()
        .next()
}

fn rank_candidates<'a>(
    candidates: &[&'a str],
    corpus: &WordCorpus,
    scores: &FrequencyScores,
    constraints: &ConstraintState,
    config: &ScoreConfig,
    k: usize,
) -> Vec<ScoredCandidate<'a>> {
    let weights = subset_weights(candidates, corpus);
    rank_words(
        candidates.iter().copied(),
        |w| weights.get(w).copied().unwrap_or(0.0),
        scores,
        constraints,
        config,
        k)
}

/// One guess and the feedback it got
#[derive(Clone, Debug, PartialEq)]
pub struct Round {
    pub guess: String,
    pub colorings: Colorings,
    /// how many candidates the feedback removed
    pub eliminated: usize,
    /// candidates left afterwards
    pub remaining: usize,
}

///
/// A single game: the accumulated constraints, the candidates still consistent with them, and the
/// try counter.
///
/// The corpus is borrowed, so any number of sessions can share one loaded corpus (see
/// [CorpusCache]). Everything a session mutates is owned by it.
///
#[derive(Clone, Debug)]
pub struct Session<'a> {
    corpus: &'a WordCorpus,
    config: ScoreConfig,
    constraints: ConstraintState,
    /// subset of the corpus (in corpus order) still consistent with constraints
    candidates: Vec<&'a str>,
    rounds: Vec<Round>,
    max_tries: usize,
    state: GameState,
}

impl<'a> Session<'a> {
    pub fn new(corpus: &'a WordCorpus, config: ScoreConfig) -> Result<Self, SolverErr> {
        config.validate()?;

        let state = if corpus.is_empty() {
            GameState::LostByExhaustion
        } else {
            GameState::InProgress
        };

        Ok(Self {
            corpus,
            config,
            constraints: ConstraintState::new(corpus.word_len()),
            candidates: corpus.iter().collect(),
            rounds: Vec::new(),
            max_tries: MAX_TRIES,
            state,
        })
    }

    pub fn with_max_tries(mut self, max_tries: usize) -> Self {
        self.max_tries = max_tries;
        self
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_won(&self) -> bool {
        self.state == GameState::Won
    }

    pub fn is_lost(&self) -> bool {
        matches!(self.state, GameState::LostByTries | GameState::LostByExhaustion)
    }

    /// Guesses made so far
    pub fn tries(&self) -> usize {
        self.rounds.len()
    }

    pub fn max_tries(&self) -> usize {
        self.max_tries
    }

    pub fn word_len(&self) -> usize {
        self.corpus.word_len()
    }

    pub fn candidates(&self) -> &[&'a str] {
        &self.candidates
    }

    pub fn num_candidates(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_candidate(&self, word: &str) -> bool {
        self.candidates.contains(&word)
    }

    pub fn constraints(&self) -> &ConstraintState {
        &self.constraints
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn config(&self) -> &ScoreConfig {
        &self.config
    }

    pub fn corpus(&self) -> &'a WordCorpus {
        self.corpus
    }

    ///
    /// Suggests the next word to guess. A None means the candidates ran out and the session is now
    /// LostByExhaustion.
    ///
    pub fn next_guess(&mut self) -> Result<Option<Selection<'a>>, SolverErr> {
        self.ensure_in_progress()?;

        let selection = select_guess(&self.candidates, self.corpus, &self.constraints, &self.config);
        match &selection {
            Some(selection) => {
                log::debug!(
                    "suggesting '{}' from {:?} (score {:.4}, {} candidates)",
                    selection.word, selection.source, selection.score.abs, self.candidates.len());
            }
            None => {
                log::info!("no candidates left after {} tries", self.tries());
                self.state = GameState::LostByExhaustion;
            }
        }

        Ok(selection)
    }

    /// The k best remaining candidates, best first
    pub fn top_guesses(&self, k: usize) -> Vec<ScoredCandidate<'a>> {
        let scores = FrequencyScores::compute(&self.candidates, &self.constraints, &self.config);
        rank_candidates(&self.candidates, self.corpus, &scores, &self.constraints, &self.config, k)
    }

    ///
    /// Records the feedback for a guess, given as 1-based yellow and green positions.
    ///
    /// Fails with InvalidFeedback for positions outside [1, word_len] or marked both yellow and
    /// green, with InvalidGuess for a guess of the wrong shape, and with GameOver once the session is
    /// finished. The session is unchanged when this fails.
    ///
    pub fn apply_feedback(&mut self, guess: &str, yellow: &[usize], green: &[usize]) -> Result<GameState, SolverErr> {
        self.ensure_in_progress()?;
        let colorings = Colorings::from_positions(self.word_len(), yellow, green)?;
        self.apply_colorings(guess, colorings)
    }

    ///
    /// Records the colors shown for a guess, then either marks the session Won (every square green)
    /// or refilters the candidates and checks whether the tries ran out.
    ///
    pub fn apply_colorings(&mut self, guess: &str, colorings: Colorings) -> Result<GameState, SolverErr> {
        self.ensure_in_progress()?;

        let guess = normalize_wordle_word(guess);
        self.constraints.apply(&guess, &colorings)?;

        let eliminated = if colorings.is_correct() {
            self.state = GameState::Won;
            0
        } else {
            self.refilter(&guess)
        };

        log::info!(
            "guess {} '{}' {}: eliminated {}, {} remain",
            self.rounds.len() + 1, guess, colorings, eliminated, self.candidates.len());

        self.rounds.push(Round {
            guess,
            colorings,
            eliminated,
            remaining: self.candidates.len(),
        });

        if !self.state.is_terminal() && self.tries() >= self.max_tries {
            self.state = GameState::LostByTries;
        }

        if self.state == GameState::InProgress {
            self.log_diagnostics();
        }

        Ok(self.state)
    }

    ///
    /// Drops every candidate the current constraints rule out, plus the guess and any other word
    /// already guessed. Returns how many were dropped.
    ///
    /// Only ever filters the current candidates, so the set never grows back.
    ///
    pub fn refilter(&mut self, guess: &str) -> usize {
        let before = self.candidates.len();
        let constraints = &self.constraints;
        self.candidates.retain(|word| *word != guess && constraints.is_candidate(word));
        before - self.candidates.len()
    }

    ///
    /// Plays rounds until the session ends, asking feedback for the colors of each suggested guess.
    ///
    pub fn play<F>(&mut self, mut feedback: F) -> Result<GameState, SolverErr>
        where
            F: FnMut(&str) -> Result<Colorings, SolverErr>,
    {
        while !self.state.is_terminal() {
            let guess = match self.next_guess()? {
                Some(selection) => selection.word,
                None => break,
            };

            let colorings = feedback(guess)?;
            self.apply_colorings(guess, colorings)?;
        }

        Ok(self.state)
    }

    fn ensure_in_progress(&self) -> Result<(), SolverErr> {
        if self.state.is_terminal() {
            Err(SolverErr::GameOver(self.state))
        } else {
            Ok(())
        }
    }

    fn log_diagnostics(&self) {
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }

        let scores = FrequencyScores::compute(&self.candidates, &self.constraints, &self.config);
        log::debug!("top letters: {:?}", scores.top_letters(DIAGNOSTIC_TOP_LETTERS));

        let top = rank_candidates(
            &self.candidates, self.corpus, &scores, &self.constraints, &self.config, DIAGNOSTIC_TOP_WORDS);
        for (i, candidate) in top.iter().enumerate() {
            log::debug!("  {}. {} ({:.4})", i + 1, candidate.word, candidate.score.abs);
        }
    }
}
