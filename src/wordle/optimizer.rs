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

use std::time::Instant;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use super::{prelude::*, color::*, corpus::*, game::*, scoring::*};

/// Outcome of one game played against a known answer
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionResult {
    pub target: String,
    pub guesses_used: usize,
    pub won: bool,
    pub state: GameState,
}

///
/// Plays a whole game against a known answer, computing the feedback for each guess instead of
/// asking anyone for it.
///
pub fn run_session(corpus: &WordCorpus, target: &str, config: &ScoreConfig) -> Result<SessionResult, SolverErr> {
    let target = normalize_wordle_word(target);
    if !is_wordle_str(&target, corpus.word_len()) {
        return Err(SolverErr::InvalidGuess(target));
    }

    let mut session = Session::new(corpus, *config)?;
    let state = session.play(|guess| Colorings::with_guess_answer(guess, &target))?;

    Ok(SessionResult {
        guesses_used: session.tries(),
        won: state == GameState::Won,
        state,
        target,
    })
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationSummary {
    pub games: usize,
    /// average guesses per game, where a lost game counts as max_tries + FAILED_GAME_PENALTY
    pub avg_guess_count: WordleFloat,
    pub failed_words: Vec<String>,
}

impl SimulationSummary {
    pub fn num_failed(&self) -> usize {
        self.failed_words.len()
    }
}

///
/// Plays one isolated game per answer (in parallel) and summarizes how well the config did.
///
pub fn run_simulation(corpus: &WordCorpus, answers: &[String], config: &ScoreConfig) -> Result<SimulationSummary, SolverErr> {
    config.validate()?;

    let results = answers
        .par_iter()
        .map(|answer| run_session(corpus, answer, config))
        .collect::<Result<Vec<_>, _>>()?;

    let total: usize = results.iter()
        .map(|result| if result.won { result.guesses_used } else { MAX_TRIES + FAILED_GAME_PENALTY })
        .sum();

    let avg_guess_count = if results.is_empty() {
        0.0
    } else {
        total as WordleFloat / results.len() as WordleFloat
    };

    let failed_words = results.into_iter()
        .filter(|result| !result.won)
        .map(|result| result.target)
        .collect::<Vec<_>>();

    Ok(SimulationSummary {
        games: answers.len(),
        avg_guess_count,
        failed_words,
    })
}

/// Inclusive (low, high) bounds each factor is sampled from
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamRanges {
    pub letter_freq: (WordleFloat, WordleFloat),
    pub position_freq: (WordleFloat, WordleFloat),
    pub word_freq: (WordleFloat, WordleFloat),
    pub misplaced_letter: (WordleFloat, WordleFloat),
    /// ignored in hard mode, where the cutoff is always 0
    pub best_word_cutoff: (WordleFloat, WordleFloat),
}

impl Default for ParamRanges {
    fn default() -> Self {
        Self {
            letter_freq: (0.5, 3.0),
            position_freq: (0.0, 2.0),
            word_freq: (0.5, 3.0),
            misplaced_letter: (0.0, 1.0),
            best_word_cutoff: (0.0, 1.0),
        }
    }
}

fn uniform<R: Rng>(rng: &mut R, (low, high): (WordleFloat, WordleFloat)) -> WordleFloat {
    if high <= low {
        low
    } else {
        rng.gen_range(low..=high)
    }
}

/// One sampled config and how it did
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Trial {
    pub config: ScoreConfig,
    pub avg_guess_count: WordleFloat,
    pub failed_word_count: usize,
    pub elapsed_secs: WordleFloat,
}

impl Trial {
    pub const TSV_HEADER: &'static str = "letter_freq_factor\tposition_freq_factor\tword_freq_factor\t\
        misplaced_letter_factor\tbest_word_cutoff_factor\thard_mode\tavg_guess_count\tfailed_word_count\telapsed_secs";

    pub fn to_tsv_row(&self) -> String {
        format!(
            "{:.3}\t{:.3}\t{:.3}\t{:.3}\t{:.3}\t{}\t{:.4}\t{}\t{:.1}",
            self.config.letter_freq_factor,
            self.config.position_freq_factor,
            self.config.word_freq_factor,
            self.config.misplaced_letter_factor,
            self.config.best_word_cutoff_factor,
            self.config.hard_mode.to_string().to_uppercase(),
            self.avg_guess_count,
            self.failed_word_count,
            self.elapsed_secs)
    }

    /// Lower average wins, then fewer failed words
    pub fn is_better_than(&self, other: &Trial) -> bool {
        self.avg_guess_count
            .total_cmp(&other.avg_guess_count)
            .then(self.failed_word_count.cmp(&other.failed_word_count))
            .is_lt()
    }
}

///
/// Random search over ScoreConfig factors. Every trial samples a config and runs a full simulation
/// over the answer list with it.
///
/// The rng is seeded explicitly so a run can be repeated.
///
pub struct Optimizer<'a> {
    corpus: &'a WordCorpus,
    answers: &'a [String],
    ranges: ParamRanges,
    hard_mode: bool,
    rng: StdRng,
}

impl<'a> Optimizer<'a> {
    pub fn new(corpus: &'a WordCorpus, answers: &'a [String], hard_mode: bool, seed: u64) -> Self {
        Self {
            corpus,
            answers,
            ranges: ParamRanges::default(),
            hard_mode,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn with_ranges(mut self, ranges: ParamRanges) -> Self {
        self.ranges = ranges;
        self
    }

    pub fn sample_config(&mut self) -> ScoreConfig {
        let ranges = self.ranges;
        let rng = &mut self.rng;
        ScoreConfig {
            letter_freq_factor: uniform(rng, ranges.letter_freq),
            position_freq_factor: uniform(rng, ranges.position_freq),
            word_freq_factor: uniform(rng, ranges.word_freq),
            misplaced_letter_factor: uniform(rng, ranges.misplaced_letter),
            best_word_cutoff_factor: if self.hard_mode { 0.0 } else { uniform(rng, ranges.best_word_cutoff) },
            hard_mode: self.hard_mode,
        }
    }

    /// Samples a config and simulates it. None when the sample was skipped as unusable.
    pub fn run_trial(&mut self) -> Result<Option<Trial>, SolverErr> {
        let config = self.sample_config();
        if config.validate().is_err() {
            log::debug!("skipping unusable sample {:?}", config);
            return Ok(None);
        }

        let start = Instant::now();
        let summary = run_simulation(self.corpus, self.answers, &config)?;
        Ok(Some(Trial {
            config,
            avg_guess_count: summary.avg_guess_count,
            failed_word_count: summary.num_failed(),
            elapsed_secs: start.elapsed().as_secs_f64(),
        }))
    }

    ///
    /// Runs the given number of trials, handing each finished one to on_trial, and returns the best.
    ///
    pub fn optimize<F>(&mut self, iterations: usize, mut on_trial: F) -> Result<Option<Trial>, SolverErr>
        where
            F: FnMut(&Trial),
    {
        log::info!(
            "optimizing {} mode over {} answers for {} iterations",
            if self.hard_mode { "hard" } else { "easy" }, self.answers.len(), iterations);

        let mut best: Option<Trial> = None;
        for _ in 0..iterations {
            let trial = match self.run_trial()? {
                Some(trial) => trial,
                None => continue,
            };

            on_trial(&trial);
            if best.as_ref().map_or(true, |b| trial.is_better_than(b)) {
                best = Some(trial);
            }
        }

        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordle::{load_embedded_answers, load_embedded_corpus};

    fn scenario_corpus() -> WordCorpus {
        WordCorpus::from_counts(5, [("crate", 10.0), ("trace", 9.0), ("react", 8.0), ("cater", 7.0)])
    }

    fn answers(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_run_session_wins() {
        let corpus = scenario_corpus();
        let result = run_session(&corpus, "react", &ScoreConfig::default()).unwrap();
        assert!(result.won);
        assert_eq!(result.state, GameState::Won);
        assert_eq!(result.guesses_used, 2);
    }

    #[test]
    fn test_run_session_unknown_answer_exhausts() {
        let corpus = scenario_corpus();
        let result = run_session(&corpus, "zzzzz", &ScoreConfig::default()).unwrap();
        assert!(!result.won);
        assert_eq!(result.state, GameState::LostByExhaustion);
        assert_eq!(result.guesses_used, 1);
    }

    #[test]
    fn test_run_session_rejects_bad_target() {
        let corpus = scenario_corpus();
        assert!(matches!(
            run_session(&corpus, "reacts", &ScoreConfig::default()),
            Err(SolverErr::InvalidGuess(_))
        ));
    }

    #[test]
    fn test_simulation_penalizes_failures() {
        let corpus = scenario_corpus();
        let answers = answers(&["crate", "trace", "react", "cater", "zzzzz"]);
        let summary = run_simulation(&corpus, &answers, &ScoreConfig::default()).unwrap();
        assert_eq!(summary.games, 5);
        assert_eq!(summary.failed_words, vec!["zzzzz".to_string()]);
        let expected = (1 + 2 + 2 + 2 + MAX_TRIES + FAILED_GAME_PENALTY) as WordleFloat / 5.0;
        assert!((summary.avg_guess_count - expected).abs() < 1e-12);
    }

    #[test]
    fn test_sample_answers_all_solved() {
        let corpus = load_embedded_corpus(DEFAULT_WORD_LENGTH).unwrap();
        let answers = load_embedded_answers(DEFAULT_WORD_LENGTH).unwrap();
        for config in [ScoreConfig::default(), ScoreConfig::hard()] {
            let summary = run_simulation(&corpus, &answers, &config).unwrap();
            assert_eq!(summary.games, answers.len());
            assert!(summary.failed_words.is_empty(), "failed: {:?}", summary.failed_words);
            assert!(summary.avg_guess_count <= MAX_TRIES as WordleFloat);
        }
    }

    #[test]
    fn test_samples_stay_in_range() {
        let corpus = scenario_corpus();
        let answers = answers(&["react"]);
        let ranges = ParamRanges::default();

        let mut easy = Optimizer::new(&corpus, &answers, false, 7);
        let mut hard = Optimizer::new(&corpus, &answers, true, 7);
        let within = |v: WordleFloat, (lo, hi): (WordleFloat, WordleFloat)| v >= lo && v <= hi;
        for _ in 0..200 {
            let config = easy.sample_config();
            assert!(!config.hard_mode);
            assert!(within(config.letter_freq_factor, ranges.letter_freq));
            assert!(within(config.position_freq_factor, ranges.position_freq));
            assert!(within(config.word_freq_factor, ranges.word_freq));
            assert!(within(config.misplaced_letter_factor, ranges.misplaced_letter));
            assert!(within(config.best_word_cutoff_factor, ranges.best_word_cutoff));

            let config = hard.sample_config();
            assert!(config.hard_mode);
            assert_eq!(config.best_word_cutoff_factor, 0.0);
        }
    }

    #[test]
    fn test_same_seed_same_samples() {
        let corpus = scenario_corpus();
        let answers = answers(&["react"]);
        let mut a = Optimizer::new(&corpus, &answers, false, 42);
        let mut b = Optimizer::new(&corpus, &answers, false, 42);
        for _ in 0..10 {
            assert_eq!(a.sample_config(), b.sample_config());
        }
    }

    #[test]
    fn test_unusable_samples_skipped() {
        let corpus = scenario_corpus();
        let answers = answers(&["react"]);
        let zero = ParamRanges {
            letter_freq: (0.0, 0.0),
            position_freq: (0.0, 0.0),
            word_freq: (0.0, 0.0),
            ..ParamRanges::default()
        };
        let mut optimizer = Optimizer::new(&corpus, &answers, false, 1).with_ranges(zero);
        let mut seen = 0;
        let best = optimizer.optimize(5, |_| seen += 1).unwrap();
        assert!(best.is_none());
        assert_eq!(seen, 0);
    }

    #[test]
    fn test_optimize_reports_best() {
        let corpus = scenario_corpus();
        let answers = answers(&["crate", "trace", "react", "cater"]);
        let mut optimizer = Optimizer::new(&corpus, &answers, false, 3);
        let mut trials = Vec::new();
        let best = optimizer.optimize(4, |trial| trials.push(trial.clone())).unwrap().unwrap();

        assert_eq!(trials.len(), 4);
        assert!(trials.iter().all(|t| !t.is_better_than(&best)));
        assert_eq!(best.to_tsv_row().split('\t').count(), Trial::TSV_HEADER.split('\t').count());
    }
}
