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

// Command line pieces shared by the solve and optimize binaries.

use std::{fs, path::PathBuf, sync::Arc};
use anyhow::{Context, Result};
use clap::Args;
use log::LevelFilter;
use wordle_solver::wordle::*;

#[derive(Args, Debug)]
pub struct CorpusArgs {
    /// Word frequency list, one "word count" pair per line ("word,count" for .csv files).
    /// The bundled sample list is used when omitted.
    #[arg(long)]
    pub corpus: Option<PathBuf>,

    /// Number of letters in the puzzle
    #[arg(short = 'n', long, default_value_t = DEFAULT_WORD_LENGTH)]
    pub letter_count: usize,

    /// Read at most this many lines of the corpus file
    #[arg(long, default_value_t = DEFAULT_MAX_LINES)]
    pub max_lines: usize,
}

impl CorpusArgs {
    pub fn load(&self) -> Result<Arc<WordCorpus>> {
        let source = match &self.corpus {
            Some(path) => {
                let mut options = LoadOptions::for_path(path);
                options.max_lines = Some(self.max_lines);
                CorpusSource::File { path: path.clone(), options }
            }
            None => CorpusSource::Embedded,
        };

        let mut cache = CorpusCache::new(source);
        let corpus = cache.get(self.letter_count)
            .with_context(|| format!("loading {} letter words", self.letter_count))?;
        log::info!("loaded {} words of length {}", corpus.len(), corpus.word_len());
        Ok(corpus)
    }
}

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// JSON file with score factors. Factors it leaves out keep their defaults.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Only guess words that could still be the answer
    #[arg(long)]
    pub hard: bool,

    #[arg(long)]
    pub letter_freq_factor: Option<WordleFloat>,

    #[arg(long)]
    pub position_freq_factor: Option<WordleFloat>,

    #[arg(long)]
    pub word_freq_factor: Option<WordleFloat>,

    #[arg(long)]
    pub misplaced_letter_factor: Option<WordleFloat>,

    #[arg(long)]
    pub best_word_cutoff_factor: Option<WordleFloat>,
}

impl ScoreArgs {
    /// The config file (or the defaults), with any factors given on the command line applied on top
    pub fn score_config(&self) -> Result<ScoreConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str::<ScoreConfig>(&text)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => ScoreConfig::default(),
        };

        let overrides = [
            (&mut config.letter_freq_factor, self.letter_freq_factor),
            (&mut config.position_freq_factor, self.position_freq_factor),
            (&mut config.word_freq_factor, self.word_freq_factor),
            (&mut config.misplaced_letter_factor, self.misplaced_letter_factor),
            (&mut config.best_word_cutoff_factor, self.best_word_cutoff_factor),
        ];
        for (factor, value) in overrides {
            if let Some(value) = value {
                *factor = value;
            }
        }

        if self.hard {
            config.hard_mode = true;
        }

        config.validate()?;
        log::debug!("using {:?}", config);
        Ok(config)
    }
}

/// Warnings only by default, each -v adds a level. RUST_LOG still wins when set.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
