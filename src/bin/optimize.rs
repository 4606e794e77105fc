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

use std::{path::PathBuf, time::Instant};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use wordle_solver::wordle::*;

mod common;

use common::{init_logging, CorpusArgs, ScoreArgs};

/// Random search for score factors that solve a list of past answers in the fewest guesses.
#[derive(Parser, Debug)]
#[command(name = "optimize", version)]
struct Args {
    #[command(flatten)]
    corpus: CorpusArgs,

    /// Baseline config, simulated before the search starts. --hard also restricts the search.
    #[command(flatten)]
    score: ScoreArgs,

    /// Past answers, one per line. The bundled sample answers are used when omitted.
    #[arg(long)]
    answers: Option<PathBuf>,

    /// JSON file with the (low, high) range each factor is sampled from
    #[arg(long)]
    ranges: Option<PathBuf>,

    #[arg(short, long, default_value_t = 100)]
    iterations: usize,

    /// Seed for the sampler, random when omitted
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Tsv)]
    format: OutputFormat,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// tab separated rows under a header
    Tsv,
    /// one JSON object per line
    Json,
}

impl OutputFormat {
    fn header(&self) {
        if *self == OutputFormat::Tsv {
            println!("{}", Trial::TSV_HEADER);
        }
    }

    fn print(&self, trial: &Trial) -> Result<()> {
        match self {
            OutputFormat::Tsv => println!("{}", trial.to_tsv_row()),
            OutputFormat::Json => println!("{}", serde_json::to_string(trial)?),
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let baseline_config = args.score.score_config()?;
    let corpus = args.corpus.load()?;
    let answers = match &args.answers {
        Some(path) => load_answers(path, corpus.word_len())?,
        None => load_embedded_answers(corpus.word_len())?,
    };

    let known = answers.iter().filter(|a| corpus.contains(a)).count();
    if known < answers.len() {
        log::warn!("{} of {} answers are not in the corpus and will always fail", answers.len() - known, answers.len());
    }

    let ranges = match &args.ranges {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str::<ParamRanges>(&text)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => ParamRanges::default(),
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    eprintln!(
        "{} mode, {} answers, {} iterations, seed {}",
        if baseline_config.hard_mode { "HARD" } else { "EASY" }, answers.len(), args.iterations, seed);

    args.format.header();

    let start = Instant::now();
    let summary = run_simulation(&corpus, &answers, &baseline_config)?;
    let baseline = Trial {
        config: baseline_config,
        avg_guess_count: summary.avg_guess_count,
        failed_word_count: summary.num_failed(),
        elapsed_secs: start.elapsed().as_secs_f64(),
    };
    args.format.print(&baseline)?;
    if !summary.failed_words.is_empty() {
        log::info!("baseline failed on: {}", summary.failed_words.join(", "));
    }

    let mut optimizer = Optimizer::new(&corpus, &answers, baseline_config.hard_mode, seed)
        .with_ranges(ranges);

    let mut print_err = None;
    let best = optimizer.optimize(args.iterations, |trial| {
        if let Err(err) = args.format.print(trial) {
            print_err.get_or_insert(err);
        }
    })?;
    if let Some(err) = print_err {
        return Err(err);
    }

    let best = match best {
        Some(best) if best.is_better_than(&baseline) => best,
        _ => baseline,
    };
    eprintln!("best: {}", best.to_tsv_row());
    Ok(())
}
