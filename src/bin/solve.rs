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

use std::io::{self, BufRead, Write};
use anyhow::{bail, Result};
use clap::Parser;
use wordle_solver::wordle::*;

mod common;

use common::{init_logging, CorpusArgs, ScoreArgs};

/// Suggests Wordle guesses and narrows the word list using the colors you report back.
#[derive(Parser, Debug)]
#[command(name = "solve", version)]
struct Args {
    #[command(flatten)]
    corpus: CorpusArgs,

    #[command(flatten)]
    score: ScoreArgs,

    /// Play automatically against a known answer instead of asking for feedback
    #[arg(long)]
    target: Option<String>,

    #[arg(long, default_value_t = MAX_TRIES)]
    max_tries: usize,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = args.score.score_config()?;
    let corpus = args.corpus.load()?;
    let mut session = Session::new(&corpus, config)?.with_max_tries(args.max_tries);

    let state = match &args.target {
        Some(target) => play_target(&mut session, target)?,
        None => play_interactive(&mut session)?,
    };

    report(&session, state);
    Ok(())
}

fn play_target(session: &mut Session, target: &str) -> Result<GameState> {
    let target = normalize_wordle_word(target);
    if !is_wordle_str(&target, session.word_len()) {
        bail!("'{}' is not a {} letter word", target, session.word_len());
    }

    let state = session.play(|guess| {
        let colorings = Colorings::with_guess_answer(guess, &target)?;
        println!("{} {}", guess.to_uppercase(), colorings);
        Ok(colorings)
    })?;

    Ok(state)
}

fn play_interactive(session: &mut Session) -> Result<GameState> {
    println!(
        "{} words loaded. Enter positions 1 to {} separated by spaces, or nothing for none.",
        session.num_candidates(), session.word_len());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while !session.state().is_terminal() {
        let selection = match session.next_guess()? {
            Some(selection) => selection,
            None => break,
        };

        println!("\nGuess #{}: {}", session.tries() + 1, selection.word.to_uppercase());
        loop {
            let yellow = prompt(&mut lines, "YELLOW positions: ")?;
            let green = prompt(&mut lines, "GREEN positions: ")?;
            let applied = Colorings::parse_positions(&yellow)
                .and_then(|yellow| Ok((yellow, Colorings::parse_positions(&green)?)))
                .and_then(|(yellow, green)| session.apply_feedback(selection.word, &yellow, &green));

            match applied {
                Ok(_) => break,
                Err(SolverErr::InvalidFeedback(msg)) => eprintln!("{}, try again", msg),
                Err(err) => return Err(err.into()),
            }
        }

        if let Some(round) = session.rounds().last() {
            println!("{} {} words remain", round.colorings, round.remaining);
        }
    }

    Ok(session.state())
}

fn prompt<B: BufRead>(lines: &mut io::Lines<B>, text: &str) -> Result<String> {
    print!("{}", text);
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(line?),
        None => bail!("input closed before the game finished"),
    }
}

fn report(session: &Session, state: GameState) {
    match state {
        GameState::Won => println!("\nSolved in {} tries!", session.tries()),
        GameState::LostByTries => {
            println!("\nOut of tries after {} guesses.", session.tries());
            if !session.candidates().is_empty() {
                println!("Still possible: {}", session.candidates().join(", "));
            }
        }
        GameState::LostByExhaustion => println!("\nNo words left that match the feedback."),
        GameState::InProgress => {}
    }
}
