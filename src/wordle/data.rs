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

use crate::wordle::{prelude::*, corpus::WordCorpus};
use lazy_static::lazy_static;
use rust_embed::RustEmbed;
use std::path::{Path, PathBuf};
use std::str::Utf8Error;
use thiserror::Error;

// Bundled sample data, embedded into the binary so the solver works without any files on disk
pub const EMBED_DATA_DIRECTORY: &str = "txt_data/";
pub const SAMPLE_FREQUENCY_FILE_NAME: &str = "sample_frequencies.txt";
pub const SAMPLE_ANSWERS_FILE_NAME: &str = "sample_answers.txt";

// Only this many lines of a frequency list are read. Lists are sorted from most to least common,
// so the tail is made of words nobody will ever see as an answer.
pub const DEFAULT_MAX_LINES: usize = 100_000;

#[derive(RustEmbed)]
#[folder = "txt_data/"]
struct RawData;

lazy_static! {
    static ref SAMPLE_FREQUENCIES: Option<Result<String, Utf8Error>> =
        retrieve_embedded(SAMPLE_FREQUENCY_FILE_NAME);
    static ref SAMPLE_ANSWERS: Option<Result<String, Utf8Error>> =
        retrieve_embedded(SAMPLE_ANSWERS_FILE_NAME);
}

#[derive(Error, Debug)]
pub enum CorpusLoadError {
    #[error("unable to read '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("missing embedded data file '{0}'")]
    MissingEmbedded(&'static str),
    #[error(transparent)]
    Encoding(#[from] Utf8Error),
    #[error("no usable {word_len} letter words found in {origin}")]
    Empty { word_len: usize, origin: String },
}

/// How the word and its frequency are separated on each line of a frequency list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Separator {
    #[default]
    Whitespace,
    Comma,
}

impl Separator {
    /// `.csv` files are comma separated, anything else is assumed to be whitespace separated
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Separator::Comma,
            _ => Separator::Whitespace,
        }
    }

    fn split_line<'a>(&self, line: &'a str) -> Vec<&'a str> {
        match self {
            Separator::Whitespace => line.split_whitespace().collect(),
            Separator::Comma => line.split(',').map(str::trim).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub separator: Separator,
    /// read at most this many lines (None reads everything)
    pub max_lines: Option<usize>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            separator: Separator::default(),
            max_lines: Some(DEFAULT_MAX_LINES),
        }
    }
}

impl LoadOptions {
    pub fn for_path(path: &Path) -> Self {
        Self {
            separator: Separator::for_path(path),
            ..Self::default()
        }
    }
}

///
/// Parses a word frequency list. Each line holds a word and how often it occurs in some reference
/// text, for example "about 1226734006".
///
/// Lines are dropped (one at a time, never failing the whole list) when:
///   * they don't have exactly two fields
///   * the word isn't word_len letters long
///   * the word contains anything other than letters (apostrophes, hyphens, periods, ...)
///   * the frequency isn't a finite, non-negative number
///
pub fn parse_frequency_lines(text: &str, word_len: usize, options: &LoadOptions) -> Vec<(String, WordleFloat)> {
    let max_lines = options.max_lines.unwrap_or(usize::MAX);
    let mut out = Vec::new();

    for (line_no, line) in text.lines().take(max_lines).enumerate() {
        let fields = options.separator.split_line(line);
        let (raw_word, raw_count) = match fields.as_slice() {
            [word, count] if !word.is_empty() => (*word, *count),
            [] | [""] => continue,
            _ => {
                log::trace!("skipping malformed frequency line {}: '{}'", line_no + 1, line);
                continue;
            }
        };

        let word = normalize_wordle_word(raw_word);
        if word.chars().count() != word_len {
            continue;
        }

        if !is_wordle_str(&word, word_len) {
            log::trace!("skipping non-alphabetic word '{}' on line {}", word, line_no + 1);
            continue;
        }

        match raw_count.parse::<WordleFloat>() {
            Ok(count) if count.is_finite() && count >= 0.0 => out.push((word, count)),
            _ => log::trace!("skipping bad frequency '{}' on line {}", raw_count, line_no + 1),
        }
    }

    out
}

/// Parses a list of answers, one per line, keeping only valid words of the requested length.
pub fn parse_answer_lines(text: &str, word_len: usize) -> Vec<String> {
    text.lines()
        .map(normalize_wordle_word)
        .filter(|line| is_wordle_str(line, word_len))
        .collect()
}

///
/// Loads the word frequency list at path, keeping only words with word_len letters. The separator
/// is picked from the file extension.
///
pub fn load_corpus(path: impl AsRef<Path>, word_len: usize) -> Result<WordCorpus, CorpusLoadError> {
    let path = path.as_ref();
    load_corpus_with(path, word_len, &LoadOptions::for_path(path))
}

pub fn load_corpus_with(
    path: impl AsRef<Path>,
    word_len: usize,
    options: &LoadOptions,
) -> Result<WordCorpus, CorpusLoadError> {
    let path = path.as_ref();
    let text = read_file(path)?;
    corpus_from_text(&text, word_len, options, &path.display().to_string())
}

/// Builds a corpus from the frequency list bundled into the binary
pub fn load_embedded_corpus(word_len: usize) -> Result<WordCorpus, CorpusLoadError> {
    let text = embedded_str(SAMPLE_FREQUENCY_FILE_NAME, &SAMPLE_FREQUENCIES)?;
    corpus_from_text(text, word_len, &LoadOptions::default(), "the embedded sample list")
}

pub(crate) fn corpus_from_text(
    text: &str,
    word_len: usize,
    options: &LoadOptions,
    origin: &str,
) -> Result<WordCorpus, CorpusLoadError> {
    let corpus = WordCorpus::from_counts(word_len, parse_frequency_lines(text, word_len, options));
    if corpus.is_empty() {
        return Err(CorpusLoadError::Empty { word_len, origin: origin.to_string() });
    }

    log::debug!("got {} words of length {} from {}", corpus.len(), word_len, origin);
    Ok(corpus)
}

/// Loads a list of past answers (one word per line) used to evaluate scoring configurations
pub fn load_answers(path: impl AsRef<Path>, word_len: usize) -> Result<Vec<String>, CorpusLoadError> {
    let path = path.as_ref();
    let answers = parse_answer_lines(&read_file(path)?, word_len);
    log::debug!("got {} answers of length {} from {}", answers.len(), word_len, path.display());
    Ok(answers)
}

pub fn load_embedded_answers(word_len: usize) -> Result<Vec<String>, CorpusLoadError> {
    Ok(parse_answer_lines(embedded_str(SAMPLE_ANSWERS_FILE_NAME, &SAMPLE_ANSWERS)?, word_len))
}

fn read_file(path: &Path) -> Result<String, CorpusLoadError> {
    std::fs::read_to_string(path).map_err(|source| CorpusLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn embedded_str(
    name: &'static str,
    data: &'static Option<Result<String, Utf8Error>>,
) -> Result<&'static str, CorpusLoadError> {
    match data {
        Some(Ok(text)) => Ok(text.as_str()),
        Some(Err(err)) => Err(CorpusLoadError::Encoding(*err)),
        None => Err(CorpusLoadError::MissingEmbedded(name)),
    }
}

fn retrieve_embedded(name: &str) -> Option<Result<String, Utf8Error>> {
    RawData::get(name).map(|f| std::str::from_utf8(&f.data).map(str::to_string))
}
