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

use std::collections::HashMap;
use std::hash::Hash;
use std::path::PathBuf;
use std::sync::Arc;
use super::{prelude::*, data::*};

///
/// Every word of one length that may be guessed, each with a normalized frequency weight.
///
/// Weights start as raw occurrence counts and are divided by the largest count, so the most common
/// word has weight 1.0 and every other word has a weight in (0, 1]. Nothing changes after
/// construction; sessions borrow the corpus immutably and many sessions may share one.
///
#[derive(Clone, Debug)]
pub struct WordCorpus {
    word_len: usize,
    /// words in the order they were supplied (most common first for a sorted frequency list)
    words: Vec<String>,
    weights: HashMap<String, WordleFloat>,
}

impl WordCorpus {
    ///
    /// Builds a corpus from (word, raw count) pairs. Words that aren't word_len lowercase letters
    /// are dropped, and when a word is listed twice the first entry wins.
    ///
    pub fn from_counts<I, S>(word_len: usize, counts: I) -> Self
        where
            I: IntoIterator<Item=(S, WordleFloat)>,
            S: Into<String>,
    {
        let mut words = Vec::new();
        let mut weights = HashMap::new();
        for (word, count) in counts {
            let word = word.into();
            if !is_wordle_str(&word, word_len) {
                log::debug!("ignoring '{}', not a {} letter word", word, word_len);
                continue;
            }

            if weights.contains_key(&word) {
                continue;
            }

            weights.insert(word.clone(), count.max(0.0));
            words.push(word);
        }

        normalize_weights(&mut weights);

        Self {
            word_len,
            words,
            weights,
        }
    }

    pub fn word_len(&self) -> usize {
        self.word_len
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn iter(&self) -> impl Iterator<Item=&str> + '_ {
        self.words.iter().map(|w| w.as_str())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.weights.contains_key(word)
    }

    /// Normalized weight of the word across the whole corpus, 0.0 for unknown words
    pub fn weight(&self, word: &str) -> WordleFloat {
        self.weights.get(word).copied().unwrap_or(0.0)
    }
}

///
/// Divides every value by the largest one, so the values end up in (0, 1]. Values that would fall
/// under MIN_WORD_WEIGHT (including raw zeros) are raised to it.
///
/// Returns the largest value seen before normalizing, or None if there was nothing to normalize.
///
pub fn normalize_weights<K: Eq + Hash>(weights: &mut HashMap<K, WordleFloat>) -> Option<WordleFloat> {
    let max = weights.values().copied().fold(None, |acc: Option<WordleFloat>, v| {
        Some(acc.map_or(v, |m| m.max(v)))
    })?;

    for v in weights.values_mut() {
        *v = if max > 0.0 { *v / max } else { 0.0 };
        if *v < MIN_WORD_WEIGHT {
            *v = MIN_WORD_WEIGHT;
        }
    }

    Some(max)
}

///
/// The corpus weights of a subset of words (usually the remaining candidates), re-normalized so the
/// most common word in the subset has weight 1.0.
///
pub fn subset_weights<'a>(words: &[&'a str], corpus: &WordCorpus) -> HashMap<&'a str, WordleFloat> {
    let mut out: HashMap<&'a str, WordleFloat> = words.iter()
        .map(|w| (*w, corpus.weight(w)))
        .collect();
    normalize_weights(&mut out);
    out
}

/// Where a [CorpusCache] reads its words from
#[derive(Clone, Debug)]
pub enum CorpusSource {
    File { path: PathBuf, options: LoadOptions },
    Embedded,
    Text(Arc<str>),
}

impl CorpusSource {
    /// A file source using the separator implied by its extension
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let options = LoadOptions::for_path(&path);
        CorpusSource::File { path, options }
    }

    fn load(&self, word_len: usize) -> Result<WordCorpus, CorpusLoadError> {
        match self {
            CorpusSource::File { path, options } => load_corpus_with(path, word_len, options),
            CorpusSource::Embedded => load_embedded_corpus(word_len),
            CorpusSource::Text(text) => corpus_from_text(text, word_len, &LoadOptions::default(), "in-memory text"),
        }
    }
}

///
/// Loads and normalizes a corpus at most once per word length and hands out shared read-only
/// handles to it.
///
/// Create one of these at startup and pass the corpora it returns into each Session. Nothing in
/// here is global, so tests can build caches over synthetic word lists.
///
#[derive(Debug)]
pub struct CorpusCache {
    source: CorpusSource,
    corpora: HashMap<usize, Arc<WordCorpus>>,
}

impl CorpusCache {
    pub fn new(source: CorpusSource) -> Self {
        Self {
            source,
            corpora: HashMap::new(),
        }
    }

    /// Returns the corpus for word_len, loading it on first use
    pub fn get(&mut self, word_len: usize) -> Result<Arc<WordCorpus>, CorpusLoadError> {
        if let Some(corpus) = self.corpora.get(&word_len) {
            return Ok(Arc::clone(corpus));
        }

        let corpus = Arc::new(self.source.load(word_len)?);
        self.corpora.insert(word_len, Arc::clone(&corpus));
        Ok(corpus)
    }

    pub fn is_cached(&self, word_len: usize) -> bool {
        self.corpora.contains_key(&word_len)
    }

    pub fn source(&self) -> &CorpusSource {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_corpus() -> WordCorpus {
        WordCorpus::from_counts(5, [("crate", 10.0), ("trace", 9.0), ("react", 8.0), ("cater", 7.0)])
    }

    #[test]
    fn test_weights_normalized_by_max() {
        let corpus = scenario_corpus();
        assert_eq!(corpus.weight("crate"), 1.0);
        assert!((corpus.weight("cater") - 0.7).abs() < 1e-12);
        assert_eq!(corpus.weight("zzzzz"), 0.0);
        assert!(corpus.iter().all(|w| corpus.weight(w) > 0.0 && corpus.weight(w) <= 1.0));
    }

    #[test]
    fn test_from_counts_filters_and_keeps_first() {
        let corpus = WordCorpus::from_counts(5, [("crate", 4.0), ("tram", 9.0), ("crate", 8.0), ("zero", 0.0), ("zeros", 0.0)]);
        assert_eq!(corpus.words(), &["crate".to_string(), "zeros".to_string()]);
        assert_eq!(corpus.weight("crate"), 1.0);
        assert_eq!(corpus.weight("zeros"), MIN_WORD_WEIGHT);
    }

    #[test]
    fn test_normalize_empty_is_noop() {
        let mut empty: HashMap<&str, WordleFloat> = HashMap::new();
        assert_eq!(normalize_weights(&mut empty), None);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_subset_weights_renormalize() {
        let corpus = scenario_corpus();
        let weights = subset_weights(&["react", "cater"], &corpus);
        assert_eq!(weights.len(), 2);
        assert_eq!(weights["react"], 1.0);
        assert!((weights["cater"] - 7.0 / 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_cache_loads_once_per_length() {
        let text: Arc<str> = Arc::from("crate 10\ntrace 9\ntram 3\nbeam 1\n");
        let mut cache = CorpusCache::new(CorpusSource::Text(text));
        assert!(!cache.is_cached(5));

        let first = cache.get(5).unwrap();
        let second = cache.get(5).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 2);

        let four = cache.get(4).unwrap();
        assert_eq!(four.word_len(), 4);
        assert_eq!(four.len(), 2);
        assert!(cache.is_cached(4) && cache.is_cached(5));
    }

    #[test]
    fn test_cache_propagates_empty_corpus() {
        let mut cache = CorpusCache::new(CorpusSource::Text(Arc::from("crate 10\n")));
        assert!(matches!(cache.get(7), Err(CorpusLoadError::Empty { .. })));
        assert!(!cache.is_cached(7));
    }
}
