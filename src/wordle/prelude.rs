// Constants and letter helpers shared by every part of the solver.
//
// Word length is not a constant here: a corpus is loaded for one length at a time and everything
// downstream (constraints, scores, sessions) takes its length from the corpus it was built with.


// the length used when none is requested (today's puzzle is almost always 5 letters)
pub const DEFAULT_WORD_LENGTH: usize = 5;
// how many turns are you allowed to play?
pub const MAX_TRIES: usize = 6;
// how many letters are in the english alphabet? (don't change this lol)
pub const ALPHABET_SIZE: usize = (('z' as usize) - ('a' as usize)) + 1;
// a failed game counts as this many guesses past MAX_TRIES when averaging simulation results
pub const FAILED_GAME_PENALTY: usize = 5;

// This type allows you to switch between using f64 for all calculations and f32 if you so desire.
pub type WordleFloat = f64;

// normalized word frequencies never drop below this, so every corpus word has a weight in (0, 1]
pub const MIN_WORD_WEIGHT: WordleFloat = 0.0001;

pub use crate::util::*;

/// Letter counts for a word, indexed by the position of the letter in the alphabet.
pub type LetterCounts = [usize; ALPHABET_SIZE];

/// Returns the number of times each letter of the alphabet occurs in the argument. The &str should
/// be in lowercase. The output is indexed by the position of the letter in the alphabet.
pub fn count_letters(word: &str) -> LetterCounts {
    count_letters_bytes(word.as_bytes())
}

/// Same as [count_letters] but over raw ASCII bytes.
pub fn count_letters_bytes(word: &[u8]) -> LetterCounts {
    debug_assert!(word.iter().all(is_normal_wordle_char));
    let mut out = [0; ALPHABET_SIZE];
    for c in word {
        out[letter_idx(*c)] += 1;
    }

    out
}

/// Returns the index of the given letter within the alphabet (like 'a' = 0, 'b' = 1, etc...)
pub fn letter_idx(letter: u8) -> usize {
    (letter - b'a') as usize
}

/// Inverse of [letter_idx]
pub fn idx_letter(idx: usize) -> char {
    debug_assert!(idx < ALPHABET_SIZE);
    (b'a' + idx as u8) as char
}

/// Checks whether or not the passed string is a word of the given length made only of lowercase
/// letters.
pub fn is_wordle_str(v: &str, word_len: usize) -> bool {
    is_wordle_str_bytes(v.as_bytes(), word_len)
}

/// Checks whether or not the passed bytes represent an ASCII word of the given length.
pub fn is_wordle_str_bytes(v: &[u8], word_len: usize) -> bool {
    v.len() == word_len && v.iter().all(is_normal_wordle_char)
}

/// Given some input &str, try to clean it up such that it might be a wordle_str.
///
/// This function does not trim the length of a word or remove non alpha characters. It simply
/// cleans up words that are already valid wordle words by removing any spacing and converting
/// to all lowercase.
///
/// You should always verify that the output of this function passes is_wordle_str.
pub fn normalize_wordle_word(str: &str) -> String {
    str.trim().to_lowercase()
}

/// Verifies that a byte represents a lowercase alphabetic character (a valid wordle_str char)
pub fn is_normal_wordle_char(v: &u8) -> bool {
    v.is_ascii_lowercase()
}
