//! Phonetic encoders
//!
//! Two sound-alike keys: American Soundex (a letter plus three digits) and
//! Metaphone (variable-length consonant skeleton). Only ASCII letters are
//! encoded; any other character is dropped before encoding.

use serde::{Deserialize, Serialize};

/// Phonetic algorithm used for a lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhoneticAlgorithm {
    Soundex,
    Metaphone,
}

impl PhoneticAlgorithm {
    /// Code of `word`, or `None` if it has no ASCII letters
    pub fn encode(&self, word: &str) -> Option<String> {
        match self {
            PhoneticAlgorithm::Soundex => soundex(word),
            PhoneticAlgorithm::Metaphone => metaphone(word),
        }
    }
}

fn ascii_letters(word: &str) -> Vec<u8> {
    word.bytes()
        .filter(u8::is_ascii_alphabetic)
        .map(|b| b.to_ascii_uppercase())
        .collect()
}

fn soundex_digit(letter: u8) -> Option<u8> {
    match letter {
        b'B' | b'F' | b'P' | b'V' => Some(b'1'),
        b'C' | b'G' | b'J' | b'K' | b'Q' | b'S' | b'X' | b'Z' => Some(b'2'),
        b'D' | b'T' => Some(b'3'),
        b'L' => Some(b'4'),
        b'M' | b'N' => Some(b'5'),
        b'R' => Some(b'6'),
        _ => None,
    }
}

/// American Soundex
///
/// Adjacent letters with the same digit collapse, also across `H` and `W`;
/// a vowel between them keeps both.
pub fn soundex(word: &str) -> Option<String> {
    let letters = ascii_letters(word);
    let (&first, rest) = letters.split_first()?;

    let mut code = vec![first];
    let mut previous = soundex_digit(first);

    for &letter in rest {
        if code.len() == 4 {
            break;
        }
        match letter {
            b'H' | b'W' => continue,
            _ => match soundex_digit(letter) {
                Some(digit) => {
                    if previous != Some(digit) {
                        code.push(digit);
                    }
                    previous = Some(digit);
                }
                None => previous = None,
            },
        }
    }

    code.resize(4, b'0');
    String::from_utf8(code).ok()
}

fn is_vowel(letter: u8) -> bool {
    matches!(letter, b'A' | b'E' | b'I' | b'O' | b'U')
}

fn is_front_vowel(letter: u8) -> bool {
    matches!(letter, b'E' | b'I' | b'Y')
}

/// Metaphone
///
/// `None` when nothing in the word is pronounced.
pub fn metaphone(word: &str) -> Option<String> {
    let mut letters = ascii_letters(word);
    if letters.is_empty() {
        return None;
    }

    // Silent or altered initial letters
    match letters.as_slice() {
        [b'A', b'E', ..] | [b'G', b'N', ..] | [b'K', b'N', ..] | [b'P', b'N', ..] | [b'W', b'R', ..] => {
            letters.remove(0);
        }
        [b'X', ..] => letters[0] = b'S',
        [b'W', b'H', ..] => {
            letters.remove(1);
        }
        _ => {}
    }

    // Doubled letters sound once, except C (as in "accept")
    letters.dedup_by(|next, prev| next == prev && *next != b'C');

    let w = letters.as_slice();
    let n = w.len();
    let at = |i: usize| -> Option<u8> { w.get(i).copied() };
    let mut code = String::new();
    let mut skip_next = false;

    for i in 0..n {
        if skip_next {
            skip_next = false;
            continue;
        }
        let c = w[i];
        let prev = if i > 0 { at(i - 1) } else { None };
        let next = at(i + 1);
        let after_next = at(i + 2);

        match c {
            b'A' | b'E' | b'I' | b'O' | b'U' => {
                if i == 0 {
                    code.push(c as char);
                }
            }
            b'B' => {
                // Silent in a final "MB"
                if !(prev == Some(b'M') && i + 1 == n) {
                    code.push('B');
                }
            }
            b'C' => {
                if next == Some(b'I') && after_next == Some(b'A') {
                    code.push('X');
                } else if next == Some(b'H') {
                    code.push(if prev == Some(b'S') { 'K' } else { 'X' });
                } else if next.is_some_and(is_front_vowel) {
                    if prev != Some(b'S') {
                        code.push('S');
                    }
                } else {
                    code.push('K');
                }
            }
            b'D' => {
                if next == Some(b'G') && after_next.is_some_and(is_front_vowel) {
                    code.push('J');
                    skip_next = true;
                } else {
                    code.push('T');
                }
            }
            b'G' => {
                let silent_gh = next == Some(b'H') && !after_next.is_some_and(is_vowel);
                let silent_gn = next == Some(b'N')
                    && (i + 2 == n || (i + 4 == n && &w[i + 2..] == b"ED"));
                if silent_gh || silent_gn {
                    continue;
                }
                if next.is_some_and(is_front_vowel) && prev != Some(b'G') {
                    code.push('J');
                } else {
                    code.push('K');
                }
            }
            b'H' => {
                let after_digraph = matches!(prev, Some(b'C' | b'G' | b'P' | b'S' | b'T'));
                if !after_digraph && next.is_some_and(is_vowel) {
                    code.push('H');
                }
            }
            b'K' => {
                if prev != Some(b'C') {
                    code.push('K');
                }
            }
            b'P' => code.push(if next == Some(b'H') { 'F' } else { 'P' }),
            b'Q' => code.push('K'),
            b'S' => {
                if next == Some(b'H')
                    || (next == Some(b'I') && matches!(after_next, Some(b'O' | b'A')))
                {
                    code.push('X');
                } else {
                    code.push('S');
                }
            }
            b'T' => {
                if next == Some(b'I') && matches!(after_next, Some(b'O' | b'A')) {
                    code.push('X');
                } else if next == Some(b'H') {
                    code.push('0');
                } else if !(next == Some(b'C') && after_next == Some(b'H')) {
                    code.push('T');
                }
            }
            b'V' => code.push('F'),
            b'W' | b'Y' => {
                if next.is_some_and(is_vowel) {
                    code.push(c as char);
                }
            }
            b'X' => code.push_str("KS"),
            b'Z' => code.push('S'),
            other => code.push(other as char),
        }
    }

    (!code.is_empty()).then_some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soundex_reference_codes() {
        assert_eq!(soundex("Robert").as_deref(), Some("R163"));
        assert_eq!(soundex("Rupert").as_deref(), Some("R163"));
        assert_eq!(soundex("Tymczak").as_deref(), Some("T522"));
        assert_eq!(soundex("Pfister").as_deref(), Some("P236"));
        assert_eq!(soundex("Ashcraft").as_deref(), Some("A261"));
    }

    #[test]
    fn test_soundex_pads_short_words() {
        assert_eq!(soundex("Lee").as_deref(), Some("L000"));
        assert_eq!(soundex("nite").as_deref(), Some("N300"));
    }

    #[test]
    fn test_soundex_ignores_case_and_punctuation() {
        assert_eq!(soundex("o'brien"), soundex("OBRIEN"));
        assert_eq!(soundex("123"), None);
        assert_eq!(soundex(""), None);
    }

    #[test]
    fn test_metaphone_silent_initials() {
        assert_eq!(metaphone("knight").as_deref(), Some("NT"));
        assert_eq!(metaphone("nite").as_deref(), Some("NT"));
        assert_eq!(metaphone("wrack").as_deref(), Some("RK"));
        assert_eq!(metaphone("xylem").as_deref(), Some("SLM"));
    }

    #[test]
    fn test_metaphone_digraphs() {
        assert_eq!(metaphone("photograph").as_deref(), Some("FTKRF"));
        assert_eq!(metaphone("fotograf"), metaphone("photograph"));
        assert_eq!(metaphone("thumb").as_deref(), Some("0M"));
        assert_eq!(metaphone("church").as_deref(), Some("XRX"));
    }

    #[test]
    fn test_metaphone_soft_consonants() {
        assert_eq!(metaphone("city").as_deref(), Some("ST"));
        assert_eq!(metaphone("edge").as_deref(), Some("EJ"));
        assert_eq!(metaphone("nation").as_deref(), Some("NXN"));
    }

    #[test]
    fn test_algorithm_dispatch() {
        assert_eq!(
            PhoneticAlgorithm::Soundex.encode("burks"),
            PhoneticAlgorithm::Soundex.encode("bryce")
        );
        assert_eq!(PhoneticAlgorithm::Metaphone.encode("!!"), None);
    }
}
