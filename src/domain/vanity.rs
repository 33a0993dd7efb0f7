//! Keypad decoding for toll-free vanity numbers and spelled-out digits.
//!
//! Both transforms turn letters into digits so the phone pattern can see
//! the number. They only run over whole text; in-place redaction works on
//! the page's own glyphs and cannot change string lengths.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Toll-free prefix followed by a mnemonic word, e.g. `1-800-FLOWERS`.
///
/// The word is four or more letters and may itself contain hyphens
/// (`1-888-GO-FEDEX`), which are dropped on decoding.
static VANITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(1-8(?:00|33|44|55|66|77|88)-)([a-z](?:-?[a-z]){3,})\b")
        .expect("Valid vanity number regex")
});

static SPELLED_RUN: Lazy<Regex> = Lazy::new(|| {
    let word = "(?:zero|oh|one|two|three|four|five|six|seven|eight|nine)";
    Regex::new(&format!(r"(?i)\b{word}(?:[ \-]+{word}){{2,}}\b"))
        .expect("Valid spelled digit regex")
});

static SPELLED_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)zero|oh|one|two|three|four|five|six|seven|eight|nine")
        .expect("Valid spelled digit regex")
});

/// Maps a letter to its telephone keypad digit.
pub fn keypad_digit(letter: char) -> Option<char> {
    let digit = match letter.to_ascii_uppercase() {
        'A' | 'B' | 'C' => '2',
        'D' | 'E' | 'F' => '3',
        'G' | 'H' | 'I' => '4',
        'J' | 'K' | 'L' => '5',
        'M' | 'N' | 'O' => '6',
        'P' | 'Q' | 'R' | 'S' => '7',
        'T' | 'U' | 'V' => '8',
        'W' | 'X' | 'Y' | 'Z' => '9',
        _ => return None,
    };
    Some(digit)
}

/// Rewrites every toll-free vanity number in `text` to its digits.
///
/// ```
/// use phone_redactor::domain::decode_vanity;
///
/// assert_eq!(decode_vanity("Call 1-800-FLOWERS today"), "Call 1-800-3569377 today");
/// ```
pub fn decode_vanity(text: &str) -> String {
    VANITY
        .replace_all(text, |caps: &Captures| {
            let digits: String = caps[2].chars().filter_map(keypad_digit).collect();
            format!("{}{}", &caps[1], digits)
        })
        .into_owned()
}

fn spelled_value(word: &str) -> char {
    match word.to_ascii_lowercase().as_str() {
        "one" => '1',
        "two" => '2',
        "three" => '3',
        "four" => '4',
        "five" => '5',
        "six" => '6',
        "seven" => '7',
        "eight" => '8',
        "nine" => '9',
        _ => '0',
    }
}

/// Collapses runs of three or more number words into digits.
///
/// `"five five five one two three four"` becomes `"5551234"`.
pub fn collapse_spelled_digits(text: &str) -> String {
    SPELLED_RUN
        .replace_all(text, |caps: &Captures| {
            SPELLED_WORD
                .find_iter(&caps[0])
                .map(|m| spelled_value(m.as_str()))
                .collect::<String>()
        })
        .into_owned()
}
