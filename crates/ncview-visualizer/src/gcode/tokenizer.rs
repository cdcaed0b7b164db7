//! G-Code line tokenizer
//!
//! Splits one line of text into a command word and the letter-coded numeric
//! arguments that geometry depends on (X, Y, Z, I, J, R). Parsing is tolerant:
//! a malformed argument is dropped and reported, never fatal.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Argument letters that carry geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArgLetter {
    X,
    Y,
    Z,
    I,
    J,
    R,
}

impl ArgLetter {
    pub const ALL: [ArgLetter; 6] = [
        ArgLetter::X,
        ArgLetter::Y,
        ArgLetter::Z,
        ArgLetter::I,
        ArgLetter::J,
        ArgLetter::R,
    ];

    /// Case-insensitive lookup
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'X' => Some(Self::X),
            'Y' => Some(Self::Y),
            'Z' => Some(Self::Z),
            'I' => Some(Self::I),
            'J' => Some(Self::J),
            'R' => Some(Self::R),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ArgLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Arguments explicitly given on one line
///
/// A letter is present only if the line wrote it; repeated letters keep the
/// last value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawArgs {
    values: [Option<f64>; 6],
}

impl RawArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, letter: ArgLetter) -> Option<f64> {
        self.values[letter.index()]
    }

    pub fn set(&mut self, letter: ArgLetter, value: f64) {
        self.values[letter.index()] = Some(value);
    }

    /// Builder form of [`RawArgs::set`]
    pub fn with(mut self, letter: ArgLetter, value: f64) -> Self {
        self.set(letter, value);
        self
    }

    pub fn contains(&self, letter: ArgLetter) -> bool {
        self.get(letter).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// True when X or Y is given
    pub fn has_xy(&self) -> bool {
        self.contains(ArgLetter::X) || self.contains(ArgLetter::Y)
    }

    /// True when any of X, Y, Z is given
    pub fn has_axis(&self) -> bool {
        self.has_xy() || self.contains(ArgLetter::Z)
    }

    /// True when I, J or R is given
    pub fn has_arc_words(&self) -> bool {
        self.contains(ArgLetter::I) || self.contains(ArgLetter::J) || self.contains(ArgLetter::R)
    }

    /// Present letters with their values, in X Y Z I J R order
    pub fn iter(&self) -> impl Iterator<Item = (ArgLetter, f64)> + '_ {
        ArgLetter::ALL
            .iter()
            .filter_map(|letter| self.get(*letter).map(|v| (*letter, v)))
    }
}

/// Result of tokenizing a non-blank, non-comment line
#[derive(Debug, Clone, PartialEq)]
pub struct TokenizedLine {
    /// First word of the line, e.g. `G01`. `None` when the line starts
    /// directly with axis words (modal continuation such as `X5 Y2`).
    pub command: Option<String>,
    pub args: RawArgs,
    /// Argument tokens whose numeric part failed to parse
    pub malformed: Vec<String>,
}

/// Tokenize one line of G-code
///
/// Returns `None` for blank lines, lines starting with `(` or `;`, and `%`
/// tape markers. Inline `( ... )` and `; ...` comments are stripped first.
pub fn tokenize_line(line: &str, strip_line_numbers: bool) -> Option<TokenizedLine> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(['(', ';', '%']) {
        return None;
    }

    let cleaned = remove_comments(trimmed);
    let mut words = cleaned.split_whitespace().peekable();

    if strip_line_numbers {
        if let Some(first) = words.peek() {
            if is_line_number(first) {
                words.next();
            }
        }
    }

    let first = words.next()?;

    let mut tokenized = TokenizedLine {
        command: None,
        args: RawArgs::new(),
        malformed: Vec::new(),
    };

    if starts_with_arg_letter(first) {
        tokenized.push_arg_word(first);
    } else {
        tokenized.command = Some(first.to_string());
    }

    for word in words {
        tokenized.push_arg_word(word);
    }

    Some(tokenized)
}

impl TokenizedLine {
    fn push_arg_word(&mut self, word: &str) {
        let mut chars = word.chars();
        let Some(letter) = chars.next().and_then(ArgLetter::from_char) else {
            // F, S, P, M words and the like carry no geometry
            return;
        };
        match parse_number(chars.as_str()) {
            Some(value) => self.args.set(letter, value),
            None => self.malformed.push(word.to_string()),
        }
    }
}

/// Parse a decimal literal with optional sign, fraction, and exponent
///
/// Infinity and NaN spellings are rejected.
pub fn parse_number(text: &str) -> Option<f64> {
    if text.is_empty() || text.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn starts_with_arg_letter(word: &str) -> bool {
    word.chars().next().and_then(ArgLetter::from_char).is_some()
}

fn is_line_number(word: &str) -> bool {
    let mut chars = word.chars();
    matches!(chars.next(), Some('N' | 'n'))
        && !chars.as_str().is_empty()
        && chars.all(|c| c.is_ascii_digit())
}

fn remove_comments(line: &str) -> String {
    static COMMENT_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex =
        COMMENT_REGEX.get_or_init(|| Regex::new(r"\([^)]*\)|;.*").expect("invalid regex pattern"));
    regex.replace_all(line, " ").into_owned()
}
