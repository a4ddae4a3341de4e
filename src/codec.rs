// src/codec.rs
// Text <-> Morse translation and the tokenizer shared with playback

use crate::table::SymbolTable;
use std::fmt;

/// Separates the symbol groups of two words.
pub const WORD_BOUNDARY: &str = "   ";

/// Stand-in for characters and symbol groups the table does not know.
pub const UNKNOWN: char = '?';

/// A Morse string: symbol groups separated by single spaces, words separated
/// by [`WORD_BOUNDARY`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MorseString(String);

impl MorseString {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn tokens(&self) -> Vec<Token<'_>> {
        tokenize(&self.0)
    }
}

impl fmt::Display for MorseString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MorseString {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<&str> for MorseString {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// The pattern of one character, e.g. `"-.-"`.
    Group(&'a str),
    /// Gap between two characters of the same word.
    LetterGap,
    /// Gap between two words.
    WordGap,
}

/// Splits a Morse string into symbol groups and gaps.
///
/// Every whitespace character counts as a space. Whitespace at either end is
/// ignored. Inside the string a run of fewer than three spaces is a letter
/// gap; a longer run of `n` spaces is `n / 3` word gaps, so the extra space
/// that [`Codec::encode`] leaves before a word boundary is absorbed. Empty
/// groups are never produced.
pub fn tokenize(morse: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = morse.trim();

    while !rest.is_empty() {
        let group_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        tokens.push(Token::Group(&rest[..group_end]));
        rest = &rest[group_end..];

        let gap_end = rest
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(rest.len());
        let run = rest[..gap_end].chars().count();
        rest = &rest[gap_end..];

        match run {
            0 => {}
            1 | 2 => tokens.push(Token::LetterGap),
            n => tokens.extend(std::iter::repeat_n(Token::WordGap, n / 3)),
        }
    }

    tokens
}

/// Translates in both directions against one [`SymbolTable`].
#[derive(Debug, Clone, Copy)]
pub struct Codec<'t> {
    table: &'t SymbolTable,
}

impl Default for Codec<'static> {
    fn default() -> Self {
        Self::new(SymbolTable::standard())
    }
}

impl<'t> Codec<'t> {
    pub fn new(table: &'t SymbolTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'t SymbolTable {
        self.table
    }

    /// Encodes `text`, case-insensitively. A space becomes a word boundary
    /// and characters missing from the table become `?`. Only trailing
    /// whitespace is trimmed; a leading word boundary is kept here but
    /// dropped again by [`Codec::decode`].
    pub fn encode(&self, text: &str) -> MorseString {
        let mut morse = String::with_capacity(text.len() * 4);

        for ch in text.to_uppercase().chars() {
            if ch == ' ' {
                morse.push_str(WORD_BOUNDARY);
            } else if let Some(pattern) = self.table.pattern(ch) {
                morse.push_str(pattern);
                morse.push(' ');
            } else {
                morse.push(UNKNOWN);
                morse.push(' ');
            }
        }

        morse.truncate(morse.trim_end().len());
        MorseString(morse)
    }

    /// Decodes a Morse string. Unknown symbol groups become `?`; irregular
    /// whitespace follows the rules of [`tokenize`].
    pub fn decode(&self, morse: &str) -> String {
        let mut text = String::new();
        for token in tokenize(morse) {
            match token {
                Token::Group(group) => text.push(self.table.char_for(group).unwrap_or(UNKNOWN)),
                Token::LetterGap => {}
                Token::WordGap => text.push(' '),
            }
        }
        text
    }
}

/// Encodes with the built-in table.
pub fn encode(text: &str) -> MorseString {
    Codec::default().encode(text)
}

/// Decodes with the built-in table.
pub fn decode(morse: &str) -> String {
    Codec::default().decode(morse)
}
