// src/table.rs
// Character <-> Morse pattern lookup

use std::collections::HashMap;
use std::sync::OnceLock;
use thiserror::Error;

/// Letters, digits, then punctuation.
const STANDARD_ENTRIES: [(char, &str); 43] = [
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
    ('0', "-----"),
    (',', "--..--"),
    ('.', ".-.-.-"),
    ('?', "..--.."),
    ('/', "-..-."),
    ('-', "-....-"),
    ('(', "-.--."),
    (')', "-.--.-"),
];

static STANDARD: OnceLock<SymbolTable> = OnceLock::new();

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("character {0:?} has an empty pattern")]
    EmptyPattern(char),
    #[error("pattern {pattern:?} for {ch:?} may only contain '.' and '-'")]
    InvalidPattern { ch: char, pattern: String },
    #[error("character {0:?} is listed more than once")]
    DuplicateChar(char),
    #[error("pattern {pattern:?} is shared by {first:?} and {second:?}")]
    DuplicatePattern {
        pattern: String,
        first: char,
        second: char,
    },
}

/// Bidirectional mapping between characters and Morse patterns.
///
/// Both directions are built together so the reverse lookup is always
/// consistent with the forward one.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    forward: HashMap<char, &'static str>,
    reverse: HashMap<&'static str, char>,
}

impl SymbolTable {
    /// Builds a table, rejecting malformed patterns and any entry that would
    /// make the reverse mapping ambiguous.
    pub fn from_entries(entries: &[(char, &'static str)]) -> Result<Self, TableError> {
        let mut forward = HashMap::with_capacity(entries.len());
        let mut reverse = HashMap::with_capacity(entries.len());

        for &(ch, pattern) in entries {
            if pattern.is_empty() {
                return Err(TableError::EmptyPattern(ch));
            }
            if !pattern.chars().all(|c| c == '.' || c == '-') {
                return Err(TableError::InvalidPattern {
                    ch,
                    pattern: pattern.to_string(),
                });
            }
            if forward.insert(ch, pattern).is_some() {
                return Err(TableError::DuplicateChar(ch));
            }
            if let Some(first) = reverse.insert(pattern, ch) {
                return Err(TableError::DuplicatePattern {
                    pattern: pattern.to_string(),
                    first,
                    second: ch,
                });
            }
        }

        Ok(Self { forward, reverse })
    }

    /// The built-in table: letters, digits and common punctuation.
    pub fn standard() -> &'static SymbolTable {
        STANDARD.get_or_init(|| {
            Self::from_entries(&STANDARD_ENTRIES)
                .unwrap_or_else(|e| panic!("built-in Morse table is malformed: {e}"))
        })
    }

    pub fn pattern(&self, ch: char) -> Option<&'static str> {
        self.forward.get(&ch).copied()
    }

    pub fn char_for(&self, pattern: &str) -> Option<char> {
        self.reverse.get(pattern).copied()
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Read-only lookup view sorted by character.
    pub fn entries(&self) -> Vec<(char, &'static str)> {
        let mut entries: Vec<_> = self.forward.iter().map(|(&c, &p)| (c, p)).collect();
        entries.sort_unstable_by_key(|&(c, _)| c);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_is_complete() {
        let table = SymbolTable::standard();
        assert_eq!(table.len(), 43);
        assert_eq!(table.pattern('S'), Some("..."));
        assert_eq!(table.pattern('0'), Some("-----"));
        assert_eq!(table.pattern(','), Some("--..--"));
        assert_eq!(table.pattern('a'), None);
    }

    #[test]
    fn test_reverse_lookup_matches_forward() {
        let table = SymbolTable::standard();
        for (ch, pattern) in table.entries() {
            assert_eq!(table.char_for(pattern), Some(ch));
            assert!((1..=6).contains(&pattern.len()), "{ch}: {pattern}");
        }
        assert_eq!(table.char_for("......."), None);
    }

    #[test]
    fn test_entries_are_sorted() {
        let entries = SymbolTable::standard().entries();
        assert!(entries.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(entries.first(), Some(&('(', "-.--.")));
        assert_eq!(entries.last(), Some(&('Z', "--..")));
    }

    #[test]
    fn test_rejects_duplicate_pattern() {
        let err = SymbolTable::from_entries(&[('A', ".-"), ('B', ".-")]).unwrap_err();
        assert_eq!(
            err,
            TableError::DuplicatePattern {
                pattern: ".-".into(),
                first: 'A',
                second: 'B',
            }
        );
    }

    #[test]
    fn test_rejects_malformed_entries() {
        assert_eq!(
            SymbolTable::from_entries(&[('A', "")]).unwrap_err(),
            TableError::EmptyPattern('A')
        );
        assert!(matches!(
            SymbolTable::from_entries(&[('A', ".x")]),
            Err(TableError::InvalidPattern { ch: 'A', .. })
        ));
        assert_eq!(
            SymbolTable::from_entries(&[('A', ".-"), ('A', "-.")]).unwrap_err(),
            TableError::DuplicateChar('A')
        );
    }
}
