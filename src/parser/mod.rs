//! Input parsing module for extracting chemical identifiers.
//!
//! This module turns raw pasted or uploaded text into an ordered, deduplicated
//! sequence of classified identifier tokens.
//!
//! # Delimiters
//!
//! Identifiers may be separated by `|`, newline, tab, or comma in any mixture.
//! A run of several delimiters counts as a single separator.
//!
//! # Example
//!
//! ```
//! use chemly_core::parser::{tokenize, IdentifierKind};
//!
//! let input = tokenize("Aspirin|2244\tC=O,Aspirin");
//! assert_eq!(input.len(), 3);
//! assert_eq!(input.tokens()[1].kind(), IdentifierKind::NumericId);
//! ```

mod identifier;

pub use identifier::{IdentifierKind, IdentifierToken, classify};

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

static DELIMITER_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"[|\n\t,]+"));

fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

/// Splits raw text into a deduplicated, order-preserving [`ResolutionInput`].
///
/// Each piece is trimmed and empty pieces are discarded. Duplicates are removed by
/// exact, case-sensitive match; the first occurrence keeps its position.
///
/// Empty or all-whitespace input yields an empty sequence, never an error.
#[must_use]
#[tracing::instrument(skip(raw_text), fields(input_len = raw_text.len()))]
pub fn tokenize(raw_text: &str) -> ResolutionInput {
    let input = ResolutionInput::from_pieces(DELIMITER_RE.split(raw_text));
    debug!(tokens = input.len(), "tokenized identifier input");
    input
}

/// Per-kind token counts, used for parse feedback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindCounts {
    /// Number of numeric database ids
    pub numeric_ids: usize,
    /// Number of structural notation strings
    pub structural: usize,
    /// Number of free-text names
    pub names: usize,
}

/// Ordered sequence of unique identifier tokens built once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionInput {
    tokens: Vec<IdentifierToken>,
}

impl ResolutionInput {
    /// Creates an empty input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an input from already-split pieces: trims, drops empties, dedups.
    pub fn from_pieces<'a>(pieces: impl IntoIterator<Item = &'a str>) -> Self {
        let mut seen = HashSet::new();
        let tokens = pieces
            .into_iter()
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .filter(|piece| seen.insert(*piece))
            .map(IdentifierToken::new)
            .collect();
        Self { tokens }
    }

    /// Returns the tokens in first-appearance order.
    #[must_use]
    pub fn tokens(&self) -> &[IdentifierToken] {
        &self.tokens
    }

    /// Returns an iterator over the tokens.
    pub fn iter(&self) -> std::slice::Iter<'_, IdentifierToken> {
        self.tokens.iter()
    }

    /// Returns count of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if there are no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Keeps only the first `max` tokens and returns how many were dropped.
    pub fn truncate(&mut self, max: usize) -> usize {
        let dropped = self.tokens.len().saturating_sub(max);
        self.tokens.truncate(max);
        dropped
    }

    /// Counts tokens by inferred kind.
    #[must_use]
    pub fn kind_counts(&self) -> KindCounts {
        self.tokens
            .iter()
            .fold(KindCounts::default(), |mut counts, token| {
                match token.kind() {
                    IdentifierKind::NumericId => counts.numeric_ids += 1,
                    IdentifierKind::StructuralNotation => counts.structural += 1,
                    IdentifierKind::Name => counts.names += 1,
                }
                counts
            })
    }
}

impl IntoIterator for ResolutionInput {
    type Item = IdentifierToken;
    type IntoIter = std::vec::IntoIter<IdentifierToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResolutionInput {
    type Item = &'a IdentifierToken;
    type IntoIter = std::slice::Iter<'a, IdentifierToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
