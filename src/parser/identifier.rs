//! Identifier tokens and lookup-type classification.

use std::fmt;

use serde::Serialize;

/// Characters that mark a token as line notation (bond and branch symbols).
const STRUCTURAL_CHARS: [char; 6] = ['=', '#', '(', ')', '[', ']'];

/// Lookup type inferred for an identifier.
///
/// Kinds are always inferred by [`classify`], never declared by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    /// All-digit database id (PubChem CID)
    NumericId,
    /// Line-notation structure string (SMILES)
    StructuralNotation,
    /// Free-text compound name
    Name,
}

impl IdentifierKind {
    /// Returns the PubChem PUG-REST input namespace for this kind.
    #[must_use]
    pub fn namespace(self) -> &'static str {
        match self {
            Self::NumericId => "cid",
            Self::StructuralNotation => "smiles",
            Self::Name => "name",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NumericId => write!(f, "CID"),
            Self::StructuralNotation => write!(f, "SMILES"),
            Self::Name => write!(f, "Name"),
        }
    }
}

/// Infers the lookup type of a single token.
///
/// Precedence is fixed: an all-digit token is always a [`IdentifierKind::NumericId`],
/// even when it was meant as a name. Next, any bond/branch character makes it
/// [`IdentifierKind::StructuralNotation`]. Everything else is a [`IdentifierKind::Name`].
///
/// # Examples
///
/// ```
/// use chemly_core::parser::{classify, IdentifierKind};
///
/// assert_eq!(classify("2244"), IdentifierKind::NumericId);
/// assert_eq!(classify("C=O"), IdentifierKind::StructuralNotation);
/// assert_eq!(classify("Aspirin"), IdentifierKind::Name);
/// ```
#[must_use]
pub fn classify(token: &str) -> IdentifierKind {
    if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
        IdentifierKind::NumericId
    } else if token.contains(&STRUCTURAL_CHARS[..]) {
        IdentifierKind::StructuralNotation
    } else {
        IdentifierKind::Name
    }
}

/// A single classified identifier from user input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentifierToken {
    raw: String,
    kind: IdentifierKind,
}

impl IdentifierToken {
    /// Creates a token, classifying `raw` with [`classify`].
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let kind = classify(&raw);
        Self { raw, kind }
    }

    /// The identifier exactly as it appeared in the input (trimmed).
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The inferred lookup type.
    #[must_use]
    pub fn kind(&self) -> IdentifierKind {
        self.kind
    }
}

impl fmt::Display for IdentifierToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.raw)
    }
}
