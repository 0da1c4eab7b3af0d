// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const PHASE_URL_MAX_LEN: usize = 512;
pub const FORMULA_SHORT_MAX_LEN: usize = 64;
pub const FORMULA_FULL_MAX_LEN: usize = 256;
pub const PEARSON_MAX_LEN: usize = 16;
pub const SPACE_GROUP_MIN: u16 = 1;
pub const SPACE_GROUP_MAX: u16 = 230;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    Empty(&'static str),
    Trimmed(&'static str),
    TooLong(&'static str, usize),
    OutOfRange(&'static str),
    InvalidFormat(&'static str),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(name) => write!(f, "{name} must not be empty"),
            Self::Trimmed(name) => {
                write!(f, "{name} must not contain leading/trailing whitespace")
            }
            Self::TooLong(name, max) => write!(f, "{name} exceeds max length {max}"),
            Self::OutOfRange(msg) => f.write_str(msg),
            Self::InvalidFormat(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ParseError {}

pub fn parse_phase_url(input: &str) -> Result<PhaseUrl, ParseError> {
    PhaseUrl::parse(input)
}

pub fn parse_space_group(raw: u64) -> Result<SpaceGroup, ParseError> {
    SpaceGroup::new(raw)
}

pub fn parse_pearson(input: &str) -> Result<PearsonSymbol, ParseError> {
    PearsonSymbol::parse(input)
}

/// Permanent identifier of a distinct phase, carried as the URL published in
/// the release files. Only the integer suffix is load-bearing; scheme and
/// host are not constrained here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
#[non_exhaustive]
pub struct PhaseUrl(String);

impl PhaseUrl {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.is_empty() {
            return Err(ParseError::Empty("id"));
        }
        if input.trim() != input {
            return Err(ParseError::Trimmed("id"));
        }
        if input.len() > PHASE_URL_MAX_LEN {
            return Err(ParseError::TooLong("id", PHASE_URL_MAX_LEN));
        }
        let url = Self(input.to_string());
        if url.phase_id().is_none() {
            return Err(ParseError::InvalidFormat(
                "id must end in a positive integer phase_id segment",
            ));
        }
        Ok(url)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Integer suffix after the final `/`. `None` when the carried string was
    /// deserialized from a source that never went through `parse`.
    #[must_use]
    pub fn phase_id(&self) -> Option<u64> {
        let tail = self.0.rsplit('/').next()?;
        if tail.is_empty() || !tail.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        tail.parse::<u64>().ok().filter(|id| *id > 0)
    }
}

impl Display for PhaseUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Chemical composition in the two published forms. `short` is plain text;
/// `full` may carry structure markup and is stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct Formula {
    pub short: String,
    pub full: String,
}

impl Formula {
    pub fn new(short: &str, full: &str) -> Result<Self, ParseError> {
        let formula = Self {
            short: short.to_string(),
            full: full.to_string(),
        };
        formula.validate()?;
        Ok(formula)
    }

    pub fn validate(&self) -> Result<(), ParseError> {
        if self.short.is_empty() {
            return Err(ParseError::Empty("formula.short"));
        }
        if self.short.trim() != self.short {
            return Err(ParseError::Trimmed("formula.short"));
        }
        if self.short.len() > FORMULA_SHORT_MAX_LEN {
            return Err(ParseError::TooLong("formula.short", FORMULA_SHORT_MAX_LEN));
        }
        if self.full.is_empty() {
            return Err(ParseError::Empty("formula.full"));
        }
        if self.full.len() > FORMULA_FULL_MAX_LEN {
            return Err(ParseError::TooLong("formula.full", FORMULA_FULL_MAX_LEN));
        }
        Ok(())
    }
}

/// Crystallographic space group number, 1–230.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
#[non_exhaustive]
pub struct SpaceGroup(u16);

impl SpaceGroup {
    pub fn new(raw: u64) -> Result<Self, ParseError> {
        if raw < u64::from(SPACE_GROUP_MIN) || raw > u64::from(SPACE_GROUP_MAX) {
            return Err(ParseError::OutOfRange("spg must be within 1..=230"));
        }
        Ok(Self(raw as u16))
    }

    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }

    #[must_use]
    pub const fn in_range(self) -> bool {
        self.0 >= SPACE_GROUP_MIN && self.0 <= SPACE_GROUP_MAX
    }
}

impl Display for SpaceGroup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pearson symbol: two letters for the lattice, then the atom count per unit
/// cell (e.g. `cF8`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
#[non_exhaustive]
pub struct PearsonSymbol(String);

impl PearsonSymbol {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.is_empty() {
            return Err(ParseError::Empty("pearson"));
        }
        if input.trim() != input {
            return Err(ParseError::Trimmed("pearson"));
        }
        if input.len() > PEARSON_MAX_LEN {
            return Err(ParseError::TooLong("pearson", PEARSON_MAX_LEN));
        }
        let symbol = Self(input.to_string());
        if symbol.atom_count().is_none() {
            return Err(ParseError::InvalidFormat(
                "pearson must be two letters followed by digits",
            ));
        }
        Ok(symbol)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Atom count per unit cell (the digit suffix). `None` when the carried
    /// string never went through `parse`.
    #[must_use]
    pub fn atom_count(&self) -> Option<u32> {
        let mut chars = self.0.chars();
        let first = chars.next()?;
        let second = chars.next()?;
        if !first.is_ascii_alphabetic() || !second.is_ascii_alphabetic() {
            return None;
        }
        let digits = chars.as_str();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        digits.parse::<u32>().ok()
    }
}

impl Display for PearsonSymbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of a release file, wire form:
///
/// ```json
/// {"id": "https://mpds.io/phase_id/5019",
///  "formula": {"short": "Ge", "full": "Ge cub"},
///  "spg": 227, "pearson": "cF8", "entries": 1571, "articles": 748}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct PhaseRecord {
    pub id: PhaseUrl,
    pub formula: Formula,
    pub spg: SpaceGroup,
    pub pearson: PearsonSymbol,
    pub entries: u64,
    pub articles: u64,
}

impl PhaseRecord {
    #[must_use]
    pub fn new(
        id: PhaseUrl,
        formula: Formula,
        spg: SpaceGroup,
        pearson: PearsonSymbol,
        entries: u64,
        articles: u64,
    ) -> Self {
        Self {
            id,
            formula,
            spg,
            pearson,
            entries,
            articles,
        }
    }

    /// Field constraints for a record that was deserialized directly instead
    /// of going through the parsing constructors.
    pub fn validate(&self) -> Result<(), ParseError> {
        if self.id.phase_id().is_none() {
            return Err(ParseError::InvalidFormat(
                "id must end in a positive integer phase_id segment",
            ));
        }
        self.formula.validate()?;
        if !self.spg.in_range() {
            return Err(ParseError::OutOfRange("spg must be within 1..=230"));
        }
        if self.pearson.atom_count().is_none() {
            return Err(ParseError::InvalidFormat(
                "pearson must be two letters followed by digits",
            ));
        }
        Ok(())
    }

    /// Identity triple of a distinct phase within a release.
    #[must_use]
    pub fn key(&self) -> PhaseKey {
        PhaseKey {
            formula: self.formula.short.clone(),
            spg: self.spg.get(),
            pearson: self.pearson.as_str().to_string(),
        }
    }
}

/// (short formula, space group, Pearson symbol): unique across all records
/// in a release; this is the defining property of a distinct phase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct PhaseKey {
    pub formula: String,
    pub spg: u16,
    pub pearson: String,
}

impl PhaseKey {
    #[must_use]
    pub fn canonical_string(&self) -> String {
        format!("{}/{}/{}", self.formula, self.spg, self.pearson)
    }
}

impl Display for PhaseKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical_string())
    }
}
