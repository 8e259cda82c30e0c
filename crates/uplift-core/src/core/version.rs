//! Ordering of release version identifiers.
//!
//! Release names are free-form (`v1.2.3`, `2.0-beta`, `1.0_rc2`, ...), so they are not
//! parsed into a fixed major/minor/patch shape. Instead each identifier is split into
//! parts and the two part sequences are compared position by position.
//!
//! Parts are separated by `.`, `-`, `_` and `+`, and a switch between a digit run and a
//! non-digit run also starts a new part, so `v1.10rc2` becomes `v`, `1`, `10`, `rc`, `2`.
//! At a given position the parts rank, from oldest to newest:
//!
//! ```text
//! empty < unknown text < dev < alpha|a < beta|b < rc < # < pl|p < (no part) < number
//! ```
//!
//! "No part" is what a shorter identifier has past its end, which is why `1.0-beta`
//! sorts before `1.0` while `1.0.1` sorts after it.

use std::cmp::Ordering;
use std::fmt;

/// Characters that separate version parts. They are not kept in the parts.
pub const SEPARATORS: [char; 4] = ['.', '-', '_', '+'];

/// One piece of a split version identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionPart<'a> {
    /// Produced by consecutive separators, e.g. the middle of `1..2`.
    Empty,
    /// A run of ASCII digits.
    Number(&'a str),
    /// A run of anything else.
    Text(&'a str),
}

/// Rank of a textual part. Declaration order is the ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SuffixRank {
    Unknown,
    Dev,
    Alpha,
    Beta,
    ReleaseCandidate,
    Hash,
    Patch,
}

impl SuffixRank {
    /// Classify a textual part. Matching ignores ASCII case.
    pub fn of(text: &str) -> Self {
        const KNOWN: [(&str, SuffixRank); 9] = [
            ("dev", SuffixRank::Dev),
            ("alpha", SuffixRank::Alpha),
            ("a", SuffixRank::Alpha),
            ("beta", SuffixRank::Beta),
            ("b", SuffixRank::Beta),
            ("rc", SuffixRank::ReleaseCandidate),
            ("#", SuffixRank::Hash),
            ("pl", SuffixRank::Patch),
            ("p", SuffixRank::Patch),
        ];

        KNOWN
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(text))
            .map(|(_, rank)| *rank)
            .unwrap_or(SuffixRank::Unknown)
    }
}

/// A position in the comparison. Variant order is the ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Slot<'a> {
    Empty,
    Suffix(SuffixRank),
    Absent,
    Number(Digits<'a>),
}

/// Arbitrary-length unsigned integer kept as its decimal digits.
#[derive(Debug, Clone, Copy)]
struct Digits<'a>(&'a str);

impl<'a> Digits<'a> {
    fn significant(&self) -> &'a str {
        let trimmed = self.0.trim_start_matches('0');
        if trimmed.is_empty() {
            "0"
        } else {
            trimmed
        }
    }
}

impl Ord for Digits<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (self.significant(), other.significant());
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    }
}

impl PartialOrd for Digits<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Digits<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Digits<'_> {}

impl<'a> VersionPart<'a> {
    fn new(raw: &'a str) -> Self {
        if raw.is_empty() {
            VersionPart::Empty
        } else if raw.bytes().all(|b| b.is_ascii_digit()) {
            VersionPart::Number(raw)
        } else {
            VersionPart::Text(raw)
        }
    }

    fn slot(&self) -> Slot<'a> {
        match *self {
            VersionPart::Empty => Slot::Empty,
            VersionPart::Number(digits) => Slot::Number(Digits(digits)),
            VersionPart::Text(text) => Slot::Suffix(SuffixRank::of(text)),
        }
    }
}

/// Split a version identifier into its parts.
///
/// An empty identifier has no parts.
pub fn split_parts(version: &str) -> Vec<VersionPart<'_>> {
    let mut parts = Vec::new();
    if version.is_empty() {
        return parts;
    }

    let mut start = 0;
    let mut run_is_digit: Option<bool> = None;

    for (idx, ch) in version.char_indices() {
        if SEPARATORS.contains(&ch) {
            parts.push(VersionPart::new(&version[start..idx]));
            start = idx + ch.len_utf8();
            run_is_digit = None;
            continue;
        }

        let is_digit = ch.is_ascii_digit();
        if matches!(run_is_digit, Some(prev) if prev != is_digit) {
            parts.push(VersionPart::new(&version[start..idx]));
            start = idx;
        }
        run_is_digit = Some(is_digit);
    }
    parts.push(VersionPart::new(&version[start..]));

    parts
}

/// Compare two version identifiers.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    VersionKey::new(a).cmp(&VersionKey::new(b))
}

/// Compare two version identifiers, returning `-1`, `0` or `1`.
pub fn compare(a: &str, b: &str) -> i32 {
    match compare_versions(a, b) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

/// A split version identifier that can be sorted.
///
/// Two keys are equal when every position ranks the same, so `1.0-a` equals `1.0-alpha`
/// even though the source strings differ.
#[derive(Debug, Clone)]
pub struct VersionKey<'a> {
    source: &'a str,
    parts: Vec<VersionPart<'a>>,
}

impl<'a> VersionKey<'a> {
    pub fn new(version: &'a str) -> Self {
        Self {
            source: version,
            parts: split_parts(version),
        }
    }

    pub fn as_str(&self) -> &'a str {
        self.source
    }

    pub fn parts(&self) -> &[VersionPart<'a>] {
        &self.parts
    }

    fn slot(&self, idx: usize) -> Slot<'a> {
        self.parts.get(idx).map_or(Slot::Absent, VersionPart::slot)
    }
}

impl Ord for VersionKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        (0..len)
            .map(|idx| self.slot(idx).cmp(&other.slot(idx)))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for VersionKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for VersionKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for VersionKey<'_> {}

impl fmt::Display for VersionKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source)
    }
}
