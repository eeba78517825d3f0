//! Route pattern matching.
//!
//! # Responsibilities
//! - Match a request path against an exact literal
//! - Match a request path against a segment-aligned prefix
//! - Rank competing matches (exact beats prefix, longer prefix beats shorter)
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Method is never consulted
//! - No regex to guarantee O(n) matching

/// How a route pattern is compared against the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Matches only an identical path string.
    Exact,
    /// Matches any path sharing a path-segment prefix with the pattern.
    Prefix,
}

/// A compiled route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    text: String,
    kind: MatchKind,
}

impl Pattern {
    /// Create a pattern claiming exactly `text`.
    pub fn exact(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: MatchKind::Exact,
        }
    }

    /// Create a pattern claiming `text` and every path below it.
    pub fn prefix(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: MatchKind::Prefix,
        }
    }

    /// Returns true if `path` is claimed by this pattern.
    pub fn matches(&self, path: &str) -> bool {
        match self.kind {
            MatchKind::Exact => path == self.text,
            MatchKind::Prefix => {
                let Some(rest) = path.strip_prefix(self.text.as_str()) else {
                    return false;
                };
                // "/docs" claims "/docs" and "/docs/x" but not "/docsx".
                self.text.ends_with('/') || rest.is_empty() || rest.starts_with('/')
            }
        }
    }

    /// Ranking used to pick a winner among several matching patterns.
    /// Higher is more specific.
    pub fn specificity(&self) -> (u8, usize) {
        match self.kind {
            MatchKind::Exact => (1, self.text.len()),
            MatchKind::Prefix => (0, self.text.len()),
        }
    }
}
