//! Canonicalization rules.
//!
//! Mappings are always compared without regard to key order. Sequences keep
//! their order unless the rule sorts them, either everywhere or at selected
//! JSON pointers.

use crate::errors::InvocationError;
use std::fmt;
use std::str::FromStr;

/// How sequences are treated during canonicalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequenceOrder {
    /// Element order is significant
    #[default]
    Preserved,
    /// Elements are sorted after canonicalization, so order is ignored
    Sorted,
}

/// One segment of a [`FieldPointer`]
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Any,
}

/// RFC 6901 pointer naming a field whose sequence ignores element order
///
/// A segment of exactly `*` matches any key or index at that depth.
/// `~1` and `~0` decode to `/` and `~`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPointer {
    raw: String,
    segments: Vec<Segment>,
}

impl FieldPointer {
    /// True if this pointer names the value at `path`
    pub fn matches(&self, path: &[String]) -> bool {
        self.segments.len() == path.len()
            && self
                .segments
                .iter()
                .zip(path)
                .all(|(segment, key)| match segment {
                    Segment::Any => true,
                    Segment::Key(expected) => expected == key,
                })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for FieldPointer {
    type Err = InvocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvocationError::InvalidPointer {
            pointer: s.to_string(),
        };

        if s.is_empty() {
            return Ok(Self {
                raw: String::new(),
                segments: Vec::new(),
            });
        }
        let rest = s.strip_prefix('/').ok_or_else(invalid)?;

        let mut segments = Vec::new();
        for token in rest.split('/') {
            if token == "*" {
                segments.push(Segment::Any);
                continue;
            }
            segments.push(Segment::Key(unescape(token).ok_or_else(invalid)?));
        }

        Ok(Self {
            raw: s.to_string(),
            segments,
        })
    }
}

impl fmt::Display for FieldPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn unescape(token: &str) -> Option<String> {
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            _ => return None,
        }
    }
    Some(out)
}

/// Escape one key for use inside a JSON pointer
pub(crate) fn escape(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

/// Sequence handling for one comparison
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalRule {
    sequences: SequenceOrder,
    unordered_fields: Vec<FieldPointer>,
}

impl CanonicalRule {
    /// Order-sensitive sequences everywhere
    pub fn new() -> Self {
        Self::default()
    }

    /// Every sequence sorted, so neither key nor element order matters
    pub fn sorted() -> Self {
        Self::new().with_sequences(SequenceOrder::Sorted)
    }

    /// Set the order applied to sequences not named by a field pointer
    pub fn with_sequences(mut self, order: SequenceOrder) -> Self {
        self.sequences = order;
        self
    }

    /// Ignore element order for the sequence at `pointer`
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError::InvalidPointer`] if `pointer` is neither
    /// empty nor starts with `/`, or contains a bad `~` escape.
    pub fn with_unordered_field(mut self, pointer: &str) -> Result<Self, InvocationError> {
        self.unordered_fields.push(pointer.parse()?);
        Ok(self)
    }

    pub fn sequences(&self) -> SequenceOrder {
        self.sequences
    }

    pub fn unordered_fields(&self) -> &[FieldPointer] {
        &self.unordered_fields
    }

    /// Order applied to a sequence found at `path`
    pub fn order_at(&self, path: &[String]) -> SequenceOrder {
        if self.sequences == SequenceOrder::Sorted
            || self.unordered_fields.iter().any(|p| p.matches(path))
        {
            SequenceOrder::Sorted
        } else {
            SequenceOrder::Preserved
        }
    }
}
