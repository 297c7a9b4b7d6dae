//! Source location tracking.
//!
//! A translator call operates on a single in-memory source string, so a
//! span is just a byte-offset range into that string — no multi-file
//! `SourceMap` is needed the way a native compiler would need one.

/// A half-open byte range `[start, end)` into the source text being
/// parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// A span with no meaningful location, used for synthesized nodes
    /// (idiom-recognition rewrites, recovered partial IR).
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// Merge two spans into the smallest span covering both.
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}
