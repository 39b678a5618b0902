//! Source positions and coverage blocks
//!
//! A block is the smallest unit a cover profile reports: a span of source
//! statements plus how often that span was entered during the instrumented run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A `line.column` position within a source file
///
/// Ordering is lexical: line first, column only when lines are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// 1-based line number
    pub line: u32,
    /// 1-based column (byte offset within the line)
    pub column: u32,
}

impl Position {
    /// Create a new position
    #[inline]
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.line, self.column)
    }
}

/// A contiguous span of statements with execution data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoverageBlock {
    /// Where the span starts
    pub start: Position,
    /// Where the span ends (never before `start`)
    pub end: Position,
    /// Number of source statements the span covers
    pub num_statements: u32,
    /// Times the span was entered; 0 means never executed
    pub count: u64,
}

impl CoverageBlock {
    /// Create a new block
    #[must_use]
    pub const fn new(start: Position, end: Position, num_statements: u32, count: u64) -> Self {
        Self {
            start,
            end,
            num_statements,
            count,
        }
    }

    /// Whether the block was executed at least once
    #[inline]
    #[must_use]
    pub const fn is_covered(&self) -> bool {
        self.count > 0
    }
}

impl fmt::Display for CoverageBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{} {} {}",
            self.start, self.end, self.num_statements, self.count
        )
    }
}
