//! Cover profiles
//!
//! A cover profile report is line oriented:
//!
//! ```text
//! mode: set
//! encoding/base64/base64.go:34.44,37.40 3 1
//! encoding/base64/base64.go:38.2,38.15 1 0
//! ```
//!
//! The first line names the counting mode; every following line is
//! `file:startLine.startCol,endLine.endCol numStatements count`.
//! Parsing produces a [`Report`]: one [`Profile`] per distinct file, sorted
//! by file name, each holding its [`CoverageBlock`]s sorted by start position.

mod block;
mod parser;

pub use block::{CoverageBlock, Position};
pub use parser::{parse_profiles, parse_profiles_file, parse_profiles_reader, ProfileParser};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Counting mode carried in the report header
///
/// The token is kept verbatim; nothing downstream computes on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mode(String);

impl Mode {
    /// Wrap a mode token
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is one of the modes the Go toolchain emits (`set`, `count`, `atomic`)
    #[must_use]
    pub fn is_standard(&self) -> bool {
        matches!(self.0.as_str(), "set" | "count" | "atomic")
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// All coverage blocks for one source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    file_name: String,
    mode: Mode,
    blocks: Vec<CoverageBlock>,
}

impl Profile {
    /// Create an empty profile for a file
    #[must_use]
    pub fn new(file_name: impl Into<String>, mode: Mode) -> Self {
        Self {
            file_name: file_name.into(),
            mode,
            blocks: Vec::new(),
        }
    }

    /// Build a profile from blocks, sorting them by start position
    #[must_use]
    pub fn with_blocks(
        file_name: impl Into<String>,
        mode: Mode,
        blocks: impl IntoIterator<Item = CoverageBlock>,
    ) -> Self {
        let mut profile = Self::new(file_name, mode);
        profile.blocks.extend(blocks);
        profile.sort_blocks();
        profile
    }

    pub(crate) fn push(&mut self, block: CoverageBlock) {
        self.blocks.push(block);
    }

    /// Stable sort, so identical start positions keep their input order.
    pub(crate) fn sort_blocks(&mut self) {
        self.blocks.sort_by_key(|b| b.start);
    }

    /// File identifier as it appeared in the report
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Counting mode inherited from the report header
    #[must_use]
    pub const fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Blocks in ascending start order
    #[must_use]
    pub fn blocks(&self) -> &[CoverageBlock] {
        &self.blocks
    }

    /// Total statements across all blocks
    #[must_use]
    pub fn total_statements(&self) -> u64 {
        self.blocks.iter().map(|b| u64::from(b.num_statements)).sum()
    }

    /// Statements in blocks executed at least once
    #[must_use]
    pub fn covered_statements(&self) -> u64 {
        self.blocks
            .iter()
            .filter(|b| b.is_covered())
            .map(|b| u64::from(b.num_statements))
            .sum()
    }
}

/// Parse result: profiles sorted ascending by file name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    profiles: Vec<Profile>,
}

impl Report {
    /// Build a report, sorting profiles by file name
    #[must_use]
    pub fn new(mut profiles: Vec<Profile>) -> Self {
        profiles.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Self { profiles }
    }

    /// Profiles in file-name order
    #[must_use]
    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    /// Consume the report
    #[must_use]
    pub fn into_profiles(self) -> Vec<Profile> {
        self.profiles
    }

    /// Number of distinct files described
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the report describes no files
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// The lexicographically-first profile
    #[must_use]
    pub fn first(&self) -> Option<&Profile> {
        self.profiles.first()
    }

    /// Look up a profile by file name
    #[must_use]
    pub fn get(&self, file_name: &str) -> Option<&Profile> {
        self.profiles
            .binary_search_by(|p| p.file_name.as_str().cmp(file_name))
            .ok()
            .map(|i| &self.profiles[i])
    }

    /// File names in report order
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(Profile::file_name)
    }
}
