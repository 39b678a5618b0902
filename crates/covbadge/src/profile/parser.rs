//! Cover profile parser

use super::{CoverageBlock, Mode, Position, Profile, Report};
use crate::result::{CovbadgeError, CovbadgeResult};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

const MODE_PREFIX: &str = "mode: ";

/// `file:startLine.startCol,endLine.endCol numStatements count`
///
/// The file capture is greedy so identifiers containing colons keep
/// everything up to the final position suffix.
static BLOCK_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+):([0-9]+)\.([0-9]+),([0-9]+)\.([0-9]+) ([0-9]+) ([0-9]+)$")
        .expect("block line pattern is valid")
});

/// Parser for cover profile reports
///
/// Stateless; one parser can be shared across threads and reused.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileParser;

impl ProfileParser {
    /// Create a new parser
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Parse report text
    pub fn parse_str(&self, text: &str) -> CovbadgeResult<Report> {
        self.parse_reader(text.as_bytes())
    }

    /// Parse a report from any buffered reader
    ///
    /// Nothing is returned unless the whole stream parses; the first
    /// malformed line aborts with an error naming it.
    pub fn parse_reader<R: BufRead>(&self, reader: R) -> CovbadgeResult<Report> {
        let mut lines = reader.lines();

        let mode = match lines.next() {
            Some(line) => parse_mode_line(&line?)?,
            None => return Err(CovbadgeError::bad_mode_line("")),
        };

        let mut files: BTreeMap<String, Profile> = BTreeMap::new();
        for (index, line) in lines.enumerate() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            // +2: 1-based, and the mode line was consumed above
            let (file_name, block) = parse_block_line(index + 2, &line)?;
            match files.get_mut(file_name) {
                Some(profile) => profile.push(block),
                None => {
                    let mut profile = Profile::new(file_name, mode.clone());
                    profile.push(block);
                    let _ = files.insert(file_name.to_string(), profile);
                }
            }
        }

        let profiles: Vec<Profile> = files
            .into_values()
            .map(|mut profile| {
                profile.sort_blocks();
                profile
            })
            .collect();

        tracing::debug!(
            mode = %mode,
            files = profiles.len(),
            blocks = profiles.iter().map(|p| p.blocks().len()).sum::<usize>(),
            "parsed cover profile"
        );

        // BTreeMap iteration already yields file-name order
        Ok(Report { profiles })
    }

    /// Parse a report file from disk
    pub fn parse_file(&self, path: impl AsRef<Path>) -> CovbadgeResult<Report> {
        let file = File::open(path.as_ref())?;
        self.parse_reader(BufReader::new(file))
    }
}

/// Parse report text with a default parser
pub fn parse_profiles(text: &str) -> CovbadgeResult<Report> {
    ProfileParser::new().parse_str(text)
}

/// Parse a report from a buffered reader with a default parser
pub fn parse_profiles_reader<R: BufRead>(reader: R) -> CovbadgeResult<Report> {
    ProfileParser::new().parse_reader(reader)
}

/// Parse a report file with a default parser
pub fn parse_profiles_file(path: impl AsRef<Path>) -> CovbadgeResult<Report> {
    ProfileParser::new().parse_file(path)
}

fn parse_mode_line(line: &str) -> CovbadgeResult<Mode> {
    match line.strip_prefix(MODE_PREFIX) {
        Some(token) if !token.is_empty() => Ok(Mode::new(token)),
        _ => Err(CovbadgeError::bad_mode_line(line)),
    }
}

fn parse_block_line(line_number: usize, line: &str) -> CovbadgeResult<(&str, CoverageBlock)> {
    let caps = BLOCK_LINE
        .captures(line)
        .ok_or_else(|| CovbadgeError::malformed_line(line_number, line))?;

    let start = Position::new(
        number(&caps, 2, line_number, "start line")?,
        number(&caps, 3, line_number, "start column")?,
    );
    let end = Position::new(
        number(&caps, 4, line_number, "end line")?,
        number(&caps, 5, line_number, "end column")?,
    );
    if end < start {
        return Err(CovbadgeError::InvertedBlock { line_number });
    }

    let block = CoverageBlock::new(
        start,
        end,
        number(&caps, 6, line_number, "statement count")?,
        number(&caps, 7, line_number, "execution count")?,
    );

    let file_name = caps.get(1).map_or("", |m| m.as_str());
    Ok((file_name, block))
}

fn number<T: FromStr>(
    caps: &Captures<'_>,
    index: usize,
    line_number: usize,
    field: &'static str,
) -> CovbadgeResult<T> {
    let value = caps.get(index).map_or("", |m| m.as_str());
    value.parse().map_err(|_| CovbadgeError::InvalidNumber {
        line_number,
        field,
        value: value.to_string(),
    })
}
