//! Coverage aggregation
//!
//! Coverage is the share of instrumented statements that ran at least once:
//!
//! ```text
//! percent = Σ statements(count > 0) / Σ statements × 100
//! ```
//!
//! A profile with no statements is 0 %, never NaN.

use crate::profile::{Profile, Report};
use crate::result::{CovbadgeError, CovbadgeResult};
use crate::status::StatusColor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Covered and total statement counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coverage {
    /// Statements in blocks executed at least once
    pub covered: u64,
    /// All statements
    pub total: u64,
}

impl Coverage {
    /// Create from raw counts
    #[must_use]
    pub const fn new(covered: u64, total: u64) -> Self {
        Self { covered, total }
    }

    /// Coverage of a single profile
    #[must_use]
    pub fn from_profile(profile: &Profile) -> Self {
        Self::new(profile.covered_statements(), profile.total_statements())
    }

    /// Summed coverage of several profiles
    #[must_use]
    pub fn from_profiles<'a>(profiles: impl IntoIterator<Item = &'a Profile>) -> Self {
        profiles
            .into_iter()
            .map(Self::from_profile)
            .fold(Self::default(), |acc, c| acc.merge(c))
    }

    /// Add two coverages together
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self::new(
            self.covered.saturating_add(other.covered),
            self.total.saturating_add(other.total),
        )
    }

    /// Percentage covered; exactly 0.0 when there are no statements
    ///
    /// This unrounded value is the authoritative one.
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.covered as f64 / self.total as f64 * 100.0
    }

    /// Percentage rounded to a whole number for display
    ///
    /// Rounds half to even, e.g. 62.5 → 62 and 87.5 → 88.
    #[must_use]
    pub fn rounded_percent(&self) -> u32 {
        self.percent().round_ties_even() as u32
    }

    /// Status colour for the rounded percentage
    #[must_use]
    pub fn status(&self) -> StatusColor {
        StatusColor::from_percent(i64::from(self.rounded_percent()))
    }
}

/// Coverage percentage of one profile
#[must_use]
pub fn percent_covered(profile: &Profile) -> f64 {
    Coverage::from_profile(profile).percent()
}

/// Which profiles of a multi-file report feed the aggregate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    /// Sum statements across every file
    #[default]
    Combined,
    /// Only the lexicographically-first file
    First,
    /// Require the report to describe exactly one file
    Single,
}

impl Selection {
    /// Lowercase name as used in configuration
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Combined => "combined",
            Self::First => "first",
            Self::Single => "single",
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Selection {
    type Err = CovbadgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "combined" => Ok(Self::Combined),
            "first" => Ok(Self::First),
            "single" => Ok(Self::Single),
            other => Err(CovbadgeError::UnknownSelection {
                name: other.to_string(),
            }),
        }
    }
}

impl Report {
    /// Aggregate coverage according to `selection`
    ///
    /// `Combined` over an empty report is 0 %; `First` and `Single`
    /// need at least one profile.
    pub fn coverage(&self, selection: Selection) -> CovbadgeResult<Coverage> {
        match selection {
            Selection::Combined => Ok(Coverage::from_profiles(self.profiles())),
            Selection::First => self
                .first()
                .map(Coverage::from_profile)
                .ok_or(CovbadgeError::EmptyReport),
            Selection::Single => match self.profiles() {
                [] => Err(CovbadgeError::EmptyReport),
                [only] => Ok(Coverage::from_profile(only)),
                many => Err(CovbadgeError::MultipleProfiles { count: many.len() }),
            },
        }
    }

    /// Aggregate and summarise
    pub fn summary(&self, selection: Selection) -> CovbadgeResult<CoverageSummary> {
        let coverage = self.coverage(selection)?;
        let files = match selection {
            Selection::Combined => self.len(),
            Selection::First | Selection::Single => 1,
        };
        Ok(CoverageSummary::new(coverage, files, selection))
    }
}

/// Aggregate coverage with its display values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageSummary {
    /// Statement counts
    pub coverage: Coverage,
    /// Unrounded percentage
    pub percent: f64,
    /// Rounded percentage
    pub rounded_percent: u32,
    /// Status colour of the rounded percentage
    pub status: StatusColor,
    /// Number of files that contributed
    pub files: usize,
    /// How the files were selected
    pub selection: Selection,
}

impl CoverageSummary {
    /// Build a summary from counts
    #[must_use]
    pub fn new(coverage: Coverage, files: usize, selection: Selection) -> Self {
        Self {
            coverage,
            percent: coverage.percent(),
            rounded_percent: coverage.rounded_percent(),
            status: coverage.status(),
            files,
            selection,
        }
    }
}
