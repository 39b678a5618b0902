//! Badge naming for a shields-style rendering service
//!
//! The rendering service draws a badge from its path alone:
//! `coverage-60%25-yellow.svg` is a "coverage" badge reading `60%` in yellow.

use crate::aggregate::Coverage;
use crate::status::StatusColor;
use std::fmt;

const SUBJECT: &str = "coverage";

/// A coverage badge to be rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    label: String,
    color: StatusColor,
}

impl Badge {
    /// Badge for a rounded percentage, coloured by the status classifier
    #[must_use]
    pub fn coverage(rounded_percent: u32) -> Self {
        Self {
            // %25 is a literal '%' once the service decodes the path
            label: format!("{rounded_percent}%25"),
            color: StatusColor::from_percent(i64::from(rounded_percent)),
        }
    }

    /// Badge for an aggregate
    #[must_use]
    pub fn for_coverage(coverage: &Coverage) -> Self {
        Self::coverage(coverage.rounded_percent())
    }

    /// Badge for an unknown repository
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            label: "NaN".to_string(),
            color: StatusColor::Red,
        }
    }

    /// Label text as it appears in the path
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Badge colour
    #[must_use]
    pub const fn color(&self) -> StatusColor {
        self.color
    }

    /// `coverage-<label>-<color>.svg`
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{SUBJECT}-{}-{}.svg", self.label, self.color)
    }

    /// Full URL under the rendering service's base URL
    #[must_use]
    pub fn url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.file_name())
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage_badge_file_name() {
        assert_eq!(Badge::coverage(60).file_name(), "coverage-60%25-yellow.svg");
        assert_eq!(Badge::coverage(0).file_name(), "coverage-0%25-red.svg");
        assert_eq!(Badge::coverage(100).file_name(), "coverage-100%25-green.svg");
    }

    #[test]
    fn test_unknown_badge() {
        let badge = Badge::unknown();
        assert_eq!(badge.file_name(), "coverage-NaN-red.svg");
        assert_eq!(badge.color(), StatusColor::Red);
        assert_eq!(badge.label(), "NaN");
    }

    #[test]
    fn test_url_joins_base() {
        let badge = Badge::coverage(60);
        assert_eq!(badge.url("blah.com"), "blah.com/coverage-60%25-yellow.svg");
        assert_eq!(
            badge.url("https://img.shields.io/badge/"),
            "https://img.shields.io/badge/coverage-60%25-yellow.svg"
        );
    }

    #[test]
    fn test_for_coverage_uses_rounded_percent() {
        let badge = Badge::for_coverage(&Coverage::new(3, 5));
        assert_eq!(badge.to_string(), "coverage-60%25-yellow.svg");
    }
}
