//! covbadge: coverage badges from Go cover profiles
//!
//! The library half of the badge service. It reads cover profiles,
//! reduces them to a single percentage, and picks the badge to render.
//!
//! ```text
//! coverage.out ──► ProfileParser ──► Report ──► Coverage ──► StatusColor
//!                                                  │              │
//!                                                  └──► Badge ◄───┘
//! ```
//!
//! ## Example
//!
//! ```
//! use covbadge::{Badge, ProfileParser, Selection};
//!
//! let report = ProfileParser::new()
//!     .parse_str("mode: set\nfoo.go:1.1,2.2 3 1\nfoo.go:3.1,4.2 2 0\n")
//!     .unwrap();
//! let coverage = report.coverage(Selection::Combined).unwrap();
//! assert_eq!(coverage.rounded_percent(), 60);
//! assert_eq!(
//!     Badge::for_coverage(&coverage).url("https://img.shields.io/badge"),
//!     "https://img.shields.io/badge/coverage-60%25-yellow.svg"
//! );
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

pub mod aggregate;
pub mod badge;
pub mod profile;
mod result;
pub mod status;
pub mod store;

pub use aggregate::{percent_covered, Coverage, CoverageSummary, Selection};
pub use badge::Badge;
pub use profile::{
    parse_profiles, parse_profiles_file, parse_profiles_reader, CoverageBlock, Mode, Position,
    Profile, ProfileParser, Report,
};
pub use result::{CovbadgeError, CovbadgeResult};
pub use status::StatusColor;
pub use store::{
    FsProfileStore, MemoryProfileStore, ProfileStore, RepoName, PROFILE_FILE_NAME, TEMP_FILE_NAME,
};
