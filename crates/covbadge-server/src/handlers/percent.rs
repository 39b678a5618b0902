//! `covbadge percent`

use crate::commands::PercentArgs;
use crate::error::ServerResult;
use covbadge::{parse_profiles_file, percent_covered, CoverageSummary, Profile, Report, Selection};
use std::fmt::Write as _;

/// Profiles that feed the aggregate under `selection`
#[must_use]
pub fn contributing_profiles(report: &Report, selection: Selection) -> &[Profile] {
    let profiles = report.profiles();
    match selection {
        Selection::Combined => profiles,
        Selection::First | Selection::Single => &profiles[..profiles.len().min(1)],
    }
}

/// Headline plus a per-file breakdown
///
/// ```text
/// 60% (yellow)
///   main.go  60.0%  3/5
/// ```
#[must_use]
pub fn render_percent(report: &Report, summary: &CoverageSummary) -> String {
    let mut out = format!("{}% ({})\n", summary.rounded_percent, summary.status);
    for profile in contributing_profiles(report, summary.selection) {
        let _ = writeln!(
            out,
            "  {}  {:.1}%  {}/{}",
            profile.file_name(),
            percent_covered(profile),
            profile.covered_statements(),
            profile.total_statements()
        );
    }
    out
}

/// Parse a local profile and print its coverage
pub fn execute_percent(args: &PercentArgs) -> ServerResult<()> {
    let report = parse_profiles_file(&args.file)?;
    let summary = report.summary(args.selection)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render_percent(&report, &summary));
    }
    Ok(())
}
