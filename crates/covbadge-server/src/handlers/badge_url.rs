//! `covbadge badge-url`

use crate::commands::BadgeUrlArgs;
use crate::error::ServerResult;
use covbadge::{parse_profiles_file, Badge, Selection};
use std::path::Path;

/// Badge URL for a local profile
pub fn badge_url_for(path: &Path, shield: &str, selection: Selection) -> ServerResult<String> {
    let coverage = parse_profiles_file(path)?.coverage(selection)?;
    Ok(Badge::for_coverage(&coverage).url(shield))
}

/// Print the badge URL
pub fn execute_badge_url(args: &BadgeUrlArgs) -> ServerResult<()> {
    println!("{}", badge_url_for(&args.file, &args.shield, args.selection)?);
    Ok(())
}
