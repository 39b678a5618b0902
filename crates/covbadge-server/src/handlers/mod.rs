//! Command handlers, one module per subcommand

pub mod badge_url;
pub mod percent;
pub mod serve;

pub use badge_url::{badge_url_for, execute_badge_url};
pub use percent::{contributing_profiles, execute_percent, render_percent};
pub use serve::execute_serve;
