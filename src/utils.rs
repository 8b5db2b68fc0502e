pub mod date;
pub mod git;

pub use date::{last_updated_label, updated_label, MONTH_NAMES};
pub use git::{get_current_repo, parse_github_url};
