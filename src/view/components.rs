pub mod header;
pub mod popups;
pub mod search;
pub mod table;

pub use header::{render_footer, render_header, render_warning};
pub use popups::{centered_rect, render_help_popup, truncate_string};
pub use search::render_search_bar;
pub use table::render_table;
