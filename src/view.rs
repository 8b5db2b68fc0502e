pub mod components;
pub mod plain;
pub mod ui;

pub use plain::render_plain;
pub use ui::ui;
