pub mod message;
pub mod model;
pub mod update;

pub use message::{Command, FetchEvent, Message};
pub use model::{App, ViewState, LOADING_WARNING, MAX_ISSUES_PER_REPO};
pub use update::{apply_event, update};
