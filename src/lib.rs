pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod icons;
pub mod services;
pub mod utils;
pub mod view;

pub use app::{apply_event, update, App, Command, FetchEvent, Message, ViewState};
pub use config::{Config, ConfigOverrides};
pub use data::{PullRequest, RepositoryId};
pub use error::{ConfigError, FetchError};
pub use services::{spawn_poller, FetchOrchestrator, GitHubClient};
pub use view::{render_plain, ui};
