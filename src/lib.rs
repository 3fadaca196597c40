pub mod activity;
pub mod adapter;
pub mod analytics;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod database;
pub mod logging;
pub mod models;
pub mod notes;
pub mod ranking;
pub mod sections;
pub mod store;
pub mod timeline;
pub mod tui;
pub mod utils;

pub use calendar::{CalendarDate, CalendarSystem, DateError};
pub use config::Config;
pub use dashboard::Dashboard;
pub use database::Database;
pub use models::{Note, TimelineDependency, TimelineEvent};
pub use notes::NoteStore;
pub use store::{KeyValueStore, MemoryStore};
pub use utils::Profile;
