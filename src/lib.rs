// Library surface for the binary, headless integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod logging;
pub mod model;
pub mod progress;
pub mod runtime;
pub mod store;
pub mod ui;

pub use model::ProgressModel;
pub use progress::{ProgressState, Snapshot};
