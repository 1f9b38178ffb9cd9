pub mod args;
pub mod controller;
pub mod error;
pub mod model;
pub mod mvu;
pub mod score;
pub mod session;
pub mod storage;
pub mod view;

const HTMX_PATH: &str = "https://unpkg.com/htmx.org@1.9.12";

/// How long a page load waits on the store before drawing what it has.
pub const DEFAULT_LOAD_TIMEOUT_MS: u64 = 3000;

pub use controller::{AppSettings, configure};
pub use error::AppError;
pub use session::{SessionGate, SessionPolicy};
pub use storage::{Storage, StorageError};
