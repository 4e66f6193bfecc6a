//! Client side of the task API: an HTTP seam and the board's task store.

mod api;
mod error;
mod store;

pub use api::{DEFAULT_API_BASE_URL, HttpTaskApi, TaskApi};
pub use error::ClientError;
pub use store::TaskStore;
