//! In-memory reference implementation of the push backend.
//!
//! Serves both the path-based and the query-param API from one router.
//! Nothing is persisted; state lives as long as the process.

pub mod public;
pub mod routes;
mod server;
mod state;

pub use routes::SharedState;
pub use server::{app, serve};
pub use state::{BackendState, CHANNEL_PAGE_SIZE, StoredMessage};
