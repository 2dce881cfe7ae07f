//! Per-upload sessions and their registry

mod model;
mod store;

pub use model::{ReadySession, Session, SessionId};
pub use store::{InMemorySessionStore, SessionStore};
