//! Draft autosave: a debounced, at-most-one-in-flight persistence task plus
//! an in-memory [`DraftStore`](studio_core::collab::DraftStore) for
//! development and tests.

pub mod controller;
pub mod memory;

pub use controller::{AutosaveController, SaveStatus};
pub use memory::InMemoryDraftStore;
