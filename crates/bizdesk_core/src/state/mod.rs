//! Framework-independent observable state.

pub mod debounce;
pub mod published;

pub use debounce::Debouncer;
pub use published::{Published, SubscriptionId};
