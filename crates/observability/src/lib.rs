//! `userdesk-observability` — logging/tracing setup shared by binaries.

pub mod tracing;

pub use tracing::{init, init_with_default};
