//! `userdesk-session` — acting identity and the identity context resolver.
//!
//! A [`Session`] is the explicit, injected replacement for the browser-global
//! credential store: established at login, cleared at logout, and passed into
//! the workflow rather than looked up ambiently.

pub mod resolver;
pub mod role;
pub mod session;

pub use resolver::{EditMode, IdentityContext, NavTarget, resolve};
pub use role::ActorRole;
pub use session::{Session, SessionError};
