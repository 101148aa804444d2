//! Session store: login, logout and restoration of the authenticated session.
//!
//! The [`SessionStore`] is the single owner of the current [`Credential`] and
//! [`Identity`]. Successful logins are persisted through a [`SessionStorage`]
//! under [`SESSION_STORAGE_KEY`] and restored on the next start with
//! [`SessionStore::rehydrate`].
//!
//! [`Credential`]: crate::types::Credential
//! [`Identity`]: crate::types::Identity

mod state;
mod storage;
mod store;

pub use self::state::{SESSION_STORAGE_KEY, Session};
pub use self::storage::{FileStorage, MemoryStorage, SessionStorage};
pub use self::store::SessionStore;
