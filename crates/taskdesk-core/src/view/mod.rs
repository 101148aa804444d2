//! Task views: the application context, list view models and the pure
//! derivation of the visible task subset.

mod context;
mod derive;
mod list;

pub use self::context::AppContext;
pub use self::derive::visible;
pub use self::list::{Notice, TaskListView, TaskScope};
