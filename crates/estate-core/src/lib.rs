// estate-core: Resource services, data hooks and session control for the estate admin dashboard

pub mod error;
pub mod filter;
pub mod form;
pub mod hooks;
pub mod service;
pub mod session;
pub mod slug;

pub use error::CoreError;
pub use filter::{Choice, ListFilter, ListQuery};
pub use form::FieldErrors;
pub use hooks::HookState;
pub use session::{MemoryNavigator, Navigator, SessionController};
pub use slug::slugify;
