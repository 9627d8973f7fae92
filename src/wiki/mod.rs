//! Wiki domain module
//!
//! Pages, their on-disk store, and the templates that render them.

pub mod page;
pub mod store;
pub mod template;

pub use page::{Page, Title};
pub use store::{PageStore, StoreError};
pub use template::{RenderError, Templates};
