//! Domain entities - the core business objects.

mod category;
mod pagination;
mod post;
mod session;
mod user;

pub use category::{Category, UnknownCategory};
pub use pagination::{Page, PageRequest, Pagination};
pub use post::{Post, PostChanges, PostDraft};
pub use session::{Session, SessionId};
pub use user::{AuthorSummary, User};
