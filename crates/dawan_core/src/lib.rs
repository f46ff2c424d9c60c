pub mod dispatch;
pub mod error;
pub mod store;
pub mod types;

pub use dispatch::EmailDispatcher;
pub use error::Error;
pub use store::ArticleStore;
pub use types::{
    Article, ArticleQuery, ArticleSnapshot, ArticleStatus, ContentBlock, ImageRef, OutgoingEmail,
    RichTextNode, SortKey,
};

pub type Result<T> = std::result::Result<T, Error>;
