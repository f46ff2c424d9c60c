pub mod backends;

pub use backends::*;

pub mod prelude {
    pub use super::backends::*;
    pub use dawan_core::{Article, ArticleQuery, ArticleStore, Result};
}
