pub mod config;
pub mod dispatch;
pub mod extract;
pub mod job;
pub mod render;
pub mod select;
pub mod token;

pub use config::Config;
pub use dispatch::{HttpDispatcher, LogDispatcher};
pub use job::{DigestJob, DigestReport};
pub use select::{fetch_top_digest_articles, FALLBACK_SUMMARY, MAX_DIGEST_ARTICLES};
pub use token::{UnsubscribeTokenService, VerifiedUnsubscribe};

pub mod prelude {
    pub use crate::config::Config;
    pub use crate::job::{DigestJob, DigestReport};
    pub use crate::token::UnsubscribeTokenService;
    pub use dawan_core::{ArticleSnapshot, ArticleStore, EmailDispatcher, Result};
}
