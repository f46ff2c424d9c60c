use async_trait::async_trait;
use crate::types::{Article, ArticleQuery};
use crate::Result;

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Run a typed query against the article collection
    async fn find(&self, query: &ArticleQuery) -> Result<Vec<Article>>;
}
