use async_trait::async_trait;
use dawan_core::{Article, ArticleQuery, ArticleStore, Result};
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory article collection. Used by tests and local runs; evaluates the
/// same query contract the CMS backend translates to its REST dialect.
#[derive(Default)]
pub struct MemoryStore {
    articles: Arc<RwLock<Vec<Article>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, articles: Vec<Article>) {
        let mut store = self.articles.write().await;
        store.extend(articles);
    }

    pub async fn insert(&self, article: Article) {
        let mut store = self.articles.write().await;
        if let Some(existing) = store.iter_mut().find(|a| a.id == article.id) {
            *existing = article;
        } else {
            store.push(article);
        }
    }
}

fn views_of(article: &Article) -> i64 {
    article.views.unwrap_or(0).max(0)
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn find(&self, query: &ArticleQuery) -> Result<Vec<Article>> {
        let store = self.articles.read().await;
        let mut matched: Vec<Article> = store
            .iter()
            .filter(|a| a.status == query.status)
            .filter(|a| query.updated_since.map_or(true, |t| a.updated_at >= t))
            .filter(|a| !query.exclude_ids.contains(&a.id))
            .cloned()
            .collect();
        match query.sort {
            dawan_core::SortKey::ViewsDesc => {
                matched.sort_by(|a, b| views_of(b).cmp(&views_of(a)));
            }
        }
        Ok(matched.into_iter().take(query.limit).collect())
    }
}
