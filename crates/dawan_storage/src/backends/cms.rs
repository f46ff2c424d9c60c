use async_trait::async_trait;
use dawan_core::{Article, ArticleQuery, ArticleStore, Error, Result};
use serde::Deserialize;
use std::env;
use url::Url;

/// Connection settings for the headless CMS REST API.
#[derive(Debug, Clone)]
pub struct CmsConfig {
    pub base_url: String,
    pub collection: String,
}

impl CmsConfig {
    pub fn from_env() -> Self {
        let base_url =
            env::var("CMS_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        Self {
            base_url,
            collection: "articles".to_string(),
        }
    }
}

/// Article store backed by the CMS collection API. Translates the typed
/// query into the CMS query-string dialect and reads back `{ "docs": [...] }`.
pub struct CmsStore {
    client: reqwest::Client,
    config: CmsConfig,
}

#[derive(Debug, Deserialize)]
struct FindResponse {
    docs: Vec<Article>,
}

impl CmsStore {
    pub fn new(config: CmsConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn find_url(&self, query: &ArticleQuery) -> Result<Url> {
        let endpoint = format!(
            "{}/api/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.collection
        );
        let mut url = Url::parse(&endpoint).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("where[status][equals]", query.status.as_str());
            if let Some(since) = query.updated_since {
                pairs.append_pair("where[updatedAt][greater_than_equal]", &since.to_rfc3339());
            }
            if !query.exclude_ids.is_empty() {
                pairs.append_pair("where[id][not_in]", &query.exclude_ids.join(","));
            }
            pairs.append_pair("sort", "-views");
            pairs.append_pair("limit", &query.limit.to_string());
            pairs.append_pair("depth", "0");
        }
        Ok(url)
    }
}

#[async_trait]
impl ArticleStore for CmsStore {
    async fn find(&self, query: &ArticleQuery) -> Result<Vec<Article>> {
        let url = self.find_url(query)?;
        tracing::debug!("querying CMS: {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Store(format!("CMS query failed: {}", e)))?;
        let body: FindResponse = response.json().await?;
        Ok(body.docs)
    }
}
