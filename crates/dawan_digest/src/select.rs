use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use dawan_core::{Article, ArticleQuery, ArticleSnapshot, ArticleStore, Result};
use tracing::debug;

use crate::extract::{extract_hero_image, extract_summary};

/// How many articles a daily digest features at most.
pub const MAX_DIGEST_ARTICLES: usize = 5;

/// Shown when an article yields no summary text.
pub const FALLBACK_SUMMARY: &str = "Akhriso warbixinta oo dhammaystiran boggayaga.";

/// Mogadishu is UTC+3 year-round, no DST.
pub const EAT_OFFSET_SECS: i64 = 3 * 3600;

/// Start of the current Mogadishu calendar day, as a UTC instant.
pub fn start_of_today(now: DateTime<Utc>) -> DateTime<Utc> {
    let local = now.naive_utc() + Duration::seconds(EAT_OFFSET_SECS);
    let midnight = local.date().and_time(NaiveTime::MIN);
    Utc.from_utc_datetime(&(midnight - Duration::seconds(EAT_OFFSET_SECS)))
}

/// Select up to [`MAX_DIGEST_ARTICLES`] snapshots for today's digest.
///
/// Two sequential phases: today's published articles by views, then a
/// fallback over all published articles excluding the ones already picked.
/// The fallback depends on the ids collected by the primary phase, so the
/// queries cannot run concurrently. Fewer than five published articles in
/// the whole store simply yields a shorter list.
pub async fn fetch_top_digest_articles(
    store: &dyn ArticleStore,
    site_url: &str,
    now: DateTime<Utc>,
) -> Result<Vec<ArticleSnapshot>> {
    let since = start_of_today(now);
    let mut articles = store
        .find(&ArticleQuery::published(MAX_DIGEST_ARTICLES).updated_since(since))
        .await?;
    debug!("primary digest query returned {} articles", articles.len());

    if articles.len() < MAX_DIGEST_ARTICLES {
        let collected: Vec<String> = articles.iter().map(|a| a.id.clone()).collect();
        let fallback = store
            .find(
                &ArticleQuery::published(MAX_DIGEST_ARTICLES - articles.len())
                    .excluding(collected),
            )
            .await?;
        debug!("fallback digest query returned {} articles", fallback.len());
        articles.extend(fallback);
    }

    articles.truncate(MAX_DIGEST_ARTICLES);
    Ok(articles
        .iter()
        .map(|article| snapshot(article, site_url))
        .collect())
}

fn snapshot(article: &Article, site_url: &str) -> ArticleSnapshot {
    let summary =
        extract_summary(&article.layout).unwrap_or_else(|| FALLBACK_SUMMARY.to_string());
    ArticleSnapshot {
        post_id: article.id.clone(),
        title: article.title.clone(),
        summary,
        url: format!("{}/news/{}", site_url.trim_end_matches('/'), article.slug),
        views: article.views.unwrap_or(0).max(0) as u64,
        image_url: extract_hero_image(&article.layout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use dawan_core::{ArticleStatus, ContentBlock};
    use dawan_storage::MemoryStore;

    const SITE: &str = "https://dawan.so";

    fn now() -> DateTime<Utc> {
        // 10:00 Mogadishu time on 2025-03-05
        Utc.with_ymd_and_hms(2025, 3, 5, 7, 0, 0).unwrap()
    }

    fn article(id: &str, views: i64, updated_at: DateTime<Utc>) -> Article {
        Article {
            id: id.to_string(),
            title: format!("Title {}", id),
            slug: format!("slug-{}", id),
            status: ArticleStatus::Published,
            views: Some(views),
            updated_at,
            layout: vec![],
        }
    }

    fn today(views: i64, id: &str) -> Article {
        article(id, views, Utc.with_ymd_and_hms(2025, 3, 5, 6, 0, 0).unwrap())
    }

    fn older(views: i64, id: &str) -> Article {
        article(id, views, Utc.with_ymd_and_hms(2025, 2, 1, 6, 0, 0).unwrap())
    }

    #[test]
    fn start_of_today_is_mogadishu_midnight_in_utc() {
        // 00:30 local on March 5 is 21:30 UTC on March 4.
        let just_past_midnight = Utc.with_ymd_and_hms(2025, 3, 4, 21, 30, 0).unwrap();
        let start = start_of_today(just_past_midnight);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 4, 21, 0, 0).unwrap());

        // 23:30 local on March 4 still belongs to March 4.
        let late_evening = Utc.with_ymd_and_hms(2025, 3, 4, 20, 30, 0).unwrap();
        let start = start_of_today(late_evening);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 3, 21, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn returns_five_when_enough_published_articles_exist() {
        let store = MemoryStore::new();
        store
            .seed(vec![
                today(10, "t1"),
                today(20, "t2"),
                older(500, "o1"),
                older(400, "o2"),
                older(300, "o3"),
                older(200, "o4"),
            ])
            .await;

        let snapshots = fetch_top_digest_articles(&store, SITE, now()).await.unwrap();
        assert_eq!(snapshots.len(), 5);

        // Today's articles lead (views desc), then fallback (views desc).
        let ids: Vec<&str> = snapshots.iter().map(|s| s.post_id.as_str()).collect();
        assert_eq!(ids, vec!["t2", "t1", "o1", "o2", "o3"]);
    }

    #[tokio::test]
    async fn returns_k_when_store_holds_fewer_than_five() {
        let store = MemoryStore::new();
        store.seed(vec![today(1, "a"), older(2, "b")]).await;

        let snapshots = fetch_top_digest_articles(&store, SITE, now()).await.unwrap();
        assert_eq!(snapshots.len(), 2);
    }

    #[tokio::test]
    async fn empty_store_yields_empty_digest() {
        let store = MemoryStore::new();
        let snapshots = fetch_top_digest_articles(&store, SITE, now()).await.unwrap();
        assert!(snapshots.is_empty());
    }

    #[tokio::test]
    async fn no_article_appears_twice_across_phases() {
        let store = MemoryStore::new();
        // Today's articles also top the all-time views ranking.
        store
            .seed(vec![
                today(900, "t1"),
                today(800, "t2"),
                older(700, "o1"),
            ])
            .await;

        let snapshots = fetch_top_digest_articles(&store, SITE, now()).await.unwrap();
        let mut ids: Vec<&str> = snapshots.iter().map(|s| s.post_id.as_str()).collect();
        let len_before = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), len_before);
        assert_eq!(snapshots.len(), 3);
    }

    #[tokio::test]
    async fn snapshot_fields_match_the_article() {
        let store = MemoryStore::new();
        let mut art = today(42, "p1");
        art.slug = "flood-relief".to_string();
        art.layout = vec![ContentBlock::Cover {
            subheading: Some("Relief efforts expand across the south".to_string()),
            image: None,
        }];
        store.seed(vec![art]).await;

        let snapshots = fetch_top_digest_articles(&store, SITE, now()).await.unwrap();
        assert_eq!(snapshots.len(), 1);
        let snap = &snapshots[0];
        assert_eq!(snap.post_id, "p1");
        assert_eq!(snap.title, "Title p1");
        assert_eq!(snap.summary, "Relief efforts expand across the south");
        assert_eq!(snap.url, "https://dawan.so/news/flood-relief");
        assert_eq!(snap.views, 42);
        assert_eq!(snap.image_url, None);
    }

    #[tokio::test]
    async fn summary_falls_back_to_the_fixed_sentence() {
        let store = MemoryStore::new();
        store.seed(vec![today(1, "bare")]).await;

        let snapshots = fetch_top_digest_articles(&store, SITE, now()).await.unwrap();
        assert_eq!(snapshots[0].summary, FALLBACK_SUMMARY);
    }

    #[tokio::test]
    async fn trailing_slash_on_site_url_is_normalized() {
        let store = MemoryStore::new();
        store.seed(vec![today(1, "x")]).await;

        let snapshots = fetch_top_digest_articles(&store, "https://dawan.so/", now())
            .await
            .unwrap();
        assert_eq!(snapshots[0].url, "https://dawan.so/news/slug-x");
    }

    #[tokio::test]
    async fn negative_or_missing_views_count_as_zero() {
        let store = MemoryStore::new();
        let mut art = today(0, "n");
        art.views = Some(-7);
        let mut no_views = today(0, "m");
        no_views.views = None;
        store.seed(vec![art, no_views]).await;

        let snapshots = fetch_top_digest_articles(&store, SITE, now()).await.unwrap();
        assert!(snapshots.iter().all(|s| s.views == 0));
    }
}
