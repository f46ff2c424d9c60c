use chrono::{DateTime, Utc};
use dawan_core::{ArticleStore, EmailDispatcher, OutgoingEmail, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::render::{digest_subject, render_digest_html, UNSUBSCRIBE_PLACEHOLDER};
use crate::select::fetch_top_digest_articles;
use crate::token::UnsubscribeTokenService;

/// Outcome of one digest run.
#[derive(Debug, Clone, Serialize)]
pub struct DigestReport {
    pub articles: usize,
    pub sent: usize,
    pub failed: usize,
}

/// One daily digest run end to end: select articles, render once, then
/// personalize and send per recipient.
///
/// A failing recipient is logged and counted, not fatal to the batch. There
/// is no dedup across runs; invoking the job twice sends twice, and any
/// at-most-once guarantee belongs to the external scheduler.
pub struct DigestJob {
    store: Arc<dyn ArticleStore>,
    dispatcher: Arc<dyn EmailDispatcher>,
    tokens: UnsubscribeTokenService,
    site_url: String,
}

impl DigestJob {
    pub fn new(
        store: Arc<dyn ArticleStore>,
        dispatcher: Arc<dyn EmailDispatcher>,
        tokens: UnsubscribeTokenService,
        site_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            dispatcher,
            tokens,
            site_url: site_url.into(),
        }
    }

    pub async fn run(&self, recipients: &[String]) -> Result<DigestReport> {
        self.run_at(recipients, Utc::now()).await
    }

    pub async fn run_at(
        &self,
        recipients: &[String],
        now: DateTime<Utc>,
    ) -> Result<DigestReport> {
        let snapshots =
            fetch_top_digest_articles(self.store.as_ref(), &self.site_url, now).await?;
        info!("📰 selected {} articles for the digest", snapshots.len());

        let subject = digest_subject(now);
        let template = render_digest_html(now, &snapshots);

        let mut sent = 0;
        let mut failed = 0;
        for recipient in recipients {
            let unsubscribe_url = self.tokens.build_unsubscribe_url(recipient)?;
            let email = OutgoingEmail {
                to: recipient.clone(),
                subject: subject.clone(),
                html: template.replace(UNSUBSCRIBE_PLACEHOLDER, &unsubscribe_url),
                headers: vec![
                    (
                        "List-Unsubscribe".to_string(),
                        format!("<{}>", unsubscribe_url),
                    ),
                    (
                        "List-Unsubscribe-Post".to_string(),
                        "List-Unsubscribe=One-Click".to_string(),
                    ),
                ],
            };
            match self.dispatcher.send(&email).await {
                Ok(()) => sent += 1,
                Err(e) => {
                    warn!("failed to send digest to {}: {}", recipient, e);
                    failed += 1;
                }
            }
        }

        info!("✨ digest run complete: {} sent, {} failed", sent, failed);
        Ok(DigestReport {
            articles: snapshots.len(),
            sent,
            failed,
        })
    }
}
