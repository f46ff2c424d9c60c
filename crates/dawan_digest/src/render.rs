use chrono::{DateTime, Duration, Utc};
use dawan_core::ArticleSnapshot;
use serde::Serialize;

use crate::select::EAT_OFFSET_SECS;

/// Replaced per recipient at send time with their personal unsubscribe URL.
pub const UNSUBSCRIBE_PLACEHOLDER: &str = "{{unsubscribe_url}}";

/// Long-form date for subjects and greetings, e.g. "5 March 2025", using the
/// Mogadishu calendar day for the given instant.
pub fn format_digest_date(now: DateTime<Utc>) -> String {
    let local = now.naive_utc() + Duration::seconds(EAT_OFFSET_SECS);
    local.format("%-d %B %Y").to_string()
}

/// Subject line for the day's campaign.
pub fn digest_subject(now: DateTime<Utc>) -> String {
    format!("Dawan TV: Wararka Maanta - {}", format_digest_date(now))
}

/// Minimal structured campaign body: a root node holding a single paragraph
/// with the dated greeting. The campaign collection expects a rich-content
/// document here, not raw HTML; article cards are merged in by the caller.
#[derive(Debug, Clone, Serialize)]
pub struct DigestDocument {
    pub root: DocumentNode,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentNode {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub children: Vec<DocumentNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl DigestDocument {
    pub fn paragraph_count(&self) -> usize {
        self.root
            .children
            .iter()
            .filter(|n| n.kind == "paragraph")
            .count()
    }
}

pub fn build_default_digest_content(now: DateTime<Utc>) -> DigestDocument {
    let greeting = format!(
        "Waa kuwan wararkii ugu muhiimsanaa ee {}.",
        format_digest_date(now)
    );
    DigestDocument {
        root: DocumentNode {
            kind: "root",
            children: vec![DocumentNode {
                kind: "paragraph",
                children: vec![DocumentNode {
                    kind: "text",
                    children: vec![],
                    text: Some(greeting),
                }],
                text: None,
            }],
            text: None,
        },
    }
}

/// Full HTML body for the outgoing digest email. A run with zero snapshots
/// still renders a complete, valid body with no article section.
pub fn render_digest_html(now: DateTime<Utc>, snapshots: &[ArticleSnapshot]) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"so\">\n<body style=\"margin:0;background:#f4f4f4;font-family:Arial,Helvetica,sans-serif;\">\n");
    html.push_str("<div style=\"max-width:600px;margin:0 auto;background:#ffffff;padding:24px;\">\n");
    html.push_str(&format!(
        "<h1 style=\"color:#0b2d5c;font-size:22px;\">Dawan TV</h1>\n<p style=\"color:#444444;\">Wararka maanta, {}</p>\n",
        format_digest_date(now)
    ));

    for snapshot in snapshots {
        html.push_str("<div style=\"border-top:1px solid #e5e5e5;padding:16px 0;\">\n");
        if let Some(image_url) = &snapshot.image_url {
            html.push_str(&format!(
                "<img src=\"{}\" alt=\"\" style=\"width:100%;border-radius:4px;\" />\n",
                image_url
            ));
        }
        html.push_str(&format!(
            "<h2 style=\"font-size:17px;margin:8px 0;\"><a href=\"{}\" style=\"color:#0b2d5c;text-decoration:none;\">{}</a></h2>\n",
            snapshot.url, snapshot.title
        ));
        html.push_str(&format!(
            "<p style=\"color:#555555;font-size:14px;margin:4px 0;\">{}</p>\n",
            snapshot.summary
        ));
        html.push_str(&format!(
            "<a href=\"{}\" style=\"color:#c1272d;font-size:13px;\">Akhri wax dheeraad ah</a>\n",
            snapshot.url
        ));
        html.push_str("</div>\n");
    }

    html.push_str(&format!(
        "<p style=\"color:#999999;font-size:12px;border-top:1px solid #e5e5e5;padding-top:16px;\">Waxaad helaysaa emailkan sababtoo ah waxaad isku qortay warsidaha Dawan TV. <a href=\"{}\" style=\"color:#999999;\">Ka bax</a></p>\n",
        UNSUBSCRIBE_PLACEHOLDER
    ));
    html.push_str("</div>\n</body>\n</html>\n");
    html
}
