use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Publication state of a CMS article document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Published,
    Draft,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Published => "published",
            ArticleStatus::Draft => "draft",
        }
    }
}

/// An article document as stored in the CMS collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub status: ArticleStatus,
    #[serde(default)]
    pub views: Option<i64>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub layout: Vec<ContentBlock>,
}

/// A typed content block from an article's layout. Unknown block kinds
/// deserialize into `Other` rather than failing the whole document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "blockType", rename_all = "lowercase")]
pub enum ContentBlock {
    Cover {
        #[serde(default)]
        subheading: Option<String>,
        #[serde(default)]
        image: Option<ImageRef>,
    },
    RichText {
        #[serde(default)]
        content: Vec<RichTextNode>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

/// A node in a rich-text tree: a text leaf, a container of child nodes, or
/// anything else. Deserialized leniently so malformed nodes become `Unknown`
/// instead of errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRichTextNode")]
pub enum RichTextNode {
    Text(String),
    Container(Vec<RichTextNode>),
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
struct RawRichTextNode {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    children: Option<Vec<RichTextNode>>,
}

impl From<RawRichTextNode> for RichTextNode {
    fn from(raw: RawRichTextNode) -> Self {
        if raw.kind.as_deref() == Some("text") {
            RichTextNode::Text(raw.text.unwrap_or_default())
        } else if let Some(children) = raw.children {
            RichTextNode::Container(children)
        } else {
            RichTextNode::Unknown
        }
    }
}

/// The per-run unit handed to the renderer. Built fresh on every digest run,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSnapshot {
    pub post_id: String,
    pub title: String,
    pub summary: String,
    pub url: String,
    pub views: u64,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    ViewsDesc,
}

/// Typed query against the article store. An empty `exclude_ids` means the
/// exclusion clause is omitted entirely.
#[derive(Debug, Clone)]
pub struct ArticleQuery {
    pub status: ArticleStatus,
    pub updated_since: Option<DateTime<Utc>>,
    pub exclude_ids: Vec<String>,
    pub sort: SortKey,
    pub limit: usize,
}

impl ArticleQuery {
    pub fn published(limit: usize) -> Self {
        Self {
            status: ArticleStatus::Published,
            updated_since: None,
            exclude_ids: Vec::new(),
            sort: SortKey::default(),
            limit,
        }
    }

    pub fn updated_since(mut self, since: DateTime<Utc>) -> Self {
        self.updated_since = Some(since);
        self
    }

    pub fn excluding(mut self, ids: Vec<String>) -> Self {
        self.exclude_ids = ids;
        self
    }
}

/// A fully rendered message handed to the email dispatcher.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub headers: Vec<(String, String)>,
}
