use dawan_core::{ContentBlock, RichTextNode};

/// Maximum summary length in characters, before the ellipsis.
pub const SUMMARY_MAX_CHARS: usize = 220;

/// Pull a plain-text summary out of an article's layout.
///
/// The first cover block with a non-empty subheading wins verbatim. Failing
/// that, the first rich-text block is flattened and truncated. Returns `None`
/// when neither source yields any text; never panics on malformed blocks.
pub fn extract_summary(blocks: &[ContentBlock]) -> Option<String> {
    let mut first_richtext: Option<&[RichTextNode]> = None;
    for block in blocks {
        match block {
            ContentBlock::Cover {
                subheading: Some(subheading),
                ..
            } if !subheading.trim().is_empty() => {
                return Some(subheading.clone());
            }
            ContentBlock::RichText { content } if first_richtext.is_none() => {
                first_richtext = Some(content);
            }
            _ => {}
        }
    }

    let text = flatten(first_richtext?);
    if text.is_empty() {
        None
    } else {
        Some(truncate(&text, SUMMARY_MAX_CHARS))
    }
}

/// Hero image for the digest card. Only cover blocks are inspected here;
/// image blocks are intentionally ignored for this pipeline.
pub fn extract_hero_image(blocks: &[ContentBlock]) -> Option<String> {
    blocks.iter().find_map(|block| match block {
        ContentBlock::Cover {
            image: Some(image), ..
        } => image.url.clone(),
        _ => None,
    })
}

/// Flatten a rich-text tree into a single whitespace-normalized string.
pub fn flatten(nodes: &[RichTextNode]) -> String {
    let mut parts = Vec::new();
    for node in nodes {
        match node {
            RichTextNode::Text(text) => parts.push(text.clone()),
            RichTextNode::Container(children) => parts.push(flatten(children)),
            RichTextNode::Unknown => {}
        }
    }
    parts
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Hard character-cut truncation: strings at or under `max_chars` pass
/// through unchanged, longer ones are cut at `max_chars`, trailing whitespace
/// trimmed, and a single ellipsis appended.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let cut: String = s.chars().take(max_chars).collect();
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dawan_core::ImageRef;

    fn text(s: &str) -> RichTextNode {
        RichTextNode::Text(s.to_string())
    }

    #[test]
    fn truncate_is_identity_under_limit() {
        let s = "a".repeat(220);
        assert_eq!(truncate(&s, 220), s);
        assert_eq!(truncate("short", 220), "short");
    }

    #[test]
    fn truncate_cuts_and_appends_ellipsis() {
        let s = "a".repeat(300);
        let out = truncate(&s, 220);
        assert_eq!(out.chars().count(), 221);
        assert!(out.starts_with(&"a".repeat(220)));
        assert!(out.ends_with('…'));
    }

    #[test]
    fn truncate_trims_trailing_whitespace_before_ellipsis() {
        let mut s = "b".repeat(219);
        s.push(' ');
        s.push_str(&"c".repeat(50));
        let out = truncate(&s, 220);
        assert_eq!(out, format!("{}…", "b".repeat(219)));
    }

    #[test]
    fn flatten_is_deterministic() {
        let nodes = vec![
            text("Hello"),
            RichTextNode::Container(vec![text("nested"), text("world")]),
        ];
        assert_eq!(flatten(&nodes), flatten(&nodes));
        assert_eq!(flatten(&nodes), "Hello nested world");
    }

    #[test]
    fn flatten_handles_empty_and_textless_nodes() {
        assert_eq!(flatten(&[]), "");
        assert_eq!(flatten(&[RichTextNode::Container(vec![])]), "");
        assert_eq!(flatten(&[text("")]), "");
        assert_eq!(flatten(&[RichTextNode::Unknown]), "");
    }

    #[test]
    fn flatten_collapses_whitespace_runs() {
        let nodes = vec![text("  spaced   out "), text("words\n\there")];
        assert_eq!(flatten(&nodes), "spaced out words here");
    }

    #[test]
    fn summary_prefers_cover_subheading_verbatim() {
        let long_subheading = "s".repeat(400);
        let blocks = vec![
            ContentBlock::RichText {
                content: vec![text("body text")],
            },
            ContentBlock::Cover {
                subheading: Some(long_subheading.clone()),
                image: None,
            },
        ];
        // No truncation for subheadings, even past the limit.
        assert_eq!(extract_summary(&blocks), Some(long_subheading));
    }

    #[test]
    fn summary_falls_back_to_first_richtext() {
        let blocks = vec![
            ContentBlock::Cover {
                subheading: Some("   ".to_string()),
                image: None,
            },
            ContentBlock::RichText {
                content: vec![text("First paragraph.")],
            },
            ContentBlock::RichText {
                content: vec![text("Second paragraph.")],
            },
        ];
        assert_eq!(extract_summary(&blocks), Some("First paragraph.".to_string()));
    }

    #[test]
    fn summary_is_none_without_usable_text() {
        assert_eq!(extract_summary(&[]), None);
        let blocks = vec![
            ContentBlock::Cover {
                subheading: None,
                image: None,
            },
            ContentBlock::Other,
        ];
        assert_eq!(extract_summary(&blocks), None);
    }

    #[test]
    fn hero_image_reads_cover_blocks_only() {
        let blocks = vec![
            ContentBlock::Other,
            ContentBlock::Cover {
                subheading: None,
                image: Some(ImageRef {
                    url: Some("/media/hero.jpg".to_string()),
                    alt: None,
                }),
            },
        ];
        assert_eq!(extract_hero_image(&blocks), Some("/media/hero.jpg".to_string()));
        assert_eq!(extract_hero_image(&[ContentBlock::Other]), None);
    }

    #[test]
    fn hero_image_skips_cover_without_url() {
        let blocks = vec![
            ContentBlock::Cover {
                subheading: None,
                image: Some(ImageRef {
                    url: None,
                    alt: Some("no url".to_string()),
                }),
            },
            ContentBlock::Cover {
                subheading: None,
                image: Some(ImageRef {
                    url: Some("https://dawan.so/media/second.jpg".to_string()),
                    alt: None,
                }),
            },
        ];
        assert_eq!(
            extract_hero_image(&blocks),
            Some("https://dawan.so/media/second.jpg".to_string())
        );
    }
}
