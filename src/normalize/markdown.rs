use super::{NormalizeError, Normalizer};
use htmd::HtmlToMarkdown;
use scraper::{Html, Selector};
use url::Url;

/// Tags whose content never belongs in the stored document
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// HTML to Markdown normalizer built on `htmd`
///
/// When conversion fails or yields nothing, falls back to the visible text of
/// `<body>`, one text run per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownNormalizer;

impl MarkdownNormalizer {
    pub fn new() -> Self {
        Self
    }

    fn converter(&self) -> HtmlToMarkdown {
        HtmlToMarkdown::builder()
            .skip_tags(SKIPPED_TAGS.to_vec())
            .build()
    }
}

impl Normalizer for MarkdownNormalizer {
    fn normalize(&self, html: &str, source_url: &Url) -> Result<String, NormalizeError> {
        match self.converter().convert(html) {
            Ok(markdown) if !markdown.trim().is_empty() => Ok(markdown.trim().to_string()),
            Ok(_) => Ok(body_text(html)),
            Err(e) => {
                tracing::debug!(
                    "Markdown conversion failed for {}: {}; using plain text",
                    source_url,
                    e
                );
                Ok(body_text(html))
            }
        }
    }
}

/// Extracts visible text from `<body>`, skipping script and style content
fn body_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let Ok(body_selector) = Selector::parse("body") else {
        return String::new();
    };
    let Some(body) = document.select(&body_selector).next() else {
        return String::new();
    };

    let mut out = String::new();
    for node in body.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let inside_skipped = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|e| SKIPPED_TAGS.contains(&e.name()))
        });
        if inside_skipped {
            continue;
        }
        let line = text.trim();
        if !line.is_empty() {
            out.push_str(line);
            out.push('\n');
        }
    }
    out.trim_end().to_string()
}
