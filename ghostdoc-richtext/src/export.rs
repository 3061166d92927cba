//! Export planning: what to insert into a fresh document and how to style it.
//!
//! A plan is two batch updates, applied in order by the caller: the text
//! insertion, then the formatting. Formatting is best effort and a failed
//! formatting batch must not undo the insertion.

use serde::Serialize;

use crate::docs::{BatchUpdate, DocsRequest, insert_text};
use crate::ops::to_style_operations;
use crate::parse::parse;

/// Width of the rule separating the transcript header from its body.
const RULE_WIDTH: usize = 50;

/// Requests needed to populate one exported document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPlan {
    /// Text that ends up in the document.
    pub text: String,
    /// Whether `text` came from HTML and carries style requests.
    pub formatted: bool,
    pub insert: BatchUpdate,
    pub formatting: BatchUpdate,
}

/// Plan an article export.
///
/// HTML wins when it flattens to non-empty text. When it cannot be parsed
/// the failure is logged and the article is exported unformatted: the plain
/// version if given, otherwise the raw HTML string.
pub fn plan_article_export(plain: Option<&str>, html: Option<&str>, base_offset: usize) -> ExportPlan {
    let fallback = || plain.or(html).unwrap_or_default().to_string();

    let Some(html) = html.filter(|h| !h.is_empty()) else {
        return unformatted(fallback(), base_offset);
    };

    match parse(html) {
        Ok(result) if !result.text.is_empty() => {
            let formatting: BatchUpdate = to_style_operations(&result.ranges, base_offset)
                .iter()
                .map(DocsRequest::from)
                .collect();
            tracing::info!(
                ranges = result.ranges.len(),
                requests = formatting.len(),
                "Planned formatted export"
            );
            ExportPlan {
                formatted: !formatting.is_empty(),
                insert: BatchUpdate {
                    requests: vec![insert_text(base_offset, result.text.as_str())],
                },
                text: result.text,
                formatting,
            }
        }
        Ok(_) => unformatted(fallback(), base_offset),
        Err(e) => {
            tracing::warn!(error = %e, "HTML parsing failed, exporting unformatted text");
            unformatted(fallback(), base_offset)
        }
    }
}

/// Plan a transcript export; transcripts are inserted without formatting.
pub fn plan_transcript_export(body: &str, base_offset: usize) -> ExportPlan {
    unformatted(body.to_string(), base_offset)
}

fn unformatted(text: String, base_offset: usize) -> ExportPlan {
    ExportPlan {
        insert: BatchUpdate {
            requests: vec![insert_text(base_offset, text.as_str())],
        },
        text,
        formatted: false,
        formatting: BatchUpdate::default(),
    }
}

/// Build the document body for an exported transcript.
pub fn transcript_body(headline: Option<&str>, angle: Option<&str>, transcript: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!(
        "TOPIC: {}\n\nANGLE: {}\n\n{rule}\nTRANSCRIPTION\n{rule}\n\n{transcript}",
        headline.unwrap_or("Untitled"),
        angle.unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn html_is_preferred() {
        let plan = plan_article_export(
            Some("Hello world"),
            Some("<p>Hello <strong>world</strong></p>"),
            1,
        );
        assert_eq!(plan.text, "Hello world\n");
        assert!(plan.formatted);
        assert_eq!(plan.insert.requests, vec![insert_text(1, "Hello world\n")]);
        assert_eq!(plan.formatting.len(), 1);
    }

    #[test]
    fn falls_back_to_plain_on_parse_error() {
        let plan = plan_article_export(Some("plain copy"), Some("<p>broken <a href=\"x"), 1);
        assert_eq!(plan.text, "plain copy");
        assert!(!plan.formatted);
        assert!(plan.formatting.is_empty());
    }

    #[test]
    fn falls_back_to_raw_html_without_plain() {
        let html = "<b>oops";
        let plan = plan_article_export(None, Some("<b"), 1);
        assert_eq!(plan.text, "<b");
        // Dangling tags are not errors: the HTML is still used.
        let plan = plan_article_export(None, Some(html), 1);
        assert_eq!(plan.text, "oops");
    }

    #[test]
    fn plain_only() {
        let plan = plan_article_export(Some("just text"), None, 1);
        assert_eq!(plan.text, "just text");
        assert_eq!(plan.insert.len(), 1);
        assert!(!plan.formatted);
    }

    #[test]
    fn html_without_styles_is_not_formatted() {
        let plan = plan_article_export(None, Some("<p>nothing fancy</p>"), 1);
        assert_eq!(plan.text, "nothing fancy\n");
        assert!(!plan.formatted);
    }

    #[test]
    fn markup_only_html_falls_back() {
        let plan = plan_article_export(Some("fallback"), Some("<span></span>"), 1);
        assert_eq!(plan.text, "fallback");
    }

    #[test]
    fn transcript_layout() {
        let body = transcript_body(Some("Remote teams"), Some("Trust first"), "We started...");
        let rule = "=".repeat(50);
        assert_eq!(
            body,
            format!("TOPIC: Remote teams\n\nANGLE: Trust first\n\n{rule}\nTRANSCRIPTION\n{rule}\n\nWe started...")
        );
        assert!(transcript_body(None, None, "x").starts_with("TOPIC: Untitled\n\nANGLE: \n\n"));
    }

    #[test]
    fn transcript_plan_is_insert_only() {
        let plan = plan_transcript_export("body", 1);
        assert_eq!(plan.insert.requests, vec![insert_text(1, "body")]);
        assert!(plan.formatting.is_empty());
    }
}
