use crate::error::ParseError;
use crate::tokenize::{Token, tokenize};
use crate::types::{ParseResult, StyleKind, StyleRange};

/// Flatten an HTML fragment into plain text plus style ranges.
///
/// Empty input yields an empty result. Unbalanced or unknown tags are
/// tolerated; only markup the scanner cannot finish (see [`ParseError`])
/// fails, and callers are expected to fall back to unformatted text.
pub fn parse(html: &str) -> Result<ParseResult, ParseError> {
    if html.is_empty() {
        return Ok(ParseResult::default());
    }

    let mut flattener = Flattener::default();
    for token in tokenize(html) {
        flattener.feed(token?);
    }

    let result = flattener.finish();
    tracing::debug!(
        chars = result.text.chars().count(),
        ranges = result.ranges.len(),
        "Flattened HTML fragment"
    );
    Ok(result)
}

/// Like [`parse`], treating `None` as empty input.
pub fn parse_optional(html: Option<&str>) -> Result<ParseResult, ParseError> {
    parse(html.unwrap_or_default())
}

/// Like [`parse`], for raw bytes that must be valid UTF-8.
pub fn parse_bytes(bytes: &[u8]) -> Result<ParseResult, ParseError> {
    let html = std::str::from_utf8(bytes).map_err(|e| ParseError::InvalidUtf8 {
        offset: e.valid_up_to(),
    })?;
    parse(html)
}

// ------------------------------------------------------------------
// Flattening state
// ------------------------------------------------------------------

/// Single-pass state: the text buffer plus one stack of pending start
/// offsets per style kind.
#[derive(Default)]
struct Flattener {
    text: String,
    /// Length of `text` in chars; all offsets are expressed in chars.
    len: usize,
    open: [Vec<usize>; StyleKind::COUNT],
    link_url: Option<String>,
    ranges: Vec<StyleRange>,
}

impl Flattener {
    fn feed(&mut self, token: Token<'_>) {
        match token {
            Token::Text(text) => self.push_str(&text),
            Token::StartTag {
                ref name,
                self_closing,
                ..
            } => {
                self.open_tag(name, &token);
                if self_closing {
                    self.close_tag(name);
                }
            }
            Token::EndTag { name } => self.close_tag(&name),
        }
    }

    fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
        self.len += s.chars().count();
    }

    fn ensure_newline(&mut self) {
        if !self.text.ends_with('\n') {
            self.push_str("\n");
        }
    }

    fn open_tag(&mut self, name: &str, token: &Token<'_>) {
        match name {
            "br" => self.push_str("\n"),
            "p" | "div" => {
                if !self.text.is_empty() {
                    self.ensure_newline();
                }
            }
            _ => {
                let Some(kind) = StyleKind::from_tag(name) else {
                    return;
                };
                if kind == StyleKind::Link {
                    self.link_url = token
                        .attr("href")
                        .filter(|href| !href.is_empty())
                        .map(str::to_string);
                }
                self.open[kind.index()].push(self.len);
            }
        }
    }

    fn close_tag(&mut self, name: &str) {
        if matches!(name, "p" | "div") {
            self.ensure_newline();
            return;
        }
        let Some(kind) = StyleKind::from_tag(name) else {
            return;
        };

        if let Some(start) = self.open[kind.index()].pop() {
            let end = self.len;
            if end > start {
                let url = match kind {
                    StyleKind::Link => self.link_url.clone(),
                    _ => None,
                };
                self.ranges.push(StyleRange {
                    kind,
                    start,
                    end,
                    url,
                });
            }
        }

        if kind == StyleKind::Link {
            self.link_url = None;
        }
        if kind.is_block() {
            self.ensure_newline();
        }
    }

    fn finish(self) -> ParseResult {
        let dangling: usize = self.open.iter().map(Vec::len).sum();
        if dangling > 0 {
            tracing::debug!(dangling, "Discarding unclosed style tags");
        }
        ParseResult {
            text: self.text,
            ranges: self.ranges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn range(kind: StyleKind, start: usize, end: usize) -> StyleRange {
        StyleRange {
            kind,
            start,
            end,
            url: None,
        }
    }

    #[test]
    fn empty_and_none_inputs() {
        assert_eq!(parse("").unwrap(), ParseResult::default());
        assert_eq!(parse_optional(None).unwrap(), ParseResult::default());
        assert_eq!(parse_optional(Some("")).unwrap(), ParseResult::default());
    }

    #[test]
    fn paragraph_with_bold() {
        let result = parse("<p>Hello <strong>world</strong></p>").unwrap();
        assert_eq!(result.text, "Hello world\n");
        assert_eq!(result.ranges, vec![range(StyleKind::Bold, 6, 11)]);
        assert_eq!(result.slice(&result.ranges[0]), "world");
    }

    #[test]
    fn tag_aliases() {
        let result = parse("<b>a</b><i>b</i><em>c</em><u>d</u>").unwrap();
        assert_eq!(result.text, "abcd");
        assert_eq!(
            result.ranges,
            vec![
                range(StyleKind::Bold, 0, 1),
                range(StyleKind::Italic, 1, 2),
                range(StyleKind::Italic, 2, 3),
                range(StyleKind::Underline, 3, 4),
            ]
        );
    }

    #[test]
    fn heading_forces_newline() {
        let result = parse("<h2>Title</h2>Body").unwrap();
        assert_eq!(result.text, "Title\nBody");
        assert_eq!(result.ranges, vec![range(StyleKind::Heading2, 0, 5)]);
    }

    #[test]
    fn heading_three_and_blockquote() {
        let result = parse("<h3>Sub</h3><blockquote>Quote</blockquote>").unwrap();
        assert_eq!(result.text, "Sub\nQuote\n");
        assert_eq!(
            result.ranges,
            vec![
                range(StyleKind::Heading3, 0, 3),
                range(StyleKind::Blockquote, 4, 9),
            ]
        );
    }

    #[test]
    fn unclosed_tag_is_discarded() {
        let result = parse("<strong>bold text").unwrap();
        assert_eq!(result.text, "bold text");
        assert!(result.ranges.is_empty());
    }

    #[test]
    fn stray_close_tag_is_ignored() {
        let result = parse("plain</em> text").unwrap();
        assert_eq!(result.text, "plain text");
        assert!(result.ranges.is_empty());
    }

    #[test]
    fn link_captures_href() {
        let result = parse(r#"Read <a href="https://example.com">this</a>."#).unwrap();
        assert_eq!(result.text, "Read this.");
        assert_eq!(
            result.ranges,
            vec![StyleRange {
                kind: StyleKind::Link,
                start: 5,
                end: 9,
                url: Some("https://example.com".into()),
            }]
        );
    }

    #[test]
    fn link_without_href_has_no_url() {
        let result = parse("<a>click</a>").unwrap();
        assert_eq!(result.text, "click");
        assert_eq!(result.ranges, vec![range(StyleKind::Link, 0, 5)]);

        let result = parse(r#"<a href="">click</a>"#).unwrap();
        assert_eq!(result.ranges[0].url, None);
    }

    #[test]
    fn same_kind_nesting_closes_innermost_first() {
        let result = parse("<b>one <b>two</b> three</b>").unwrap();
        assert_eq!(result.text, "one two three");
        assert_eq!(
            result.ranges,
            vec![range(StyleKind::Bold, 4, 7), range(StyleKind::Bold, 0, 13)]
        );
    }

    #[test]
    fn misnested_tags_still_produce_ranges() {
        let result = parse("<b>bold <i>both</b> italic</i>").unwrap();
        assert_eq!(result.text, "bold both italic");
        assert_eq!(
            result.ranges,
            vec![range(StyleKind::Bold, 0, 9), range(StyleKind::Italic, 5, 16)]
        );
    }

    #[test]
    fn empty_range_is_discarded() {
        let result = parse("a<b></b>c<em/>").unwrap();
        assert_eq!(result.text, "ac");
        assert!(result.ranges.is_empty());
    }

    #[test]
    fn line_breaks_and_paragraphs() {
        let result = parse("<p>One</p><p>Two<br>Three</p><div>Four</div>").unwrap();
        assert_eq!(result.text, "One\nTwo\nThree\nFour\n");
    }

    #[test]
    fn paragraph_open_separates_inline_text() {
        let result = parse("Intro<p>Body</p>").unwrap();
        assert_eq!(result.text, "Intro\nBody\n");
    }

    #[test]
    fn unknown_tags_are_transparent() {
        let result = parse("<span class=\"x\">in <mark>side</mark></span>").unwrap();
        assert_eq!(result.text, "in side");
        assert!(result.ranges.is_empty());
    }

    #[test]
    fn bold_inside_heading_overlaps() {
        let result = parse("<h2>Big <b>news</b></h2>").unwrap();
        assert_eq!(result.text, "Big news\n");
        assert_eq!(
            result.ranges,
            vec![range(StyleKind::Bold, 4, 8), range(StyleKind::Heading2, 0, 8)]
        );
    }

    #[test]
    fn offsets_count_chars_not_bytes() {
        let result = parse("caf\u{e9} <b>na\u{ef}ve</b>").unwrap();
        assert_eq!(result.ranges, vec![range(StyleKind::Bold, 5, 10)]);
        assert_eq!(result.slice(&result.ranges[0]), "na\u{ef}ve");
    }

    #[test]
    fn entities_count_as_one_char() {
        let result = parse("a&amp;b <i>c&nbsp;d</i>").unwrap();
        assert_eq!(result.text, "a&b c\u{a0}d");
        assert_eq!(result.ranges, vec![range(StyleKind::Italic, 4, 7)]);
    }

    #[test]
    fn decodes_html5_entities_in_copy() {
        let result = parse("<p>Caf&eacute; <b>r&eacute;sum&eacute;</b> &hearts; &#150; AT&amp T</p>").unwrap();
        assert_eq!(result.text, "Café résumé ♥ \u{2013} AT& T\n");
        assert_eq!(result.ranges, vec![range(StyleKind::Bold, 5, 11)]);
    }

    #[test]
    fn malformed_markup_is_an_error() {
        let err = parse("<p>Cut off <a href=\"https://exa").unwrap_err();
        assert!(matches!(err, ParseError::UnterminatedTag { .. }));
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let err = parse_bytes(b"<b>ok</b>\xff").unwrap_err();
        assert_eq!(err, ParseError::InvalidUtf8 { offset: 9 });
        assert_eq!(parse_bytes(b"<b>ok</b>").unwrap().text, "ok");
    }
}
