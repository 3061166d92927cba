use serde::{Deserialize, Serialize};

/// Formatting attribute carried by one [`StyleRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleKind {
    Bold,
    Italic,
    Underline,
    Link,
    #[serde(rename = "heading-2")]
    Heading2,
    #[serde(rename = "heading-3")]
    Heading3,
    Blockquote,
}

impl StyleKind {
    /// Number of variants, used to size per-kind tables.
    pub const COUNT: usize = 7;

    /// All kinds in declaration order.
    pub const ALL: [StyleKind; Self::COUNT] = [
        StyleKind::Bold,
        StyleKind::Italic,
        StyleKind::Underline,
        StyleKind::Link,
        StyleKind::Heading2,
        StyleKind::Heading3,
        StyleKind::Blockquote,
    ];

    /// Dense index of this kind into a `[_; StyleKind::COUNT]` table.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Map a lowercase HTML tag name to the style it opens, if any.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "strong" | "b" => Some(StyleKind::Bold),
            "em" | "i" => Some(StyleKind::Italic),
            "u" => Some(StyleKind::Underline),
            "a" => Some(StyleKind::Link),
            "h2" => Some(StyleKind::Heading2),
            "h3" => Some(StyleKind::Heading3),
            "blockquote" => Some(StyleKind::Blockquote),
            _ => None,
        }
    }

    /// Whether closing this kind implies a block break.
    pub fn is_block(self) -> bool {
        matches!(
            self,
            StyleKind::Heading2 | StyleKind::Heading3 | StyleKind::Blockquote
        )
    }
}

/// One contiguous span of flattened text sharing one style attribute.
///
/// Offsets count chars of [`ParseResult::text`]; `start < end` always holds
/// for ranges produced by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRange {
    pub kind: StyleKind,
    pub start: usize,
    pub end: usize,
    /// Hyperlink target. Only ever set for [`StyleKind::Link`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl StyleRange {
    /// Number of chars covered by the range.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Output of one translation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    /// Flattened plain text with all markup stripped.
    pub text: String,
    /// Style ranges in the order their closing tags were seen.
    pub ranges: Vec<StyleRange>,
}

impl ParseResult {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.ranges.is_empty()
    }

    /// The slice of `text` covered by `range`, resolved by char offsets.
    pub fn slice(&self, range: &StyleRange) -> &str {
        let mut indices = self
            .text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(self.text.len()));
        let start = indices.nth(range.start).unwrap_or(self.text.len());
        let end = if range.end > range.start {
            indices
                .nth(range.end - range.start - 1)
                .unwrap_or(self.text.len())
        } else {
            start
        };
        &self.text[start..end]
    }
}

/// Instruction to apply one style to an absolute span of the destination
/// document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleOperation {
    pub absolute_start: usize,
    pub absolute_end: usize,
    pub attributes: TextStyle,
}

/// Text style payload, shaped like the document service's `textStyle` object.
///
/// Unset attributes are omitted on the wire and left untouched by the
/// service, so only the fields listed by [`TextStyle::fields`] are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground_color: Option<OptionalColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<Dimension>,
}

impl TextStyle {
    /// Comma-separated update mask naming every attribute that is set.
    pub fn fields(&self) -> String {
        let mut fields = Vec::new();
        if self.bold.is_some() {
            fields.push("bold");
        }
        if self.italic.is_some() {
            fields.push("italic");
        }
        if self.underline.is_some() {
            fields.push("underline");
        }
        if self.link.is_some() {
            fields.push("link");
        }
        if self.foreground_color.is_some() {
            fields.push("foregroundColor");
        }
        if self.font_size.is_some() {
            fields.push("fontSize");
        }
        fields.join(",")
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }
}

/// Hyperlink target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
}

/// Color wrapper matching the service's `OptionalColor` shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionalColor {
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    pub rgb_color: RgbColor,
}

/// RGB components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RgbColor {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl RgbColor {
    /// Foreground color applied to hyperlinks.
    pub const TEAL: RgbColor = RgbColor {
        red: 0.0,
        green: 0.5,
        blue: 0.5,
    };
}

impl From<RgbColor> for OptionalColor {
    fn from(rgb_color: RgbColor) -> Self {
        OptionalColor {
            color: Color { rgb_color },
        }
    }
}

/// A length with unit, e.g. a font size in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub magnitude: f32,
    pub unit: String,
}

impl Dimension {
    pub fn points(magnitude: f32) -> Self {
        Dimension {
            magnitude,
            unit: "PT".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverted_range_has_zero_len() {
        let range: StyleRange = serde_json::from_str(r#"{"kind":"bold","start":7,"end":3}"#).unwrap();
        assert!(range.is_empty());
        assert_eq!(range.len(), 0);
    }
}
