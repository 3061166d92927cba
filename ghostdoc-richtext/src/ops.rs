//! Style ranges to absolute style operations.

use crate::types::{Dimension, Link, RgbColor, StyleKind, StyleOperation, StyleRange, TextStyle};

/// Font size applied to `<h2>` spans, in points.
pub const HEADING_2_PT: f32 = 16.0;
/// Font size applied to `<h3>` spans, in points.
pub const HEADING_3_PT: f32 = 14.0;

impl StyleRange {
    /// The attribute payload this range maps to, or `None` when it produces
    /// no operation (blockquotes, and links without a target).
    pub fn text_style(&self) -> Option<TextStyle> {
        let style = match self.kind {
            StyleKind::Bold => TextStyle {
                bold: Some(true),
                ..Default::default()
            },
            StyleKind::Italic => TextStyle {
                italic: Some(true),
                ..Default::default()
            },
            StyleKind::Underline => TextStyle {
                underline: Some(true),
                ..Default::default()
            },
            StyleKind::Link => {
                let url = self.url.as_deref().filter(|u| !u.is_empty())?;
                TextStyle {
                    link: Some(Link {
                        url: url.to_string(),
                    }),
                    foreground_color: Some(RgbColor::TEAL.into()),
                    ..Default::default()
                }
            }
            StyleKind::Heading2 => TextStyle {
                bold: Some(true),
                font_size: Some(Dimension::points(HEADING_2_PT)),
                ..Default::default()
            },
            StyleKind::Heading3 => TextStyle {
                bold: Some(true),
                font_size: Some(Dimension::points(HEADING_3_PT)),
                ..Default::default()
            },
            StyleKind::Blockquote => return None,
        };
        Some(style)
    }
}

/// Translate style ranges into operations positioned at `base_offset` in the
/// destination document.
///
/// Output order follows `ranges`. Ranges that map to no style are skipped,
/// as are ranges whose shifted position does not fit in a `usize`; the
/// function never fails.
pub fn to_style_operations(ranges: &[StyleRange], base_offset: usize) -> Vec<StyleOperation> {
    ranges
        .iter()
        .filter_map(|range| {
            let attributes = range.text_style()?;
            Some(StyleOperation {
                absolute_start: base_offset.checked_add(range.start)?,
                absolute_end: base_offset.checked_add(range.end)?,
                attributes,
            })
        })
        .collect()
}
