//! Text measurement and rasterization shared by text-bearing widgets.
//!
//! Text is laid out in grapheme clusters. Each cluster takes as many glyph
//! cells as its display width, so wide characters take two cells.

use crate::surface::{Glyphs, Rgb, Surface};
use std::borrow::Cow;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Appended to text cut short by a maximum width.
pub const ELLIPSIS: &str = "..";

/// Glyph spacing and integer scale of rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    /// Extra pixels after every grapheme, before scaling.
    pub spacing: i32,
    /// Integer magnification.
    pub scale: i32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self { spacing: 0, scale: 1 }
    }
}

fn cells(grapheme: &str) -> i32 {
    i32::try_from(grapheme.width()).unwrap_or(i32::MAX)
}

/// Unscaled width of `text` in pixels.
fn raw_width(font: &dyn Glyphs, text: &str, spacing: i32) -> i32 {
    let (cell_w, _) = font.cell_size();
    text.graphemes(true).map(|g| cells(g) * cell_w + spacing).sum()
}

/// Rendered width of `text` in pixels.
pub fn text_width(font: &dyn Glyphs, text: &str, style: TextStyle) -> i32 {
    raw_width(font, text, style.spacing) * style.scale
}

/// Rendered height of one line of text.
pub fn text_height(font: &dyn Glyphs, style: TextStyle) -> i32 {
    font.cell_size().1 * style.scale
}

/// Cut `text` so that it fits `max_width` together with [`ELLIPSIS`].
///
/// A `max_width` of zero or less means unlimited.
pub fn ellipsize<'t>(font: &dyn Glyphs, text: &'t str, max_width: i32, style: TextStyle) -> Cow<'t, str> {
    let suffix = text_width(font, ELLIPSIS, style);
    if max_width <= 0 || text_width(font, text, style) + suffix <= max_width {
        return Cow::Borrowed(text);
    }
    let mut used = suffix;
    let mut end = 0;
    for (offset, grapheme) in text.grapheme_indices(true) {
        used += text_width(font, grapheme, style);
        if used > max_width {
            break;
        }
        end = offset + grapheme.len();
    }
    Cow::Owned(format!("{}{ELLIPSIS}", &text[..end]))
}

/// Rasterize `text` onto a fresh surface whose background is black.
///
/// Callers blit the result with [`Blend::ColorKey`](crate::surface::Blend)
/// keyed on black.
pub fn render(font: &dyn Glyphs, text: &str, color: Rgb, style: TextStyle) -> Surface {
    let (cell_w, cell_h) = font.cell_size();
    let mut image = Surface::new(raw_width(font, text, style.spacing).max(1), cell_h);
    let mut left = 0;
    for grapheme in text.graphemes(true) {
        if let Some(ch) = grapheme.chars().next() {
            font.draw_glyph(&mut image, ch, left, 0, color);
        }
        left += cells(grapheme) * cell_w + style.spacing;
    }
    if style.scale > 1 {
        image.scaled(image.width() * style.scale, image.height() * style.scale)
    } else {
        image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::BlockFont;

    const FONT: BlockFont = BlockFont::DEFAULT;

    #[test]
    fn test_width_counts_graphemes() {
        let style = TextStyle::default();
        assert_eq!(text_width(&FONT, "abc", style), 24);
        // e + combining acute is one cluster
        assert_eq!(text_width(&FONT, "e\u{301}", style), 8);
        // wide CJK character takes two cells
        assert_eq!(text_width(&FONT, "漢", style), 16);
    }

    #[test]
    fn test_width_with_spacing_and_scale() {
        let style = TextStyle { spacing: 1, scale: 2 };
        assert_eq!(text_width(&FONT, "ab", style), 36);
        assert_eq!(text_height(&FONT, style), 16);
    }

    #[test]
    fn test_ellipsize_short_text_untouched() {
        let out = ellipsize(&FONT, "hi", 100, TextStyle::default());
        assert!(matches!(out, Cow::Borrowed("hi")));
    }

    #[test]
    fn test_ellipsize_cuts_to_fit() {
        let style = TextStyle::default();
        let out = ellipsize(&FONT, "abcdefgh", 48, style);
        assert_eq!(out, "abcd..");
        assert!(text_width(&FONT, &out, style) <= 48);
    }

    #[test]
    fn test_ellipsize_unlimited() {
        let out = ellipsize(&FONT, "abcdefgh", 0, TextStyle::default());
        assert_eq!(out, "abcdefgh");
    }

    #[test]
    fn test_render_sizes_image() {
        let image = render(&FONT, "ab", Rgb::WHITE, TextStyle { spacing: 0, scale: 2 });
        assert_eq!((image.width(), image.height()), (32, 16));
        let empty = render(&FONT, "", Rgb::WHITE, TextStyle::default());
        assert_eq!(empty.width(), 1);
    }
}
