//! Label: a line of text, optionally formatted around a value.

use super::text::{self, TextStyle};
use crate::config::{Property, INVALIDATE};
use crate::surface::{Blend, Rgb, Surface};
use crate::tree::{ControlCx, DrawCx, Widget};
use std::fmt::Display;

/// Replaced by the label's value in its format string.
const PLACEHOLDER: &str = "{}";

/// A single line of text drawn with the engine font.
///
/// The control is sized to the text. The text color is the control color,
/// white by default. The rendered image is cached and rebuilt only after the
/// control was marked dirty.
#[derive(Debug, Clone)]
pub struct Label {
    text: Property<String>,
    format: Option<String>,
    value: Option<String>,
    max_width: i32,
    shaded: bool,
    style: TextStyle,
    image: Option<Surface>,
    shade: Option<Surface>,
}

impl Label {
    /// A label showing `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Property::new("text", text.into(), INVALIDATE),
            format: None,
            value: None,
            max_width: 0,
            shaded: false,
            style: TextStyle::default(),
            image: None,
            shade: None,
        }
    }

    /// Cut the text with an ellipsis when it is wider than `max_width`.
    #[must_use]
    pub const fn with_max_width(mut self, max_width: i32) -> Self {
        self.max_width = max_width;
        self
    }

    /// Draw a dark copy of the text behind it.
    #[must_use]
    pub const fn shaded(mut self) -> Self {
        self.shaded = true;
        self
    }

    /// Magnify the text.
    #[must_use]
    pub fn with_scale(mut self, scale: i32) -> Self {
        self.style.scale = scale.max(1);
        self
    }

    /// Extra pixels between glyphs.
    #[must_use]
    pub const fn with_spacing(mut self, spacing: i32) -> Self {
        self.style.spacing = spacing;
        self
    }

    /// Show the value through `format`, where `{}` stands for the value.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// The text as displayed, before any ellipsis.
    pub fn text(&self) -> String {
        match (&self.format, &self.value) {
            (Some(format), Some(value)) => format.replacen(PLACEHOLDER, value, 1),
            _ => self.text.peek().clone(),
        }
    }

    /// Maximum width before the text is cut; zero is unlimited.
    pub const fn max_width(&self) -> i32 {
        self.max_width
    }

    /// Replace the plain text.
    pub fn set_text(&mut self, cx: &mut ControlCx<'_>, text: impl Into<String>) {
        self.text.set(cx, text.into());
        self.fit(cx);
    }

    /// Set the value shown through the format string.
    pub fn set_value(&mut self, cx: &mut ControlCx<'_>, value: impl Display) {
        self.value = Some(value.to_string());
        cx.mark_dirty();
        self.fit(cx);
    }

    /// Replace the format string.
    pub fn set_format(&mut self, cx: &mut ControlCx<'_>, format: impl Into<String>) {
        self.format = Some(format.into());
        cx.mark_dirty();
        self.fit(cx);
    }

    /// Change the maximum width.
    pub fn set_max_width(&mut self, cx: &mut ControlCx<'_>, max_width: i32) {
        self.max_width = max_width;
        cx.mark_dirty();
        self.fit(cx);
    }

    fn fit(&self, cx: &mut ControlCx<'_>) {
        let font = cx.ui.font();
        let full = self.text();
        let shown = text::ellipsize(font, &full, self.max_width, self.style);
        let size = (
            text::text_width(font, &shown, self.style),
            text::text_height(font, self.style),
        );
        cx.set_size(size.0, size.1);
    }

    fn rebuild(&mut self, cx: &DrawCx<'_>) {
        let full = self.text();
        let shown = text::ellipsize(cx.font, &full, self.max_width, self.style);
        let color = cx.state.color();
        self.image = Some(text::render(cx.font, &shown, color, self.style));
        self.shade = self
            .shaded
            .then(|| text::render(cx.font, &shown, color.darker(0.7), self.style));
    }
}

impl Widget for Label {
    fn mount(&mut self, cx: &mut ControlCx<'_>) {
        cx.ui.set_color(cx.id, Rgb::WHITE);
        cx.set_drop_shadow(false);
        self.fit(cx);
    }

    fn draw(&mut self, cx: &DrawCx<'_>, target: &mut Surface) {
        if cx.state.is_dirty() || self.image.is_none() {
            self.rebuild(cx);
        }
        let (x, y) = (cx.bounds.x, cx.bounds.y);
        if let Some(shade) = &self.shade {
            target.blit(shade, x + 1, y - 1, Blend::ColorKey(Rgb::BLACK));
        }
        if let Some(image) = &self.image {
            target.blit(image, x, y, Blend::ColorKey(Rgb::BLACK));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{LayoutKind, Ui};

    #[test]
    fn test_label_sized_to_text() {
        let mut ui = Ui::new(100, 100);
        let label = ui.spawn(Label::new("abc"));
        let rect = ui.bounds(label).unwrap();
        assert_eq!((rect.width, rect.height), (24, 8));
    }

    #[test]
    fn test_label_ellipsis_respects_max_width() {
        let mut ui = Ui::new(100, 100);
        let label = ui.spawn(Label::new("a long caption").with_max_width(40));
        assert!(ui.bounds(label).unwrap().width <= 40);
    }

    #[test]
    fn test_set_text_resizes_and_reflows() {
        let mut ui = Ui::new(100, 100);
        let column = ui.layout(LayoutKind::Vertical);
        let first = ui.spawn(Label::new("a"));
        let second = ui.spawn(Label::new("b"));
        ui.add(column, first).unwrap();
        ui.add(column, second).unwrap();

        ui.with_widget::<Label, _>(first, |label, cx| label.set_text(cx, "abcd"))
            .unwrap();

        assert_eq!(ui.bounds(first).unwrap().width, 32);
        assert_eq!(ui.bounds(column).unwrap().width, 32);
        assert!(ui.state(first).unwrap().is_dirty());
    }

    #[test]
    fn test_format_value() {
        let mut ui = Ui::new(100, 100);
        let label = ui.spawn(Label::new("").with_format("zoom {}x"));
        ui.with_widget::<Label, _>(label, |label, cx| label.set_value(cx, 4))
            .unwrap();
        assert_eq!(ui.widget::<Label>(label).unwrap().text(), "zoom 4x");
        assert_eq!(ui.bounds(label).unwrap().width, 7 * 8);
    }

    #[test]
    fn test_label_draws_text_color() {
        let mut ui = Ui::new(20, 20);
        let label = ui.spawn_at(0, 0, Label::new("a"));
        ui.register(label, None, None).unwrap();
        ui.set_color(label, Rgb::new(9, 200, 9));

        let mut target = Surface::new(20, 20);
        ui.draw(&mut target);
        // BlockFont fills each glyph cell but its last column and edge rows
        assert_eq!(target.get(2, 3), Some(Rgb::new(9, 200, 9)));
        assert_eq!(target.get(2, 0), Some(Rgb::BLACK));
    }
}
