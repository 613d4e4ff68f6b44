//! Push button.

use super::text::{self, TextStyle};
use crate::config::{Property, INVALIDATE};
use crate::geometry::Rect;
use crate::surface::{Blend, Rgb, Surface};
use crate::tree::{ControlCx, DrawCx, Widget};

/// Added over the face of a highlighted button.
const HIGHLIGHT: Rgb = Rgb::new(25, 23, 19);

/// A beveled push button with a text caption and an optional image.
///
/// The button is pushed while the mouse is held down on it and is clicked
/// when released. Register the click with
/// [`Ui::on_click`](crate::tree::Ui::on_click). While pushed, the bevel is
/// inverted and the caption moves down one pixel.
#[derive(Debug, Clone)]
pub struct Button {
    caption: Property<String>,
    size: (i32, i32),
    font_color: Rgb,
    icon: Option<Surface>,
    pushed: bool,
    highlighted: bool,
    rendered: Option<Surface>,
}

impl Button {
    /// A `width` x `height` button reading `caption`.
    pub fn new(caption: impl Into<String>, width: i32, height: i32) -> Self {
        Self {
            caption: Property::new("caption", caption.into(), INVALIDATE),
            size: (width, height),
            font_color: Rgb::WHITE,
            icon: None,
            pushed: false,
            highlighted: false,
            rendered: None,
        }
    }

    /// Draw `icon` centered on the face.
    #[must_use]
    pub fn with_icon(mut self, icon: Surface) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Caption color.
    #[must_use]
    pub const fn with_font_color(mut self, color: Rgb) -> Self {
        self.font_color = color;
        self
    }

    /// The caption.
    pub fn caption(&self) -> &str {
        self.caption.peek()
    }

    /// Replace the caption.
    pub fn set_caption(&mut self, cx: &mut ControlCx<'_>, caption: impl Into<String>) {
        self.caption.set(cx, caption.into());
    }

    /// Whether the button is held down.
    pub const fn is_pushed(&self) -> bool {
        self.pushed
    }

    /// Whether the button is highlighted.
    pub const fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    /// Brighten the face, for toggle buttons that are on.
    pub fn set_highlighted(&mut self, cx: &mut ControlCx<'_>, highlighted: bool) {
        self.highlighted = highlighted;
        cx.mark_dirty();
    }
}

impl Widget for Button {
    fn size_hint(&self) -> (i32, i32) {
        self.size
    }

    fn mount(&mut self, cx: &mut ControlCx<'_>) {
        cx.set_drop_shadow(false);
    }

    fn is_button(&self) -> bool {
        true
    }

    fn set_pushed(&mut self, cx: &mut ControlCx<'_>, pushed: bool) {
        self.pushed = pushed;
        cx.mark_dirty();
    }

    fn draw(&mut self, cx: &DrawCx<'_>, target: &mut Surface) {
        let bounds = cx.bounds;
        if cx.state.is_dirty() || self.rendered.is_none() {
            let style = TextStyle::default();
            let shown = text::ellipsize(cx.font, self.caption.peek(), bounds.width - 4, style);
            self.rendered = Some(text::render(cx.font, &shown, self.font_color, style));
        }

        target.fill_rect(bounds, cx.state.color().darker(0.1));
        target.draw_bevel(bounds, Rgb::FOREGROUND_DARK, Rgb::FOREGROUND_LIGHT, !self.pushed);

        if let Some(icon) = &self.icon {
            let (x, y) = centered(bounds, (icon.width(), icon.height()), self.pushed);
            target.blit(icon, x, y, Blend::ColorKey(Rgb::BLACK));
        }
        if let Some(caption) = self.rendered.as_ref().filter(|_| !self.caption.peek().is_empty()) {
            let (x, y) = centered(bounds, (caption.width(), caption.height()), self.pushed);
            target.blit(caption, x, y, Blend::ColorKey(Rgb::BLACK));
        }
        if self.highlighted {
            let glow = Surface::filled(bounds.width, bounds.height, HIGHLIGHT);
            target.blit(&glow, bounds.x, bounds.y, Blend::Add);
        }
    }
}

/// Top-left of a `size` item centered on the face, one pixel lower while
/// pushed.
const fn centered(bounds: Rect, size: (i32, i32), pushed: bool) -> (i32, i32) {
    let dy = if pushed { 1 } else { 0 };
    (
        bounds.x + (bounds.width - size.0) / 2,
        bounds.y + (bounds.height - size.1) / 2 + dy,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Dispatcher;
    use crate::event::{InputEvent, MouseButton, MouseEvent};
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    fn down(x: i32, y: i32) -> InputEvent {
        InputEvent::MouseDown(MouseEvent::new(x, y, MouseButton::Left))
    }

    fn up(x: i32, y: i32) -> InputEvent {
        InputEvent::MouseUp(MouseEvent::new(x, y, MouseButton::Left))
    }

    #[test]
    fn test_button_clicks_on_release() {
        let mut ui = crate::tree::Ui::new(100, 100);
        let button = ui.spawn_at(10, 10, Button::new("ok", 30, 12));
        ui.register(button, Some("ok"), None).unwrap();
        let clicks = Rc::new(Cell::new(0));
        let seen = Rc::clone(&clicks);
        ui.on_click(button, move |_, _, _| {
            seen.set(seen.get() + 1);
            true
        })
        .unwrap();

        let mut dispatcher = Dispatcher::default();
        dispatcher.handle(&mut ui, &down(15, 15), Duration::ZERO);
        assert!(ui.widget::<Button>(button).unwrap().is_pushed());
        assert_eq!(clicks.get(), 0);

        dispatcher.handle(&mut ui, &up(15, 15), Duration::from_millis(50));
        assert!(!ui.widget::<Button>(button).unwrap().is_pushed());
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn test_caption_moves_when_pushed() {
        let bounds = Rect::new(0, 0, 30, 12);
        let (x, y) = centered(bounds, (16, 8), false);
        assert_eq!((x, y), (7, 2));
        assert_eq!(centered(bounds, (16, 8), true), (7, 3));
    }

    #[test]
    fn test_pushed_button_draws_sunken() {
        let mut ui = crate::tree::Ui::new(40, 40);
        let button = ui.spawn_at(0, 0, Button::new("", 10, 10));
        ui.register(button, None, None).unwrap();

        let mut raised = Surface::new(40, 40);
        ui.draw(&mut raised);
        ui.set_pushed(button, true);
        let mut sunken = Surface::new(40, 40);
        ui.draw(&mut sunken);

        assert_eq!(raised.get(0, 5), Some(Rgb::FOREGROUND_LIGHT));
        assert_eq!(sunken.get(0, 5), Some(Rgb::FOREGROUND_DARK));
    }

    #[test]
    fn test_highlight_adds_glow() {
        let mut ui = crate::tree::Ui::new(40, 40);
        let button = ui.spawn_at(0, 0, Button::new("", 10, 10));
        ui.register(button, None, None).unwrap();
        ui.with_widget::<Button, _>(button, |b, cx| b.set_highlighted(cx, true))
            .unwrap();

        let mut target = Surface::new(40, 40);
        ui.draw(&mut target);
        let face = Rgb::FOREGROUND.darker(0.1).saturating_add(HIGHLIGHT);
        assert_eq!(target.get(5, 5), Some(face));
    }
}
