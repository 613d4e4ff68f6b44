//! Single-line text entry.

use super::panel::{draw_panel, PanelStyle};
use super::text::{self, TextStyle};
use crate::config::{Property, INVALIDATE};
use crate::event::{Key, KeyCode, KeyModifiers};
use crate::geometry::Rect;
use crate::surface::{Blend, Rgb, Surface};
use crate::tree::{ControlCx, DrawCx, Widget};
use unicode_segmentation::UnicodeSegmentation;

const BORDER: i32 = 2;

/// Heartbeat ticks per cursor blink phase.
const BLINK_TICKS: u64 = 14;

/// What Shift turns a key into on a US layout.
const SHIFTED: &[(char, char)] = &[
    ('1', '!'),
    ('2', '@'),
    ('3', '#'),
    ('4', '$'),
    ('5', '%'),
    ('6', '^'),
    ('7', '&'),
    ('8', '*'),
    ('9', '('),
    ('0', ')'),
    ('-', '_'),
    ('[', '{'),
    (']', '}'),
    (',', '<'),
    ('.', '>'),
    ('/', '?'),
    ('`', '~'),
];

/// A sunken field the user types into once it is selected.
///
/// Backspace removes the last grapheme cluster. A blinking cursor follows
/// the text while the entry is selected.
#[derive(Debug, Clone)]
pub struct TextEntry {
    text: Property<String>,
    width: i32,
    rendered: Option<Surface>,
}

impl TextEntry {
    /// An empty entry `width` pixels wide.
    pub fn new(width: i32) -> Self {
        Self {
            text: Property::new("text", String::new(), INVALIDATE),
            width,
            rendered: None,
        }
    }

    /// Start with `text`.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text.init(text.into());
        self
    }

    /// Current contents.
    pub fn text(&self) -> &str {
        self.text.peek()
    }

    /// Replace the contents.
    pub fn set_text(&mut self, cx: &mut ControlCx<'_>, text: impl Into<String>) {
        self.text.set(cx, text.into());
    }
}

/// The character a key press types, if any.
fn typed(key: Key) -> Option<char> {
    let KeyCode::Char(c) = key.code else {
        return None;
    };
    if c.is_control() || key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }
    if !key.modifiers.contains(KeyModifiers::SHIFT) {
        return Some(c);
    }
    if let Some(&(_, shifted)) = SHIFTED.iter().find(|(plain, _)| *plain == c) {
        return Some(shifted);
    }
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => Some(u),
        _ => Some(c),
    }
}

impl Widget for TextEntry {
    fn size_hint(&self) -> (i32, i32) {
        (self.width, 8 + 2 * BORDER)
    }

    fn mount(&mut self, cx: &mut ControlCx<'_>) {
        let height = text::text_height(cx.ui.font(), TextStyle::default());
        cx.set_size(self.width, height + 2 * BORDER);
        cx.set_selectable(true);
        cx.set_drop_shadow(false);
    }

    fn key_pressed(&mut self, cx: &mut ControlCx<'_>, key: Key) {
        let mut next = self.text.peek().clone();
        if key.code == KeyCode::Backspace {
            let Some((offset, _)) = next.grapheme_indices(true).next_back() else {
                return;
            };
            next.truncate(offset);
        } else if let Some(c) = typed(key) {
            next.push(c);
        } else {
            return;
        }
        self.text.set(cx, next);
    }

    fn selection_changed(&mut self, cx: &mut ControlCx<'_>, _selected: bool) {
        cx.mark_dirty();
    }

    fn draw(&mut self, cx: &DrawCx<'_>, target: &mut Surface) {
        let b = cx.bounds;
        let style = TextStyle::default();
        if cx.state.is_dirty() || self.rendered.is_none() {
            let shown = text::ellipsize(cx.font, self.text.peek(), b.width - 2 * BORDER, style);
            self.rendered = Some(text::render(cx.font, &shown, Rgb::WHITE, style));
        }

        draw_panel(target, b, cx.state.color(), PanelStyle::SUNKEN | PanelStyle::DARK);
        let mut text_right = b.x + BORDER;
        if let Some(image) = self.rendered.as_ref().filter(|_| !self.text.peek().is_empty()) {
            target.blit(image, b.x + BORDER, b.y + BORDER, Blend::ColorKey(Rgb::BLACK));
            text_right += image.width();
        }

        if cx.state.is_selected() && (cx.anim / BLINK_TICKS) % 2 == 1 {
            let x = (text_right + 1).min(b.right() - BORDER);
            let cursor = Rect::new(x, b.y + BORDER, 2, text::text_height(cx.font, style));
            target.fill_rect(cursor, cx.state.color());
        }
    }
}
