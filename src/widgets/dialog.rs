//! Modal-looking yes/no question box.

use super::button::Button;
use super::label::Label;
use super::panel::{draw_panel, PanelStyle, LIGHT_TINT, SHADE_TINT};
use super::text::{self, TextStyle};
use crate::error::Result;
use crate::event::MouseButton;
use crate::geometry::Rect;
use crate::surface::{Rgb, Surface};
use crate::tree::{Alignment, ControlCx, DrawCx, GridPos, LayoutKind, NodeId, Ui, Widget};

const TITLE_TOP: i32 = 5;
const MEMO_LEFT: i32 = 50;
const MEMO_TOP: i32 = 35;
const BUTTONS_LEFT: i32 = 45;
const BUTTONS_FROM_BOTTOM: i32 = 30;
const BUTTON_HEIGHT: i32 = 25;
const BUTTON_GAP: i32 = 45;

type ResultFn = dyn FnMut(&mut Ui, Answer);

/// The button a [`YesNoDialog`] was closed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    /// The first button.
    Yes,
    /// The second button.
    No,
    /// The optional third button.
    Maybe,
}

/// A titled box asking a question, answered with one of two or three
/// buttons.
///
/// The dialog starts hidden. [`YesNoDialog::show`] makes it visible; a left
/// click on one of its buttons hides it again and passes the [`Answer`] to
/// the callback given to [`YesNoDialog::on_result`]. The message is wrapped
/// into lines of labels, one blank line after every paragraph.
pub struct YesNoDialog {
    title: String,
    message: String,
    size: (i32, i32),
    maybe: bool,
    text_color: Rgb,
    answer: Option<Answer>,
    title_label: Option<NodeId>,
    memo: Option<NodeId>,
    buttons: Vec<(Answer, NodeId)>,
    on_result: Option<Box<ResultFn>>,
}

impl YesNoDialog {
    /// A 400 x 150 dialog.
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            size: (400, 150),
            maybe: false,
            text_color: Rgb::new(15, 22, 33).brighter(0.7),
            answer: None,
            title_label: None,
            memo: None,
            buttons: Vec::new(),
            on_result: None,
        }
    }

    /// Change the size. Only effective before the dialog is spawned.
    #[must_use]
    pub const fn with_size(mut self, width: i32, height: i32) -> Self {
        self.size = (width, height);
        self
    }

    /// Add a third button answering [`Answer::Maybe`].
    #[must_use]
    pub const fn with_maybe(mut self) -> Self {
        self.maybe = true;
        self
    }

    /// Call `f` with the answer when a button closes the dialog.
    #[must_use]
    pub fn on_result(mut self, f: impl FnMut(&mut Ui, Answer) + 'static) -> Self {
        self.on_result = Some(Box::new(f));
        self
    }

    /// The answer the dialog was last closed with.
    pub const fn answer(&self) -> Option<Answer> {
        self.answer
    }

    /// The button producing `answer`.
    pub fn button(&self, answer: Answer) -> Option<NodeId> {
        self.buttons.iter().find(|(a, _)| *a == answer).map(|&(_, id)| id)
    }

    /// The title label.
    pub const fn title_label(&self) -> Option<NodeId> {
        self.title_label
    }

    /// The vertical layout holding the wrapped message lines.
    pub const fn memo(&self) -> Option<NodeId> {
        self.memo
    }

    /// Make the dialog visible and forget the previous answer.
    pub fn show(&mut self, cx: &mut ControlCx<'_>) {
        self.answer = None;
        cx.ui.set_visible(cx.id, true);
        cx.mark_dirty();
    }

    /// Close the dialog with `answer`, as a click on its button does.
    pub fn close(&mut self, cx: &mut ControlCx<'_>, answer: Answer) {
        self.answer = Some(answer);
        cx.ui.set_visible(cx.id, false);
        tracing::debug!(id = ?cx.id, ?answer, "dialog closed");
        if let Some(mut f) = self.on_result.take() {
            f(cx.ui, answer);
            self.on_result = Some(f);
        }
    }

    fn build(&mut self, cx: &mut ControlCx<'_>) -> Result<()> {
        let b = cx.bounds();
        let dialog = cx.id;
        let contents = cx.ui.layout(LayoutKind::Free);
        cx.ui.set_pos(contents, b.x, b.y);

        let title = cx.ui.spawn(Label::new(self.title.as_str()).shaded().with_max_width(b.width - 10));
        let title_width = cx.ui.bounds(title).map_or(0, |r| r.width);
        cx.ui.set_pos(title, b.x + (b.width - title_width) / 2, b.y + TITLE_TOP);
        cx.ui.add(contents, title)?;

        let memo = cx.ui.layout_with_spacing(LayoutKind::Vertical, 0);
        cx.ui.set_pos(memo, b.x + MEMO_LEFT, b.y + MEMO_TOP);
        for line in wrap(cx.ui, &self.message, b.width - MEMO_LEFT * 3) {
            let label = cx.ui.spawn(Label::new(line));
            cx.ui.set_color(label, self.text_color);
            cx.ui.add(memo, label)?;
        }
        cx.ui.add(contents, memo)?;

        let row = cx.ui.layout_with_spacing(
            LayoutKind::Grid {
                cols: 5,
                rows: 1,
                alignment: Alignment::Left,
            },
            0,
        );
        cx.ui.set_pos(row, b.x + BUTTONS_LEFT, b.bottom() - BUTTONS_FROM_BOTTOM);
        let mut choices = vec![(Answer::Yes, "Yes", 60), (Answer::No, "No", 80)];
        if self.maybe {
            choices.push((Answer::Maybe, "Maybe", 80));
        }
        for (i, (answer, caption, width)) in choices.into_iter().enumerate() {
            if i > 0 {
                let gap = cx.ui.spacer(BUTTON_GAP);
                cx.ui.add_to_grid(row, gap, GridPos::new(2 * i - 1, 0))?;
            }
            let button = cx.ui.spawn(Button::new(caption, width, BUTTON_HEIGHT));
            cx.ui.on_click(button, move |ui, _, click| {
                if click.button == MouseButton::Left {
                    ui.with_widget::<Self, _>(dialog, |d, cx| d.close(cx, answer));
                }
                true
            })?;
            cx.ui.add_to_grid(row, button, GridPos::new(2 * i, 0))?;
            self.buttons.push((answer, button));
        }
        cx.ui.add(contents, row)?;

        cx.attach_children(contents)?;
        self.title_label = Some(title);
        self.memo = Some(memo);
        Ok(())
    }
}

/// Break `message` into lines no wider than `max_width`, with an empty line
/// closing every paragraph. A single word wider than the limit gets a line
/// of its own.
fn wrap(ui: &Ui, message: &str, max_width: i32) -> Vec<String> {
    let font = ui.font();
    let style = TextStyle::default();
    let mut lines = Vec::new();
    for paragraph in message.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{line} {word}")
            };
            if !line.is_empty() && text::text_width(font, &candidate, style) > max_width {
                lines.push(std::mem::replace(&mut line, word.to_string()));
            } else {
                line = candidate;
            }
        }
        if !line.is_empty() {
            lines.push(line);
        }
        lines.push(String::new());
    }
    lines
}

impl Widget for YesNoDialog {
    fn size_hint(&self) -> (i32, i32) {
        self.size
    }

    fn mount(&mut self, cx: &mut ControlCx<'_>) {
        cx.ui.set_visible(cx.id, false);
        if let Err(e) = self.build(cx) {
            tracing::warn!(id = ?cx.id, "can't build dialog: {e}");
        }
    }

    fn draw(&mut self, cx: &DrawCx<'_>, target: &mut Surface) {
        let b = cx.bounds;
        let color = cx.state.color();
        draw_panel(target, b, color, PanelStyle::empty());

        let title_height = self.title_label.and_then(|id| cx.ui.bounds(id)).map_or(8, |r| r.height);
        target.draw_bevel(
            Rect::new(b.x + 1, b.y + 1, b.width - 2, title_height + 8),
            color.darker(SHADE_TINT),
            color.brighter(LIGHT_TINT),
            false,
        );
        target.fill_rect(
            Rect::new(b.x + 5, b.y + 3, b.width - 10, title_height + 5),
            color.darker(0.4),
        );
    }
}

impl std::fmt::Debug for YesNoDialog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YesNoDialog")
            .field("title", &self.title)
            .field("size", &self.size)
            .field("answer", &self.answer)
            .field("buttons", &self.buttons)
            .finish_non_exhaustive()
    }
}
