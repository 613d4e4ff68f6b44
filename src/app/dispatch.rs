//! Input dispatch: hit-testing, drag tracking, double-click detection and
//! selection handoff.
//!
//! The dispatcher holds the input state that lives across frames. It never
//! holds a borrow into the tree; every control is addressed by handle and
//! re-resolved before each call, so callbacks may destroy controls (their
//! own included) in the middle of a dispatch.

use crate::event::{InputEvent, Key, KeyCode, Motion, MouseButton, MouseEvent};
use crate::tree::{Click, ControlState, DragMode, DragMotion, NodeId, Ui};
use std::time::Duration;

/// A control being dragged: which control, with which button, by which
/// affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragEntry {
    /// Dragged control.
    pub id: NodeId,
    /// Button that started the drag.
    pub button: MouseButton,
    /// Affordance reported by the control's drag test.
    pub mode: DragMode,
}

#[derive(Debug, Clone, Copy)]
struct LastClick {
    at: Duration,
    button: MouseButton,
    x: i32,
    y: i32,
}

/// Routes input events to controls.
#[derive(Debug)]
pub struct Dispatcher {
    double_click_delay: Duration,
    last_click: Option<LastClick>,
    clicked: Option<NodeId>,
    pushed: Option<NodeId>,
    dragged: Vec<DragEntry>,
    idle_ticks: u64,
}

impl Dispatcher {
    /// Create a dispatcher with the given double-click window.
    pub const fn new(double_click_delay: Duration) -> Self {
        Self {
            double_click_delay,
            last_click: None,
            clicked: None,
            pushed: None,
            dragged: Vec::new(),
            idle_ticks: 0,
        }
    }

    /// Control under the most recent mouse-down, until the matching mouse-up.
    pub const fn clicked(&self) -> Option<NodeId> {
        self.clicked
    }

    /// Button-like control currently held down.
    pub const fn pushed(&self) -> Option<NodeId> {
        self.pushed
    }

    /// Active drags.
    pub fn dragged(&self) -> &[DragEntry] {
        &self.dragged
    }

    /// Dispatch passes since the last keyboard or pointer event.
    pub const fn idle_ticks(&self) -> u64 {
        self.idle_ticks
    }

    /// Count one dispatch pass towards [`idle_ticks`](Self::idle_ticks).
    pub fn end_pass(&mut self) {
        self.idle_ticks = self.idle_ticks.saturating_add(1);
    }

    /// Route one event. `now` is the time since the application started.
    ///
    /// Returns the synthetic [`InputEvent::DoubleClick`] when a mouse-down
    /// qualifies as one. It is produced after the mouse-down has been routed,
    /// so observers such as [`App::on_event`](crate::App::on_event) see the
    /// mouse-down first and the double-click right after it.
    pub fn handle(&mut self, ui: &mut Ui, event: &InputEvent, now: Duration) -> Option<InputEvent> {
        if event.is_unsettling() {
            self.idle_ticks = 0;
        }
        tracing::trace!(?event, "dispatch");
        match *event {
            InputEvent::MouseDown(down) => return self.mouse_down(ui, down, now),
            InputEvent::MouseUp(up) => self.mouse_up(ui, up),
            InputEvent::MouseMove(motion) => self.mouse_move(ui, motion),
            InputEvent::Key(key) => Self::key_down(ui, key),
            InputEvent::Resize { width, height } => ui.set_canvas_size(width, height),
            InputEvent::Quit | InputEvent::Timer(_) | InputEvent::DoubleClick(_) => {}
        }
        None
    }

    fn is_double_click(&self, down: MouseEvent, now: Duration) -> bool {
        self.last_click.is_some_and(|last| {
            now.saturating_sub(last.at) < self.double_click_delay
                && last.button == down.button
                && (last.x, last.y) == (down.x, down.y)
        })
    }

    fn mouse_down(&mut self, ui: &mut Ui, down: MouseEvent, now: Duration) -> Option<InputEvent> {
        let is_double = self.is_double_click(down, now);
        self.last_click = Some(LastClick {
            at: now,
            button: down.button,
            x: down.x,
            y: down.y,
        });

        let mut selected = ui.selection();
        if !ui.gui_hidden() {
            let targets: Vec<NodeId> = ui.controls(ui.root()).collect();
            for id in targets {
                // Earlier callbacks may have hidden or destroyed this control.
                if !ui.state(id).is_some_and(ControlState::is_visible) {
                    continue;
                }
                if let Some(mode) = ui.drag_test(id, down.x, down.y) {
                    self.dragged.push(DragEntry {
                        id,
                        button: down.button,
                        mode,
                    });
                }
                if !ui.click_test(id, down.x, down.y) {
                    continue;
                }

                let accepted = if ui.is_button(id) {
                    if self.pushed.is_none() {
                        self.pushed = Some(id);
                        ui.set_pushed(id, true);
                    }
                    true
                } else {
                    let click = Click {
                        x: down.x,
                        y: down.y,
                        button: down.button,
                    };
                    let mut accepted = true;
                    if is_double {
                        accepted &= ui.fire_click(id, click, true);
                    }
                    accepted &= ui.fire_click(id, click, false);
                    accepted
                };
                if !ui.contains(id) {
                    continue;
                }
                self.clicked = Some(id);
                let selectable = ui.state(id).is_some_and(ControlState::is_selectable);
                selected = (accepted && selectable).then_some(id);
            }
        }
        ui.select(selected);

        if is_double {
            tracing::trace!(x = down.x, y = down.y, "double-click");
        }
        is_double.then_some(InputEvent::DoubleClick(down))
    }

    fn mouse_up(&mut self, ui: &mut Ui, up: MouseEvent) {
        if let Some(id) = self.pushed.take() {
            ui.set_pushed(id, false);
            let click = Click {
                x: up.x,
                y: up.y,
                button: up.button,
            };
            ui.fire_click(id, click, false);
        }
        self.dragged.clear();
        self.clicked = None;
    }

    fn mouse_move(&mut self, ui: &mut Ui, motion: Motion) {
        let entries = self.dragged.clone();
        for entry in entries {
            if !ui.contains(entry.id) {
                continue;
            }
            let drag = DragMotion {
                x: motion.x,
                y: motion.y,
                rel_x: motion.rel_x,
                rel_y: motion.rel_y,
                button: entry.button,
            };
            ui.fire_drag_move(entry.id, entry.mode, drag);
        }
        self.dragged.retain(|entry| ui.contains(entry.id));
    }

    fn key_down(ui: &mut Ui, key: Key) {
        if key.code == KeyCode::Esc {
            ui.select(None);
            return;
        }
        if let Some(id) = ui.selection() {
            ui.fire_key(id, key);
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(Duration::from_millis(250))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::KeyModifiers;
    use crate::geometry::Rect;
    use crate::surface::Surface;
    use crate::tree::{ControlCx, DrawCx, Widget};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        tag: &'static str,
        rect: Rect,
        button: bool,
        log: Log,
    }

    impl Widget for Recorder {
        fn size_hint(&self) -> (i32, i32) {
            (self.rect.width, self.rect.height)
        }

        fn is_button(&self) -> bool {
            self.button
        }

        fn clicked(&mut self, _cx: &mut ControlCx<'_>, click: Click) -> bool {
            self.log.borrow_mut().push(format!("{}:click@{},{}", self.tag, click.x, click.y));
            true
        }

        fn double_clicked(&mut self, _cx: &mut ControlCx<'_>, _click: Click) -> bool {
            self.log.borrow_mut().push(format!("{}:double", self.tag));
            true
        }

        fn drag_move(&mut self, _cx: &mut ControlCx<'_>, _mode: DragMode, motion: DragMotion) {
            self.log.borrow_mut().push(format!("{}:drag{},{}", self.tag, motion.rel_x, motion.rel_y));
        }

        fn key_pressed(&mut self, _cx: &mut ControlCx<'_>, key: Key) {
            self.log.borrow_mut().push(format!("{}:key{:?}", self.tag, key.code));
        }

        fn set_pushed(&mut self, _cx: &mut ControlCx<'_>, pushed: bool) {
            self.log.borrow_mut().push(format!("{}:pushed={pushed}", self.tag));
        }

        fn selection_changed(&mut self, _cx: &mut ControlCx<'_>, selected: bool) {
            self.log.borrow_mut().push(format!("{}:selected={selected}", self.tag));
        }

        fn draw(&mut self, _cx: &DrawCx<'_>, _target: &mut Surface) {}
    }

    struct Fixture {
        ui: Ui,
        dispatcher: Dispatcher,
        log: Log,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                ui: Ui::default(),
                dispatcher: Dispatcher::default(),
                log: Rc::default(),
            }
        }

        fn recorder(&mut self, tag: &'static str, rect: Rect, selectable: bool) -> NodeId {
            let recorder = Recorder {
                tag,
                rect,
                button: false,
                log: Rc::clone(&self.log),
            };
            let id = self.ui.spawn_at(rect.x, rect.y, recorder);
            self.ui.set_selectable(id, selectable);
            self.ui.register(id, Some(tag), None).unwrap();
            id
        }

        fn button(&mut self, tag: &'static str, rect: Rect) -> NodeId {
            let recorder = Recorder {
                tag,
                rect,
                button: true,
                log: Rc::clone(&self.log),
            };
            let id = self.ui.spawn_at(rect.x, rect.y, recorder);
            self.ui.register(id, Some(tag), None).unwrap();
            id
        }

        fn send(&mut self, event: InputEvent, ms: u64) -> Option<InputEvent> {
            self.dispatcher.handle(&mut self.ui, &event, Duration::from_millis(ms))
        }

        fn down(&mut self, x: i32, y: i32, ms: u64) -> Option<InputEvent> {
            self.send(InputEvent::MouseDown(MouseEvent::new(x, y, MouseButton::Left)), ms)
        }

        fn up(&mut self, x: i32, y: i32) {
            self.send(InputEvent::MouseUp(MouseEvent::new(x, y, MouseButton::Left)), 0);
        }

        fn moved(&mut self, x: i32, y: i32, rel_x: i32, rel_y: i32) {
            self.send(InputEvent::MouseMove(Motion::new(x, y, rel_x, rel_y)), 0);
        }

        fn take_log(&self) -> Vec<String> {
            std::mem::take(&mut *self.log.borrow_mut())
        }
    }

    #[test]
    fn test_exclusive_selection() {
        let mut fx = Fixture::new();
        let a = fx.recorder("a", Rect::new(0, 0, 10, 10), true);
        let b = fx.recorder("b", Rect::new(20, 0, 10, 10), true);
        let c = fx.recorder("c", Rect::new(40, 0, 10, 10), false);

        fx.down(5, 5, 0);
        fx.up(5, 5);
        assert_eq!(fx.ui.selection(), Some(a));
        fx.take_log();

        fx.down(25, 5, 1000);
        fx.up(25, 5);
        assert_eq!(fx.ui.selection(), Some(b));
        assert!(!fx.ui.state(a).unwrap().is_selected());
        let log = fx.take_log();
        let off = log.iter().position(|l| l == "a:selected=false").unwrap();
        let on = log.iter().position(|l| l == "b:selected=true").unwrap();
        assert!(off < on);

        // a miss keeps the selection
        fx.down(100, 100, 2000);
        assert_eq!(fx.ui.selection(), Some(b));

        // a non-selectable hit clears it
        fx.down(45, 5, 3000);
        assert_eq!(fx.ui.selection(), None);
        assert_eq!(fx.dispatcher.clicked(), Some(c));
        let selected = [a, b, c].iter().filter(|&&id| fx.ui.state(id).unwrap().is_selected()).count();
        assert_eq!(selected, 0);
    }

    #[test]
    fn test_click_veto_prevents_selection() {
        let mut fx = Fixture::new();
        let a = fx.recorder("a", Rect::new(0, 0, 10, 10), true);
        fx.ui.on_click(a, |_, _, _| false).unwrap();

        fx.down(1, 1, 0);
        assert_eq!(fx.ui.selection(), None);
    }

    #[test]
    fn test_drag_lifecycle() {
        let mut fx = Fixture::new();
        let a = fx.recorder("a", Rect::new(0, 0, 10, 10), false);
        let b = fx.recorder("b", Rect::new(5, 5, 10, 10), false);

        fx.down(7, 7, 0);
        let dragged: Vec<NodeId> = fx.dispatcher.dragged().iter().map(|e| e.id).collect();
        assert_eq!(dragged, vec![a, b]);
        assert!(fx.dispatcher.dragged().iter().all(|e| e.mode == DragMode::BODY));
        fx.take_log();

        fx.moved(8, 8, 1, 1);
        fx.moved(10, 9, 2, 1);
        assert_eq!(fx.take_log(), ["a:drag1,1", "b:drag1,1", "a:drag2,1", "b:drag2,1"]);

        fx.up(10, 9);
        assert!(fx.dispatcher.dragged().is_empty());
        assert_eq!(fx.dispatcher.clicked(), None);
        fx.moved(11, 9, 1, 0);
        assert!(fx.take_log().is_empty());
    }

    #[test]
    fn test_double_click_window() {
        let mut fx = Fixture::new();
        fx.recorder("a", Rect::new(0, 0, 10, 10), false);

        assert_eq!(fx.down(3, 3, 1000), None);
        fx.take_log();
        let double = fx.down(3, 3, 1240);
        assert_eq!(double, Some(InputEvent::DoubleClick(MouseEvent::new(3, 3, MouseButton::Left))));
        let log = fx.take_log();
        assert_eq!(log, ["a:double", "a:click@3,3"]);

        assert_eq!(fx.down(3, 3, 5000), None);
        assert_eq!(fx.down(3, 3, 5260), None);
    }

    #[test]
    fn test_double_click_needs_same_position_and_button() {
        let mut fx = Fixture::new();
        fx.recorder("a", Rect::new(0, 0, 10, 10), false);

        fx.down(3, 3, 0);
        assert_eq!(fx.down(4, 3, 100), None);
        assert_eq!(fx.down(3, 3, 150), None);

        let right = InputEvent::MouseDown(MouseEvent::new(3, 3, MouseButton::Right));
        assert_eq!(fx.send(right, 200), None);
    }

    #[test]
    fn test_first_click_is_never_double() {
        let mut fx = Fixture::new();
        fx.recorder("a", Rect::new(0, 0, 10, 10), false);
        assert_eq!(fx.down(0, 0, 0), None);
    }

    #[test]
    fn test_button_push_and_release() {
        let mut fx = Fixture::new();
        let first = fx.button("ok", Rect::new(0, 0, 10, 10));
        fx.button("under", Rect::new(0, 0, 10, 10));

        fx.down(2, 2, 0);
        assert_eq!(fx.dispatcher.pushed(), Some(first));
        assert_eq!(fx.take_log(), ["ok:pushed=true"]);

        // released elsewhere: still clicked, at the release position
        fx.up(50, 60);
        assert_eq!(fx.dispatcher.pushed(), None);
        assert_eq!(fx.take_log(), ["ok:pushed=false", "ok:click@50,60"]);
    }

    #[test]
    fn test_keys_go_to_selection_and_escape_deselects() {
        let mut fx = Fixture::new();
        fx.recorder("a", Rect::new(0, 0, 10, 10), true);
        fx.recorder("b", Rect::new(20, 0, 10, 10), false);

        let key = |code| InputEvent::Key(Key::with_modifiers(code, KeyModifiers::empty()));
        fx.send(key(KeyCode::Char('x')), 0);
        assert!(fx.take_log().is_empty());

        fx.down(1, 1, 0);
        fx.take_log();
        fx.send(key(KeyCode::Char('x')), 0);
        assert_eq!(fx.take_log(), ["a:keyChar('x')"]);

        fx.send(key(KeyCode::Esc), 0);
        assert_eq!(fx.ui.selection(), None);
        assert_eq!(fx.take_log(), ["a:selected=false"]);
        fx.send(key(KeyCode::Char('y')), 0);
        assert!(fx.take_log().is_empty());
    }

    #[test]
    fn test_drag_callback_may_destroy_control() {
        let mut fx = Fixture::new();
        let a = fx.recorder("a", Rect::new(0, 0, 10, 10), false);
        let b = fx.recorder("b", Rect::new(0, 0, 10, 10), false);
        fx.ui
            .on_drag_move(a, |ui, id, _, _| {
                ui.destroy(id).unwrap();
            })
            .unwrap();

        fx.down(1, 1, 0);
        fx.take_log();
        fx.moved(2, 2, 1, 1);
        fx.moved(3, 3, 1, 1);
        assert_eq!(fx.take_log(), ["a:drag1,1", "b:drag1,1", "b:drag1,1"]);
        assert_eq!(fx.dispatcher.dragged().len(), 1);
        assert_eq!(fx.dispatcher.dragged()[0].id, b);
    }

    #[test]
    fn test_click_callback_may_destroy_later_controls() {
        let mut fx = Fixture::new();
        let a = fx.recorder("a", Rect::new(0, 0, 10, 10), true);
        let b = fx.recorder("b", Rect::new(0, 0, 10, 10), true);
        fx.ui
            .on_click(a, move |ui, _, _| {
                ui.destroy(b).unwrap();
                true
            })
            .unwrap();

        fx.down(1, 1, 0);
        assert_eq!(fx.ui.selection(), Some(a));
        assert!(!fx.ui.contains(b));
    }

    #[test]
    fn test_hidden_gui_is_not_hit_tested() {
        let mut fx = Fixture::new();
        fx.recorder("a", Rect::new(0, 0, 10, 10), true);
        fx.ui.set_gui_hidden(true);

        fx.down(1, 1, 0);
        assert!(fx.dispatcher.dragged().is_empty());
        assert_eq!(fx.ui.selection(), None);
    }

    #[test]
    fn test_invisible_controls_are_skipped() {
        let mut fx = Fixture::new();
        let a = fx.recorder("a", Rect::new(0, 0, 10, 10), true);
        fx.ui.set_visible(a, false);

        fx.down(1, 1, 0);
        assert_eq!(fx.dispatcher.clicked(), None);
    }

    #[test]
    fn test_idle_ticks() {
        let mut fx = Fixture::new();
        fx.dispatcher.end_pass();
        fx.dispatcher.end_pass();
        assert_eq!(fx.dispatcher.idle_ticks(), 2);

        fx.send(InputEvent::Timer(crate::event::TimerId::default()), 0);
        assert_eq!(fx.dispatcher.idle_ticks(), 2);
        fx.moved(1, 1, 1, 1);
        assert_eq!(fx.dispatcher.idle_ticks(), 0);
    }

    #[test]
    fn test_resize_updates_canvas() {
        let mut fx = Fixture::new();
        fx.send(
            InputEvent::Resize {
                width: 320,
                height: 200,
            },
            0,
        );
        assert_eq!(fx.ui.canvas_size(), (320, 200));
    }
}
