//! Layout and dispatch benchmark: re-flow, hit-testing and drawing.
//!
//! Target: < 100µs to re-flow a 500-item stack after one resize

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;
use trellis::event::{MouseEvent, Motion};
use trellis::tree::{Alignment, GridPos};
use trellis::widgets::ColorCell;
use trellis::{Dispatcher, InputEvent, LayoutKind, MouseButton, NodeId, Rgb, Surface, Ui};

/// A vertical stack of `count` swatches registered under the root.
fn create_stack(count: usize) -> (Ui, Vec<NodeId>) {
    let mut ui = Ui::new(640, 480);
    let stack = ui.layout(LayoutKind::Vertical);
    ui.register(stack, None, None).unwrap();
    let items = (0..count)
        .map(|i| {
            let shade = (i % 200) as u8;
            let id = ui.spawn(ColorCell::new(16, 8, Rgb::new(shade, shade, 120)));
            ui.register(id, None, Some(stack)).unwrap();
            id
        })
        .collect();
    (ui, items)
}

fn reflow_after_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("reflow_by_count");

    for count in [10, 100, 500] {
        let (mut ui, items) = create_stack(count);
        let first = items[0];
        let mut tall = false;

        group.bench_with_input(BenchmarkId::new("vertical", count), &count, |b, _| {
            b.iter(|| {
                tall = !tall;
                ui.set_size(black_box(first), 16, if tall { 12 } else { 8 });
            })
        });
    }

    group.finish();
}

fn reflow_grid(c: &mut Criterion) {
    let mut ui = Ui::new(640, 480);
    let grid = ui.layout(LayoutKind::Grid {
        cols: 16,
        rows: 16,
        alignment: Alignment::Center,
    });
    ui.register(grid, None, None).unwrap();
    let mut first = None;
    for row in 0..16 {
        for col in 0..16 {
            let id = ui.spawn(ColorCell::new(8, 8, Rgb::WHITE));
            ui.add_to_grid(grid, id, GridPos::new(col, row)).unwrap();
            first.get_or_insert(id);
        }
    }
    let first = first.unwrap();
    let mut wide = false;

    c.bench_function("reflow_grid_16x16", |b| {
        b.iter(|| {
            wide = !wide;
            ui.set_size(black_box(first), if wide { 12 } else { 8 }, 8);
        })
    });
}

fn dispatch_click(c: &mut Criterion) {
    let (mut ui, _) = create_stack(200);
    let mut dispatcher = Dispatcher::default();
    let down = InputEvent::MouseDown(MouseEvent::new(4, 400, MouseButton::Left));
    let up = InputEvent::MouseUp(MouseEvent::new(4, 400, MouseButton::Left));
    let mut now = Duration::ZERO;

    c.bench_function("dispatch_click_200_controls", |b| {
        b.iter(|| {
            // far enough apart to never count as a double-click
            now += Duration::from_secs(1);
            dispatcher.handle(&mut ui, black_box(&down), now);
            dispatcher.handle(&mut ui, black_box(&up), now);
        })
    });
}

fn dispatch_drag(c: &mut Criterion) {
    let (mut ui, _) = create_stack(200);
    let mut dispatcher = Dispatcher::default();
    dispatcher.handle(
        &mut ui,
        &InputEvent::MouseDown(MouseEvent::new(4, 4, MouseButton::Left)),
        Duration::ZERO,
    );
    let motion = InputEvent::MouseMove(Motion::new(5, 5, 1, 1));

    c.bench_function("dispatch_drag_motion", |b| {
        b.iter(|| dispatcher.handle(&mut ui, black_box(&motion), Duration::ZERO))
    });
}

fn draw_frame(c: &mut Criterion) {
    let (mut ui, _) = create_stack(500);
    let mut target = Surface::new(640, 480);

    c.bench_function("draw_500_controls", |b| {
        b.iter(|| {
            ui.draw(black_box(&mut target));
        })
    });
}

criterion_group!(
    benches,
    reflow_after_resize,
    reflow_grid,
    dispatch_click,
    dispatch_drag,
    draw_frame,
);
criterion_main!(benches);
