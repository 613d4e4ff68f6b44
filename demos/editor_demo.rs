//! Editor Demo: a tiny sprite editor in the terminal.
//!
//! Demonstrates:
//! - PixelGrid painting with the left button, flood fill with the right
//! - ToolPanel palette that can be dragged around by its handle
//! - StatusBar with a live cursor readout
//! - SpritePreview tiling the sprite, dragged around by its body
//! - YesNoDialog confirming quit
//! - Control geometry persisted between runs in `editor_demo.json`
//!
//! One terminal cell is one pixel. Ctrl+Z undoes, t cycles the preview
//! tiling, q asks before quitting and Esc quits right away. Logs go to
//! `editor_demo.log`; set `RUST_LOG=trellis=debug` for more.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use trellis::tree::Click;
use trellis::widgets::{
    Answer, Button, ColorCell, Label, PixelGrid, SpritePreview, StatusBar, TileMode, ToolPanel, YesNoDialog,
};
use trellis::{
    App, AppConfig, InputEvent, KeyCode, KeyModifiers, MemoryConfig, MouseButton, NodeId, Rgb, Surface,
    TerminalHost, Ui,
};

const CONFIG_PATH: &str = "editor_demo.json";
const SPRITE: i32 = 16;

const PALETTE: [Rgb; 5] = [
    Rgb::new(20, 20, 20),
    Rgb::new(230, 230, 220),
    Rgb::new(200, 60, 50),
    Rgb::new(60, 160, 80),
    Rgb::new(60, 90, 200),
];

struct Editor {
    grid: NodeId,
    readout: NodeId,
    preview: NodeId,
    confirm: NodeId,
    brush: Rc<Cell<Rgb>>,
    painted: Rc<RefCell<Option<Surface>>>,
}

fn main() -> trellis::Result<()> {
    let log = std::fs::File::create("editor_demo.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Mutex::new(log))
        .with_ansi(false)
        .init();

    tracing::info!("Starting editor demo");

    let store = Rc::new(RefCell::new(MemoryConfig::load(CONFIG_PATH).unwrap_or_default()));
    let (width, height) = TerminalHost::size()?;
    let mut app = App::new(AppConfig {
        title: Some("trellis editor".to_string()),
        width,
        height,
        target_fps: 30,
        shadow_offset: 2,
        ..AppConfig::default()
    });
    app.ui_mut().set_config_store(Rc::clone(&store));

    let editor = Rc::new(build(app.ui_mut())?);
    let handler = Rc::clone(&editor);
    app.on_event(move |ui, event| handle_event(ui, &handler, event));
    let refresh = Rc::clone(&editor);
    app.on_pre_draw(move |ui, _| {
        if let Some(image) = refresh.painted.borrow_mut().take() {
            ui.with_widget::<SpritePreview, _>(refresh.preview, |p, cx| p.set_sprite(cx, image));
        }
    });

    let mut host = TerminalHost::new()?;
    app.run_host(&mut host)?;
    drop(host);

    store.borrow().save(CONFIG_PATH)?;
    tracing::info!(frames = app.frame_count(), "editor demo finished");
    Ok(())
}

fn build(ui: &mut Ui) -> trellis::Result<Editor> {
    let brush = Rc::new(Cell::new(PALETTE[0]));
    let painted = Rc::new(RefCell::new(None));

    let sink = Rc::clone(&painted);
    let grid = PixelGrid::new(SPRITE, SPRITE, 2)?.on_painted(move |image| *sink.borrow_mut() = Some(image.clone()));
    let grid = ui.spawn_at(4, 4, grid);
    ui.register(grid, Some("sprite"), None)?;
    ui.set_drop_shadow(grid, false);
    let paint = Rc::clone(&brush);
    ui.on_click(grid, move |ui, id, click| {
        paint_at(ui, id, click, paint.get(), true);
        true
    })?;
    let paint = Rc::clone(&brush);
    ui.on_drag_move(grid, move |ui, id, _, motion| {
        let click = Click {
            x: motion.x,
            y: motion.y,
            button: motion.button,
        };
        paint_at(ui, id, click, paint.get(), false);
    })?;

    let palette = ui.spawn_at(4 + SPRITE * 2 + 8, 4, ToolPanel::new(2));
    ui.set_persist_geometry(palette, true);
    ui.register(palette, Some("palette"), None)?;
    for color in PALETTE {
        let cell = ui.spawn(ColorCell::new(6, 6, color));
        let pick = Rc::clone(&brush);
        ui.on_click(cell, move |ui, id, _| {
            if let Some(state) = ui.state(id) {
                pick.set(state.color());
            }
            true
        })?;
        add_tool(ui, palette, cell)?;
    }

    let clear = ui.spawn(Button::new("clr", 28, 12));
    ui.on_click(clear, move |ui, _, _| {
        let cleared = ui.with_widget::<PixelGrid, _>(grid, |g, cx| {
            g.checkpoint();
            g.set_image(cx, Surface::filled(SPRITE, SPRITE, Rgb::GRID))
        });
        if let Some(Err(e)) = cleared {
            tracing::warn!("can't clear sprite: {e}");
        }
        true
    })?;
    add_tool(ui, palette, clear)?;

    let sprite = ui
        .widget::<PixelGrid>(grid)
        .map_or_else(|| Surface::new(SPRITE, SPRITE), |g| g.image().clone());
    let preview = ui.spawn_at(4, 4 + SPRITE * 2 + 6, SpritePreview::new(sprite, 1).with_tile_mode(TileMode::Both));
    ui.set_persist_geometry(preview, true);
    ui.register(preview, Some("preview"), None)?;

    let confirm = ui.spawn(
        YesNoDialog::new("quit", "Unsaved pixels are lost.")
            .with_size(300, 100)
            .on_result(|ui, answer| {
                if answer == Answer::Yes {
                    ui.request_quit();
                }
            }),
    );
    ui.register(confirm, Some("confirm"), None)?;

    let status = ui.spawn(StatusBar::new());
    ui.register(status, Some("status"), None)?;
    let readout = ui.spawn(Label::new("--").with_format("cell {}"));
    ui.with_widget::<StatusBar, _>(status, |s, cx| s.add_item(cx, readout))
        .transpose()?;

    Ok(Editor {
        grid,
        readout,
        preview,
        confirm,
        brush,
        painted,
    })
}

fn add_tool(ui: &mut Ui, panel: NodeId, tool: NodeId) -> trellis::Result<()> {
    ui.with_widget::<ToolPanel, _>(panel, |p, cx| p.add_item(cx, tool))
        .transpose()?;
    Ok(())
}

fn paint_at(ui: &mut Ui, grid: NodeId, click: Click, color: Rgb, checkpoint: bool) {
    ui.with_widget::<PixelGrid, _>(grid, |g, cx| match click.button {
        MouseButton::Left => {
            if checkpoint {
                g.checkpoint();
            }
            g.set_color_at(cx, click.x, click.y, color);
        }
        MouseButton::Right if checkpoint => {
            g.checkpoint();
            g.flood_fill_at(cx, click.x, click.y, color);
        }
        _ => {}
    });
}

fn handle_event(ui: &mut Ui, editor: &Editor, event: &InputEvent) {
    match event {
        InputEvent::Key(key) => match key.code {
            KeyCode::Esc => ui.request_quit(),
            KeyCode::Char('q') => {
                let (width, height) = ui.canvas_size();
                if let Some(b) = ui.bounds(editor.confirm) {
                    ui.set_pos(editor.confirm, (width - b.width) / 2, (height - b.height) / 2);
                }
                ui.with_widget::<YesNoDialog, _>(editor.confirm, |d, cx| d.show(cx));
            }
            KeyCode::Char('t') => {
                ui.with_widget::<SpritePreview, _>(editor.preview, |p, cx| {
                    let next = match p.tile_mode() {
                        TileMode::None => TileMode::Horizontal,
                        TileMode::Horizontal => TileMode::Vertical,
                        TileMode::Vertical => TileMode::Both,
                        TileMode::Both => TileMode::None,
                    };
                    p.set_tile_mode(cx, next);
                });
            }
            KeyCode::Char('z') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                ui.with_widget::<PixelGrid, _>(editor.grid, |g, cx| g.undo(cx));
            }
            _ => {}
        },
        InputEvent::MouseMove(motion) => {
            let cell = ui
                .with_widget::<PixelGrid, _>(editor.grid, |g, cx| g.cell_at(cx, motion.x, motion.y))
                .flatten();
            let text = cell.map_or_else(|| "--".to_string(), |(col, row)| format!("{col},{row}"));
            ui.with_widget::<Label, _>(editor.readout, |l, cx| l.set_value(cx, text));
        }
        InputEvent::MouseDown(_) => {
            tracing::debug!(brush = ?editor.brush.get(), "pointer down");
        }
        _ => {}
    }
}
