//! The stock widget set of the pixel editor.
//!
//! Leaf widgets draw themselves and react to input; [`ToolPanel`],
//! [`StatusBar`] and [`YesNoDialog`] own a sub-layout of other controls.
//! Text rendering and the bounded [`UndoStack`] are shared helpers.

mod button;
mod dialog;
mod label;
mod line;
mod panel;
mod pixel_grid;
mod roi;
mod slider;
mod sprite_preview;
mod status_bar;
pub mod text;
mod text_entry;
mod tool_panel;
mod undo;

pub use button::Button;
pub use dialog::{Answer, YesNoDialog};
pub use label::Label;
pub use line::{Line, Orientation};
pub use panel::{draw_panel, ColorCell, PanelStyle, LIGHT_TINT, SHADE_TINT};
pub use pixel_grid::{PixelGrid, MAX_ZOOM};
pub use roi::Roi;
pub use slider::Slider;
pub use sprite_preview::{SpritePreview, TileMode};
pub use status_bar::StatusBar;
pub use text_entry::TextEntry;
pub use tool_panel::ToolPanel;
pub use undo::UndoStack;
