//! Layout kinds and the re-flow algorithms.
//!
//! Re-flow is a pure function of the layout's kind, origin and spacing and of
//! its items' current sizes: [`plan`] returns every item's new position plus
//! the layout's own size. Nothing is cached between runs, so re-flowing twice
//! without an intervening mutation yields identical positions.

use super::NodeId;
use crate::geometry::Rect;

/// Placement of items inside a grid cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    /// Items are packed against the left edge of their column.
    #[default]
    Left,
    /// Items are centered within their column width.
    Center,
}

/// Grid cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPos {
    /// Column index.
    pub col: usize,
    /// Row index.
    pub row: usize,
}

impl GridPos {
    /// Create a cell position.
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

/// How a layout positions its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    /// Items keep their own positions; the layout only tracks their extent.
    Free,
    /// Items stacked top to bottom.
    Vertical,
    /// Items stacked left to right.
    Horizontal,
    /// Items placed in a fixed table of cells.
    Grid {
        /// Column count.
        cols: usize,
        /// Row count.
        rows: usize,
        /// Placement within a column.
        alignment: Alignment,
    },
    /// A placeholder that only contributes its spacing.
    Spacer,
}

impl LayoutKind {
    /// Spacing used when none is given.
    pub const fn default_spacing(self) -> i32 {
        match self {
            Self::Vertical | Self::Grid { .. } => 2,
            Self::Free | Self::Horizontal | Self::Spacer => 0,
        }
    }

    /// Whether the kind assigns item positions.
    pub const fn positions_items(self) -> bool {
        matches!(self, Self::Vertical | Self::Horizontal | Self::Grid { .. })
    }
}

pub(crate) struct LayoutNode {
    pub(crate) kind: LayoutKind,
    pub(crate) spacing: i32,
    /// Insertion order, which is also draw order.
    pub(crate) items: Vec<NodeId>,
    /// Row-major cell table; empty unless the kind is a grid.
    pub(crate) cells: Vec<Option<NodeId>>,
    /// `false` until the layout is given a position or gets its first item.
    pub(crate) placed: bool,
    /// Control owning this layout as its sub-layout.
    pub(crate) parent: Option<NodeId>,
}

impl LayoutNode {
    pub(crate) fn new(kind: LayoutKind, spacing: i32) -> Self {
        let cells = match kind {
            LayoutKind::Grid { cols, rows, .. } => vec![None; cols * rows],
            _ => Vec::new(),
        };
        Self {
            kind,
            spacing,
            items: Vec::new(),
            cells,
            placed: false,
            parent: None,
        }
    }

    pub(crate) fn cell_index(&self, pos: GridPos) -> Option<usize> {
        match self.kind {
            LayoutKind::Grid { cols, rows, .. } if pos.col < cols && pos.row < rows => Some(pos.row * cols + pos.col),
            _ => None,
        }
    }

    pub(crate) fn detach(&mut self, child: NodeId) -> bool {
        let Some(index) = self.items.iter().position(|&id| id == child) else {
            return false;
        };
        self.items.remove(index);
        for cell in &mut self.cells {
            if *cell == Some(child) {
                *cell = None;
            }
        }
        true
    }
}

/// What re-flow needs to know about one item.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ItemInfo {
    pub(crate) id: NodeId,
    pub(crate) rect: Rect,
    /// A nested layout's own spacing, added after it; zero for controls.
    pub(crate) extra: i32,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Placement {
    pub(crate) positions: Vec<(NodeId, i32, i32)>,
    pub(crate) width: i32,
    pub(crate) height: i32,
}

pub(crate) fn plan(layout: &LayoutNode, origin: (i32, i32), items: &[ItemInfo]) -> Placement {
    match layout.kind {
        LayoutKind::Vertical => stack(origin, layout.spacing, items, true),
        LayoutKind::Horizontal => stack(origin, layout.spacing, items, false),
        LayoutKind::Grid { cols, rows, alignment } => {
            grid(origin, layout.spacing, cols, rows, alignment, &layout.cells, items)
        }
        LayoutKind::Free => free(origin, items),
        LayoutKind::Spacer => Placement::default(),
    }
}

fn stack(origin: (i32, i32), spacing: i32, items: &[ItemInfo], vertical: bool) -> Placement {
    let (ox, oy) = origin;
    let mut along = 0;
    let mut across = 0;
    let mut positions = Vec::with_capacity(items.len());

    for (i, item) in items.iter().enumerate() {
        let (length, breadth) = if vertical {
            positions.push((item.id, ox, oy + along));
            (item.rect.height, item.rect.width)
        } else {
            positions.push((item.id, ox + along, oy));
            (item.rect.width, item.rect.height)
        };
        along += length + item.extra;
        if i + 1 < items.len() {
            along += spacing;
        }
        across = across.max(breadth);
    }

    let (width, height) = if vertical { (across, along) } else { (along, across) };
    Placement { positions, width, height }
}

fn grid(
    origin: (i32, i32),
    spacing: i32,
    cols: usize,
    rows: usize,
    alignment: Alignment,
    cells: &[Option<NodeId>],
    items: &[ItemInfo],
) -> Placement {
    let (ox, oy) = origin;
    let lookup = |row: usize, col: usize| {
        cells
            .get(row * cols + col)
            .copied()
            .flatten()
            .and_then(|id| items.iter().find(|item| item.id == id))
    };

    let mut col_widths = vec![0; cols];
    for (col, col_width) in col_widths.iter_mut().enumerate() {
        for row in 0..rows {
            if let Some(item) = lookup(row, col) {
                *col_width = (*col_width).max(item.rect.width);
            }
        }
    }

    let mut placement = Placement::default();
    let mut first_row = true;
    for row in 0..rows {
        let row_items: Vec<(usize, &ItemInfo)> = (0..cols).filter_map(|col| lookup(row, col).map(|item| (col, item))).collect();
        if row_items.is_empty() {
            continue;
        }
        if !first_row {
            placement.height += spacing;
        }
        first_row = false;

        let mut left = 0;
        let mut row_height = 0;
        let mut row_extra = 0;
        for (col, item) in row_items {
            let x = match alignment {
                Alignment::Left => ox + left,
                Alignment::Center => ox + left + (col_widths[col] - item.rect.width) / 2,
            };
            placement.positions.push((item.id, x, oy + placement.height));
            left += col_widths[col] + spacing + item.extra;
            row_height = row_height.max(item.rect.height);
            row_extra = row_extra.max(item.extra);
        }
        placement.width = placement.width.max(left - spacing);
        placement.height += row_height + row_extra;
    }
    placement
}

fn free(origin: (i32, i32), items: &[ItemInfo]) -> Placement {
    let (ox, oy) = origin;
    let right = items.iter().map(|item| item.rect.right()).max().unwrap_or(ox);
    let bottom = items.iter().map(|item| item.rect.bottom()).max().unwrap_or(oy);
    Placement {
        positions: Vec::new(),
        width: (right - ox).max(0),
        height: (bottom - oy).max(0),
    }
}
