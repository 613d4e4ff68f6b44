//! Engine error types.

use crate::event::TimerId;
use crate::surface::SurfaceError;
use crate::tree::NodeId;
use thiserror::Error;

/// Broad classification of a [`UiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A value handed to an operation is outside what it accepts.
    InvalidArgument,
    /// The tree was used in a way that indicates a programming error.
    StructuralMisuse,
    /// A handle does not refer to anything this engine created.
    InvalidHandle,
    /// A collaborator (surface, font, sprite sheet) failed.
    Collaborator,
    /// The host layer (terminal, input queue, config file) failed.
    Host,
}

/// Errors raised by the control, layout and dispatch engine.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum UiError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("grid cell ({col}, {row}) is outside a {cols}x{rows} grid")]
    CellOutOfBounds {
        col: usize,
        row: usize,
        cols: usize,
        rows: usize,
    },

    #[error("zoom {0} is outside 1..=32")]
    ZoomOutOfRange(u32),

    #[error("timer interval must be greater than zero")]
    ZeroInterval,

    #[error("can't add items to a spacer")]
    SpacerChild,

    #[error("{child:?} is already in layout {layout:?}")]
    AlreadyPresent { layout: NodeId, child: NodeId },

    #[error("{child:?} is not in layout {layout:?}")]
    NotPresent { layout: NodeId, child: NodeId },

    #[error("grid cell ({col}, {row}) is already occupied")]
    CellOccupied { col: usize, row: usize },

    #[error("adding {child:?} to {layout:?} would create a cycle")]
    Cycle { layout: NodeId, child: NodeId },

    #[error("{0:?} is not a layout")]
    NotALayout(NodeId),

    #[error("{0:?} is not a control")]
    NotAControl(NodeId),

    #[error("node {0:?} no longer exists")]
    StaleNode(NodeId),

    #[error("unknown timer {0:?}")]
    UnknownTimer(TimerId),

    #[error("{context}: {source}")]
    Surface {
        context: String,
        #[source]
        source: SurfaceError,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl UiError {
    /// Classify this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_)
            | Self::CellOutOfBounds { .. }
            | Self::ZoomOutOfRange(_)
            | Self::ZeroInterval => ErrorKind::InvalidArgument,
            Self::SpacerChild
            | Self::AlreadyPresent { .. }
            | Self::NotPresent { .. }
            | Self::CellOccupied { .. }
            | Self::Cycle { .. }
            | Self::NotALayout(_)
            | Self::NotAControl(_) => ErrorKind::StructuralMisuse,
            Self::StaleNode(_) | Self::UnknownTimer(_) => ErrorKind::InvalidHandle,
            Self::Surface { .. } => ErrorKind::Collaborator,
            Self::Io(_) | Self::Config(_) => ErrorKind::Host,
        }
    }

    /// Wrap a surface failure with a description of what was being attempted.
    pub fn surface(context: impl Into<String>, source: SurfaceError) -> Self {
        Self::Surface {
            context: context.into(),
            source,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = UiError> = std::result::Result<T, E>;
