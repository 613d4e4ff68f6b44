//! Rgb: true-color pixel values.

use serde::{Deserialize, Serialize};

/// True-color RGB representation.
///
/// Serializes as an `[r, g, b]` triple so that colors can be stored in a
/// configuration file alongside other primitive values.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(from = "(u8, u8, u8)", into = "(u8, u8, u8)")]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black (0, 0, 0)
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White (255, 255, 255)
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Canvas background.
    pub const BACKGROUND: Self = Self::new(90, 87, 85);
    /// Default control face color.
    pub const FOREGROUND: Self = Self::new(152, 168, 152);
    /// Lighter variant of the face color, used for bevel highlights.
    pub const FOREGROUND_LIGHT: Self = Self::new(193, 214, 193);
    /// Darker variant of the face color, used for bevel shadows.
    pub const FOREGROUND_DARK: Self = Self::new(113, 124, 113);
    /// Border color for cells and regions.
    pub const BORDER: Self = Self::new(230, 220, 230);
    /// Pixel grid background.
    pub const GRID: Self = Self::new(120, 120, 120);
    /// Pixel grid cell lines.
    pub const GRID_CELL: Self = Self::new(140, 140, 140);
    /// Neutral fill used by previews.
    pub const DEFAULT: Self = Self::new(110, 100, 100);
    /// Color of cast drop shadows before subtraction.
    pub const SHADOW: Self = Self::new(25, 23, 19);

    /// Create from a 24-bit hex color (e.g., 0xFF5500).
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Scale every channel towards black by `amount` (0.0 - 1.0).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn darker(self, amount: f32) -> Self {
        let k = (1.0 - amount).clamp(0.0, 1.0);
        let f = |c: u8| (f32::from(c) * k).round() as u8;
        Self::new(f(self.r), f(self.g), f(self.b))
    }

    /// Move every channel towards white by `amount` (0.0 - 1.0).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn brighter(self, amount: f32) -> Self {
        let k = amount.clamp(0.0, 1.0);
        let f = |c: u8| (f32::from(c) + (255.0 - f32::from(c)) * k).round() as u8;
        Self::new(f(self.r), f(self.g), f(self.b))
    }

    /// Per-channel saturating subtraction.
    #[inline]
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self::new(
            self.r.saturating_sub(other.r),
            self.g.saturating_sub(other.g),
            self.b.saturating_sub(other.b),
        )
    }

    /// Per-channel saturating addition.
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self::new(
            self.r.saturating_add(other.r),
            self.g.saturating_add(other.g),
            self.b.saturating_add(other.b),
        )
    }
}

impl std::fmt::Debug for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    #[inline]
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Rgb> for (u8, u8, u8) {
    #[inline]
    fn from(c: Rgb) -> Self {
        (c.r, c.g, c.b)
    }
}

impl From<u32> for Rgb {
    /// Convert from a 24-bit hex color (e.g., 0xFF5500)
    #[inline]
    fn from(hex: u32) -> Self {
        Self::from_u32(hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgb::from(0xFF_55_00), Rgb::new(255, 85, 0));
    }

    #[test]
    fn test_darker_brighter() {
        let c = Rgb::new(100, 200, 50);
        assert_eq!(c.darker(0.5), Rgb::new(50, 100, 25));
        assert_eq!(c.darker(0.0), c);
        assert_eq!(Rgb::BLACK.brighter(1.0), Rgb::WHITE);
    }

    #[test]
    fn test_serializes_as_triple() {
        let json = serde_json::to_string(&Rgb::new(1, 2, 3)).unwrap();
        assert_eq!(json, "[1,2,3]");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgb::new(1, 2, 3));
    }
}
