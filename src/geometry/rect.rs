//! Rect: the axis-aligned rectangle every control and layout occupies.

/// A rectangle defined by position and size, in canvas pixels.
///
/// Sizes are plain integers and are not validated here; widgets that resize
/// themselves interactively clamp to a minimum of one pixel on their own.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// X coordinate of the top-left corner.
    pub x: i32,
    /// Y coordinate of the top-left corner.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Zero-sized rectangle.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Right edge, `x + width`.
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Bottom edge, `y + height`.
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Horizontal center.
    #[inline]
    pub const fn center_x(&self) -> i32 {
        self.x + self.width / 2
    }

    /// Vertical center.
    #[inline]
    pub const fn center_y(&self) -> i32 {
        self.y + self.height / 2
    }

    /// Move the right edge to `right`, keeping the width.
    #[inline]
    pub const fn set_right(&mut self, right: i32) {
        self.x = right - self.width;
    }

    /// Move the bottom edge to `bottom`, keeping the height.
    #[inline]
    pub const fn set_bottom(&mut self, bottom: i32) {
        self.y = bottom - self.height;
    }

    /// Check if the rectangle has no area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Inclusive containment test on all four edges.
    ///
    /// A point lying exactly on `right()` or `bottom()` is inside.
    #[inline]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        pick_box(self.x, self.y, self.right(), self.bottom(), x, y)
    }

    /// Check if this rectangle intersects with another.
    #[inline]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Return a copy moved by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub const fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Shrink the rectangle by a margin on all sides.
    #[inline]
    #[must_use]
    pub const fn shrink(&self, margin: i32) -> Self {
        let m2 = margin * 2;
        if self.width <= m2 || self.height <= m2 {
            return Self::ZERO;
        }
        Self::new(self.x + margin, self.y + margin, self.width - m2, self.height - m2)
    }
}

impl std::fmt::Debug for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rect({}, {} {}x{})", self.x, self.y, self.width, self.height)
    }
}

/// Box hit-test: is `(x, y)` inside `(x1, y1)..=(x2, y2)`?
#[inline]
pub const fn pick_box(x1: i32, y1: i32, x2: i32, y2: i32, x: i32, y: i32) -> bool {
    x >= x1 && y >= y1 && x <= x2 && y <= y2
}

/// Circle hit-test: squared distance from the center within `radius²`.
#[inline]
pub const fn pick_circle(cx: i32, cy: i32, radius: i32, x: i32, y: i32) -> bool {
    // i32 differences span 33 bits, their squares need i128
    let dx = x as i128 - cx as i128;
    let dy = y as i128 - cy as i128;
    let r = radius as i128;
    dx * dx + dy * dy <= r * r
}

/// Vertex hit-test: `|dx| <= size && |dy| <= size` around `(px, py)`.
#[inline]
pub const fn pick_point(px: i32, py: i32, x: i32, y: i32, size: i32) -> bool {
    (x as i64 - px as i64).abs() <= size as i64 && (y as i64 - py as i64).abs() <= size as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_edges() {
        let mut r = Rect::new(10, 20, 30, 40);
        assert_eq!(r.right(), 40);
        assert_eq!(r.bottom(), 60);
        assert_eq!(r.center_x(), 25);
        assert_eq!(r.center_y(), 40);

        r.set_right(100);
        assert_eq!(r.x, 70);
        assert_eq!(r.width, 30);

        r.set_bottom(50);
        assert_eq!(r.y, 10);
        assert_eq!(r.height, 40);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let r = Rect::new(0, 0, 10, 10);
        assert!(r.contains(0, 0));
        assert!(r.contains(10, 10));
        assert!(r.contains(10, 5));
        assert!(!r.contains(11, 5));
        assert!(!r.contains(5, 11));
        assert!(!r.contains(-1, 0));
    }

    #[test]
    fn test_pick_circle() {
        assert!(pick_circle(0, 0, 5, 3, 4));
        assert!(!pick_circle(0, 0, 5, 4, 4));
    }

    #[test]
    fn test_pick_point() {
        assert!(pick_point(10, 10, 12, 8, 2));
        assert!(!pick_point(10, 10, 13, 10, 2));
    }

    #[test]
    fn test_shrink() {
        let r = Rect::new(0, 0, 10, 10);
        assert_eq!(r.shrink(2), Rect::new(2, 2, 6, 6));
        assert_eq!(r.shrink(5), Rect::ZERO);
    }

    #[test]
    fn test_picks_at_coordinate_extremes() {
        assert!(!pick_circle(i32::MIN, 0, 10, i32::MAX, 0));
        assert!(pick_circle(i32::MAX, i32::MIN, 0, i32::MAX, i32::MIN));
        assert!(!pick_point(i32::MIN, i32::MIN, i32::MAX, i32::MAX, 3));
        assert!(pick_point(i32::MAX, 0, i32::MAX - 3, 0, 3));
    }
}
