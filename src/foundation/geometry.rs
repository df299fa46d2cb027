/// Axis-aligned integer rectangle with inclusive bounds.
///
/// Coordinates span the full `i16` range. Translation saturates at the
/// range ends instead of wrapping.
///
/// A rectangle with `x_max < x_min` or `y_max < y_min` is empty. The
/// canonical empty value is `(0, 0, -1, -1)`, which is also `Default`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    x_min: i16,
    y_min: i16,
    x_max: i16,
    y_max: i16,
}

impl Default for Rect {
    fn default() -> Self {
        Self::empty()
    }
}

impl Rect {
    /// Create a rectangle from inclusive bounds.
    pub const fn new(x_min: i16, y_min: i16, x_max: i16, y_max: i16) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// The canonical empty rectangle.
    pub const fn empty() -> Self {
        Self::new(0, 0, -1, -1)
    }

    /// Leftmost column.
    pub const fn x_min(self) -> i16 {
        self.x_min
    }

    /// Top row.
    pub const fn y_min(self) -> i16 {
        self.y_min
    }

    /// Rightmost column, inclusive.
    pub const fn x_max(self) -> i16 {
        self.x_max
    }

    /// Bottom row, inclusive.
    pub const fn y_max(self) -> i16 {
        self.y_max
    }

    /// Return `true` when the rectangle contains no pixels.
    pub const fn is_empty(self) -> bool {
        self.x_max < self.x_min || self.y_max < self.y_min
    }

    /// Width in pixels; zero for empty rectangles.
    pub fn width(self) -> u32 {
        (i32::from(self.x_max) - i32::from(self.x_min) + 1).max(0) as u32
    }

    /// Height in pixels; zero for empty rectangles.
    pub fn height(self) -> u32 {
        (i32::from(self.y_max) - i32::from(self.y_min) + 1).max(0) as u32
    }

    /// Number of pixels covered, saturating at `u32::MAX`.
    ///
    /// Only a rectangle spanning all 65536 columns and all 65536 rows
    /// saturates; see [`Rect::checked_area`].
    pub fn area(self) -> u32 {
        self.checked_area().unwrap_or(u32::MAX)
    }

    /// Number of pixels covered, or `None` when it does not fit in `u32`.
    pub fn checked_area(self) -> Option<u32> {
        if self.is_empty() {
            return Some(0);
        }
        self.width().checked_mul(self.height())
    }

    /// Overlap of two rectangles. May be empty.
    pub fn intersect(self, other: Self) -> Self {
        Self::new(
            self.x_min.max(other.x_min),
            self.y_min.max(other.y_min),
            self.x_max.min(other.x_max),
            self.y_max.min(other.y_max),
        )
    }

    /// Smallest rectangle containing both. Empty operands are ignored.
    pub fn extent(self, other: Self) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        Self::new(
            self.x_min.min(other.x_min),
            self.y_min.min(other.y_min),
            self.x_max.max(other.x_max),
            self.y_max.max(other.y_max),
        )
    }

    /// Shift by `(dx, dy)`. Bounds clamp to the `i16` range.
    pub fn translate(self, dx: i16, dy: i16) -> Self {
        self.shift(i32::from(dx), i32::from(dy))
    }

    /// Shift by `(-dx, -dy)`. Undoes [`Rect::translate`] whenever that did
    /// not clamp, including for `dx == i16::MIN`.
    pub fn untranslate(self, dx: i16, dy: i16) -> Self {
        self.shift(-i32::from(dx), -i32::from(dy))
    }

    fn shift(self, dx: i32, dy: i32) -> Self {
        let clamp = |v: i16, d: i32| {
            (i32::from(v) + d).clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
        };
        Self::new(
            clamp(self.x_min, dx),
            clamp(self.y_min, dy),
            clamp(self.x_max, dx),
            clamp(self.y_max, dy),
        )
    }

    /// Return `true` when `(x, y)` lies inside.
    pub fn contains(self, x: i16, y: i16) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }

    /// Return `true` when `other` lies entirely inside. Empty rectangles are
    /// contained in everything.
    pub fn contains_rect(self, other: Self) -> bool {
        other.is_empty()
            || (other.x_min >= self.x_min
                && other.x_max <= self.x_max
                && other.y_min >= self.y_min
                && other.y_max <= self.y_max)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/geometry.rs"]
mod tests;
