#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All coordinates are client-space pixels as reported by the host renderer
//! (origin at top-left, `y` growing downward). Values are `f32` because hosts
//! report fractional layout positions.

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// One of the two layout axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// The perpendicular axis.
    #[must_use]
    pub const fn cross(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }
}

/// Direction in which a container lays out its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Orientation {
    Horizontal,
    #[default]
    Vertical,
}

impl Orientation {
    /// The axis along which items are ordered.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Horizontal => Axis::X,
            Self::Vertical => Axis::Y,
        }
    }
}

/// Restricts dragging to a single axis.
///
/// `LockAxis::X` means the item may only move horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LockAxis {
    #[default]
    None,
    X,
    Y,
}

impl LockAxis {
    /// Use `self` when it is set, otherwise `fallback`.
    #[must_use]
    pub const fn or(self, fallback: LockAxis) -> LockAxis {
        match self {
            Self::None => fallback,
            locked => locked,
        }
    }

    /// Whether movement along `axis` is allowed.
    #[must_use]
    pub const fn allows(self, axis: Axis) -> bool {
        match (self, axis) {
            (Self::None, _) => true,
            (Self::X, Axis::X) | (Self::Y, Axis::Y) => true,
            _ => false,
        }
    }

    /// Zero the components of `delta` that the lock forbids.
    #[must_use]
    pub fn filter(self, delta: Point) -> Point {
        match self {
            Self::None => delta,
            Self::X => Point::new(delta.x, 0.0),
            Self::Y => Point::new(0.0, delta.y),
        }
    }

    /// Pin the forbidden component of `point` to the one in `anchor`.
    #[must_use]
    pub fn constrain(self, point: Point, anchor: Point) -> Point {
        anchor + self.filter(point - anchor)
    }
}

/// A point or displacement in client space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// The origin / zero displacement.
    pub const ZERO: Point = Point::new(0.0, 0.0);

    /// Create a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component along `axis`.
    #[inline]
    #[must_use]
    pub const fn along(self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// A displacement of `amount` along `axis` only.
    #[inline]
    #[must_use]
    pub const fn on_axis(axis: Axis, amount: f32) -> Self {
        match axis {
            Axis::X => Self::new(amount, 0.0),
            Axis::Y => Self::new(0.0, amount),
        }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Both components are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// An axis-aligned rectangle used for hit testing and slot geometry.
///
/// The left and top edges are inclusive, the right and bottom edges exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: f32,
    /// Top edge (inclusive).
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Left edge. Alias for `self.x`.
    #[inline]
    pub const fn left(&self) -> f32 {
        self.x
    }

    /// Top edge. Alias for `self.y`.
    #[inline]
    pub const fn top(&self) -> f32 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Leading edge along `axis`.
    #[inline]
    pub const fn start(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Trailing edge along `axis`.
    #[inline]
    pub fn end(&self, axis: Axis) -> f32 {
        self.start(axis) + self.extent(axis)
    }

    /// Size along `axis`.
    #[inline]
    pub const fn extent(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }

    /// Midpoint along `axis`.
    #[inline]
    pub fn midpoint(&self, axis: Axis) -> f32 {
        self.start(axis) + self.extent(axis) / 2.0
    }

    /// Zero (or negative) area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Non-finite coordinates or negative size: not usable for hit testing.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite())
            || self.width < 0.0
            || self.height < 0.0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Whether the two rectangles overlap with non-zero area.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection_opt(other).is_some()
    }

    /// Compute the intersection with another rectangle, returning `None` if no overlap.
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// The smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Move the rectangle by `delta`.
    #[inline]
    #[must_use]
    pub fn translate(&self, delta: Point) -> Rect {
        Rect::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    /// Shrink every side by `amount`; size never drops below zero.
    #[must_use]
    pub fn inset(&self, amount: f32) -> Rect {
        let width = (self.width - 2.0 * amount).max(0.0);
        let height = (self.height - 2.0 * amount).max(0.0);
        Rect::new(
            self.x + (self.width - width) / 2.0,
            self.y + (self.height - height) / 2.0,
            width,
            height,
        )
    }

    /// Grow every side by `amount`.
    #[must_use]
    pub fn expand(&self, amount: f32) -> Rect {
        Rect::new(
            self.x - amount,
            self.y - amount,
            self.width + 2.0 * amount,
            self.height + 2.0 * amount,
        )
    }

    /// Nearest point inside (or on the edge of) the rectangle.
    #[must_use]
    pub fn clamp_point(&self, point: Point) -> Point {
        Point::new(
            point.x.clamp(self.x, self.x.max(self.right())),
            point.y.clamp(self.y, self.y.max(self.bottom())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Axis, LockAxis, Orientation, Point, Rect};

    #[test]
    fn rect_contains_edges() {
        let rect = Rect::new(2.0, 3.0, 4.0, 5.0);
        assert!(rect.contains(Point::new(2.0, 3.0)));
        assert!(rect.contains(Point::new(5.9, 7.9)));
        assert!(!rect.contains(Point::new(6.0, 3.0)));
        assert!(!rect.contains(Point::new(2.0, 8.0)));
    }

    #[test]
    fn rect_contains_empty_rect() {
        let r = Rect::new(5.0, 5.0, 0.0, 0.0);
        // Empty rect contains nothing, not even its own origin
        assert!(!r.contains(Point::new(5.0, 5.0)));
    }

    #[test]
    fn rect_intersection_overlaps() {
        let a = Rect::new(0.0, 0.0, 4.0, 4.0);
        let b = Rect::new(2.0, 2.0, 4.0, 4.0);
        assert_eq!(a.intersection_opt(&b), Some(Rect::new(2.0, 2.0, 2.0, 2.0)));
        assert!(a.intersects(&b));
    }

    #[test]
    fn rect_intersection_adjacent_no_overlap() {
        // Shared edge only: right edge is exclusive
        let a = Rect::new(0.0, 0.0, 5.0, 5.0);
        let b = Rect::new(5.0, 0.0, 5.0, 5.0);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn rect_union_disjoint() {
        let a = Rect::new(0.0, 0.0, 2.0, 2.0);
        let b = Rect::new(10.0, 10.0, 3.0, 3.0);
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 13.0, 13.0));
    }

    #[test]
    fn rect_axis_accessors() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.start(Axis::X), 10.0);
        assert_eq!(r.end(Axis::Y), 60.0);
        assert_eq!(r.extent(Axis::X), 30.0);
        assert_eq!(r.midpoint(Axis::Y), 40.0);
        assert_eq!(r.center(), Point::new(25.0, 40.0));
    }

    #[test]
    fn rect_translate_moves_origin_only() {
        let r = Rect::new(0.0, 40.0, 100.0, 40.0).translate(Point::new(0.0, -15.0));
        assert_eq!(r, Rect::new(0.0, 25.0, 100.0, 40.0));
    }

    #[test]
    fn rect_inset_and_expand() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(r.inset(2.0), Rect::new(2.0, 2.0, 6.0, 6.0));
        assert_eq!(r.expand(1.0), Rect::new(-1.0, -1.0, 12.0, 12.0));
        // Large inset collapses to the center
        let collapsed = r.inset(20.0);
        assert_eq!(collapsed.width, 0.0);
        assert_eq!(collapsed.origin(), Point::new(5.0, 5.0));
    }

    #[test]
    fn rect_clamp_point() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(r.clamp_point(Point::new(-5.0, 15.0)), Point::new(0.0, 10.0));
        assert_eq!(r.clamp_point(Point::new(3.0, 4.0)), Point::new(3.0, 4.0));
    }

    #[test]
    fn rect_degenerate_detection() {
        assert!(Rect::new(f32::NAN, 0.0, 1.0, 1.0).is_degenerate());
        assert!(Rect::new(0.0, 0.0, -1.0, 1.0).is_degenerate());
        assert!(Rect::new(0.0, 0.0, f32::INFINITY, 1.0).is_degenerate());
        assert!(!Rect::new(0.0, 0.0, 0.0, 0.0).is_degenerate());
    }

    #[test]
    fn lock_axis_filters_delta() {
        let d = Point::new(3.0, -4.0);
        assert_eq!(LockAxis::None.filter(d), d);
        assert_eq!(LockAxis::X.filter(d), Point::new(3.0, 0.0));
        assert_eq!(LockAxis::Y.filter(d), Point::new(0.0, -4.0));
    }

    #[test]
    fn lock_axis_constrain_pins_to_anchor() {
        let anchor = Point::new(10.0, 50.0);
        let p = LockAxis::X.constrain(Point::new(30.0, 5.0), anchor);
        assert_eq!(p, Point::new(30.0, 50.0));
    }

    #[test]
    fn lock_axis_fallback_and_allows() {
        assert_eq!(LockAxis::None.or(LockAxis::Y), LockAxis::Y);
        assert_eq!(LockAxis::X.or(LockAxis::Y), LockAxis::X);
        assert!(LockAxis::X.allows(Axis::X));
        assert!(!LockAxis::X.allows(Axis::Y));
        assert!(LockAxis::None.allows(Axis::Y));
    }

    #[test]
    fn orientation_axis() {
        assert_eq!(Orientation::Horizontal.axis(), Axis::X);
        assert_eq!(Orientation::Vertical.axis(), Axis::Y);
        assert_eq!(Axis::X.cross(), Axis::Y);
    }

    #[test]
    fn point_arithmetic() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(4.0, 6.0);
        assert_eq!(b - a, Point::new(3.0, 4.0));
        assert_eq!(a + b, Point::new(5.0, 8.0));
        assert_eq!(-a, Point::new(-1.0, -2.0));
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(Point::on_axis(Axis::Y, 7.0), Point::new(0.0, 7.0));
        assert_eq!(b.along(Axis::X), 4.0);
    }
}
