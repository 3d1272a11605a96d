//! Plain 2D geometry used by the particle field

/// A point (or displacement) in viewport pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation towards `other`; `t = 0` is `self`, `t = 1` is `other`
    #[inline]
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// Drawable area in CSS pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Area in square pixels, 0 for degenerate or non-finite sizes
    pub fn area(&self) -> f64 {
        let area = self.width * self.height;
        if area.is_finite() && self.width > 0.0 && self.height > 0.0 {
            area
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.distance(a), 5.0);
    }

    #[test]
    fn test_lerp_endpoints_and_midpoint() {
        let a = Point::new(10.0, 20.0);
        let b = Point::new(30.0, -20.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Point::new(20.0, 0.0));
    }

    #[test]
    fn test_viewport_area_degenerate() {
        assert_eq!(Viewport::new(500.0, 500.0).area(), 250_000.0);
        assert_eq!(Viewport::new(0.0, 500.0).area(), 0.0);
        assert_eq!(Viewport::new(-10.0, 500.0).area(), 0.0);
        assert_eq!(Viewport::new(f64::NAN, 500.0).area(), 0.0);
        assert_eq!(Viewport::new(f64::INFINITY, 500.0).area(), 0.0);
    }
}
