/// Shared geometric primitives used across viewport, input and detail modules.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The same rectangle expressed in the coordinate space anchored at `origin`.
    pub fn relative_to(&self, origin: Point) -> Rect {
        Rect::new(self.x - origin.x, self.y - origin.y, self.width, self.height)
    }
}

/// Valid translation range for the pannable grid.
///
/// The interval may be inverted (`min > max`) when the scaled grid is smaller
/// than the window; `clamp` stays total in that case and resolves to `min`,
/// which is what determines centering for undersized content.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl PanBounds {
    pub const fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    pub fn clamp(&self, point: Point) -> Point {
        Point::new(
            clamp_axis(point.x, self.min_x, self.max_x),
            clamp_axis(point.y, self.min_y, self.max_y),
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        self.clamp(point) == point
    }
}

// Not `f64::clamp`: that panics on inverted intervals, and `min > max` is a
// legitimate state here. `max(min, min(max, value))` yields `min` then.
fn clamp_axis(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_keeps_in_range_values_unchanged() {
        let bounds = PanBounds::new(-500.0, 0.0, -300.0, 100.0);
        let point = Point::new(-250.0, -50.0);
        assert_eq!(bounds.clamp(point), point);
        assert!(bounds.contains(point));
    }

    #[test]
    fn clamp_pins_out_of_range_values_to_the_nearest_edge() {
        let bounds = PanBounds::new(-500.0, 0.0, -300.0, 100.0);
        assert_eq!(
            bounds.clamp(Point::new(-700.0, 250.0)),
            Point::new(-500.0, 100.0)
        );
        assert_eq!(
            bounds.clamp(Point::new(80.0, -900.0)),
            Point::new(0.0, -300.0)
        );
    }

    #[test]
    fn clamp_resolves_inverted_intervals_to_min() {
        // Grid smaller than window: min_x ends up above max_x.
        let bounds = PanBounds::new(120.0, 50.0, -10.0, -40.0);
        let clamped = bounds.clamp(Point::new(0.0, 0.0));
        assert_eq!(clamped, Point::new(120.0, -10.0));

        // Deterministic regardless of where the input sits.
        assert_eq!(bounds.clamp(Point::new(1e6, 1e6)), Point::new(120.0, -10.0));
    }

    #[test]
    fn rect_relative_to_shifts_origin_only() {
        let rect = Rect::new(300.0, 200.0, 40.0, 60.0);
        let relative = rect.relative_to(Point::new(250.0, 180.0));
        assert_eq!(relative, Rect::new(50.0, 20.0, 40.0, 60.0));
    }
}
