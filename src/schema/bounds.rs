use crate::render::Rect;

/// Running extrema over every observed rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    x_min: f64,
    y_min: f64,
    x_max: f64,
    y_max: f64,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            x_min: f64::INFINITY,
            y_min: f64::INFINITY,
            x_max: f64::NEG_INFINITY,
            y_max: f64::NEG_INFINITY,
        }
    }
}

impl BoundingBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, rect: Rect) {
        self.x_max = self.x_max.max(rect.right());
        self.y_max = self.y_max.max(rect.bottom());
        self.x_min = self.x_min.min(rect.x);
        self.y_min = self.y_min.min(rect.y);
    }

    /// The tight box, or `None` before the first observation.
    pub fn bounds(&self) -> Option<Rect> {
        if self.x_min > self.x_max || self.y_min > self.y_max {
            return None;
        }
        Some(Rect::new(
            self.x_min,
            self.y_min,
            self.x_max - self.x_min,
            self.y_max - self.y_min,
        ))
    }

    /// The box grown by `border` on every side; an empty box stays at the origin.
    pub fn with_border(&self, border: f64) -> Rect {
        let tight = self.bounds().unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0));
        Rect::new(
            tight.x - border,
            tight.y - border,
            tight.width + 2.0 * border,
            tight.height + 2.0 * border,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_observation_wins() {
        let mut bbox = BoundingBox::new();
        bbox.observe(Rect::new(-500.0, 200_000.0, 10.0, 10.0));
        assert_eq!(bbox.bounds(), Some(Rect::new(-500.0, 200_000.0, 10.0, 10.0)));
    }

    #[test]
    fn test_union_of_rectangles() {
        let mut bbox = BoundingBox::new();
        bbox.observe(Rect::new(10.0, 20.0, 100.0, 40.0));
        bbox.observe(Rect::new(200.0, 5.0, 50.0, 30.0));
        assert_eq!(bbox.bounds(), Some(Rect::new(10.0, 5.0, 240.0, 55.0)));
        assert_eq!(bbox.with_border(15.0), Rect::new(-5.0, -10.0, 270.0, 85.0));
    }

    #[test]
    fn test_empty_box() {
        let bbox = BoundingBox::new();
        assert_eq!(bbox.bounds(), None);
        assert_eq!(bbox.with_border(15.0), Rect::new(-15.0, -15.0, 30.0, 30.0));
    }
}
