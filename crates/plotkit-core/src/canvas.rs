//! Drawing surface dimensions.

use serde::{Deserialize, Serialize};

use crate::error::{ParameterError, ParameterResult};
use crate::model::{Bounds, Point};

/// Paper size and margin in millimetres. The origin is the top-left corner
/// with Y pointing down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        // A4 portrait
        Self {
            width: 210.0,
            height: 297.0,
            margin: 10.0,
        }
    }
}

impl Canvas {
    pub fn new(width: f64, height: f64, margin: f64) -> Self {
        Self {
            width,
            height,
            margin,
        }
    }

    /// Full paper rectangle.
    pub fn bounds(&self) -> Bounds {
        Bounds::new(Point::ORIGIN, Point::new(self.width, self.height))
    }

    /// The paper rectangle shrunk by `margin` on every side.
    pub fn drawing_bounds(&self) -> Bounds {
        self.inset_bounds(self.margin)
    }

    /// The paper rectangle shrunk by `inset` on every side, collapsing to the
    /// centre if the inset exceeds half the paper.
    pub fn inset_bounds(&self, inset: f64) -> Bounds {
        let ix = inset.min(self.width / 2.0);
        let iy = inset.min(self.height / 2.0);
        Bounds::new(
            Point::new(ix, iy),
            Point::new(self.width - ix, self.height - iy),
        )
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Shorter side of the drawing area.
    pub fn min_side(&self) -> f64 {
        let b = self.drawing_bounds();
        b.width().min(b.height())
    }

    pub fn validate(&self) -> ParameterResult<()> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ParameterError::InvalidValue {
                    name: format!("canvas.{name}"),
                    reason: format!("must be positive, got {value}"),
                });
            }
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(ParameterError::InvalidValue {
                name: "canvas.margin".to_string(),
                reason: format!("must be non-negative, got {}", self.margin),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drawing_bounds() {
        let c = Canvas::new(100.0, 50.0, 5.0);
        let b = c.drawing_bounds();
        assert_eq!(b.min, Point::new(5.0, 5.0));
        assert_eq!(b.max, Point::new(95.0, 45.0));
        assert_eq!(c.min_side(), 40.0);
        assert_eq!(c.center(), Point::new(50.0, 25.0));
    }

    #[test]
    fn test_validate() {
        assert!(Canvas::default().validate().is_ok());
        assert!(Canvas::new(0.0, 10.0, 0.0).validate().is_err());
        assert!(Canvas::new(10.0, 10.0, -1.0).validate().is_err());
    }
}
