use crate::Point;

/// Where the canvas sits on screen and how large its backing store is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasGeometry {
    pub left: f64,
    pub top: f64,
    pub display_width: f64,
    pub display_height: f64,
    pub backing_width: f64,
    pub backing_height: f64,
}

/// Client-space input for one event. Touch events carry every active touch;
/// only the first one drives the stroke.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerSample {
    Pointer { client_x: f64, client_y: f64 },
    Touches(Vec<(f64, f64)>),
}

impl CanvasGeometry {
    /// Backing pixels per CSS pixel along each axis.
    pub fn scale(&self) -> Option<(f64, f64)> {
        if self.display_width <= 0.0 || self.display_height <= 0.0 {
            return None;
        }
        Some((
            self.backing_width / self.display_width,
            self.backing_height / self.display_height,
        ))
    }

    pub fn map_client(&self, client_x: f64, client_y: f64) -> Option<Point> {
        let (scale_x, scale_y) = self.scale()?;
        Point::finite(
            (client_x - self.left) * scale_x,
            (client_y - self.top) * scale_y,
        )
    }

    pub fn map_input(&self, sample: &PointerSample) -> Option<Point> {
        match sample {
            PointerSample::Pointer { client_x, client_y } => self.map_client(*client_x, *client_y),
            PointerSample::Touches(touches) => {
                let (client_x, client_y) = touches.first()?;
                self.map_client(*client_x, *client_y)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn half_size() -> CanvasGeometry {
        CanvasGeometry {
            left: 0.0,
            top: 0.0,
            display_width: 300.0,
            display_height: 300.0,
            backing_width: 600.0,
            backing_height: 600.0,
        }
    }

    #[test]
    fn corner_and_center_map_into_backing_pixels() {
        let geometry = half_size();
        assert_eq!(geometry.map_client(0.0, 0.0), Some(Point::new(0.0, 0.0)));
        assert_eq!(
            geometry.map_client(150.0, 150.0),
            Some(Point::new(300.0, 300.0))
        );
    }

    #[test]
    fn element_offset_is_subtracted_before_scaling() {
        let geometry = CanvasGeometry {
            left: 20.0,
            top: 40.0,
            display_width: 200.0,
            display_height: 100.0,
            backing_width: 400.0,
            backing_height: 400.0,
        };
        assert_eq!(geometry.map_client(20.0, 40.0), Some(Point::new(0.0, 0.0)));
        assert_eq!(
            geometry.map_client(70.0, 65.0),
            Some(Point::new(100.0, 100.0))
        );
    }

    #[test]
    fn only_the_first_touch_counts() {
        let geometry = half_size();
        let sample = PointerSample::Touches(vec![(10.0, 20.0), (100.0, 100.0)]);
        assert_eq!(geometry.map_input(&sample), Some(Point::new(20.0, 40.0)));
        assert_eq!(geometry.map_input(&PointerSample::Touches(Vec::new())), None);
        let pointer = PointerSample::Pointer {
            client_x: 150.0,
            client_y: 0.0,
        };
        assert_eq!(geometry.map_input(&pointer), Some(Point::new(300.0, 0.0)));
    }

    #[test]
    fn collapsed_element_maps_nothing() {
        let geometry = CanvasGeometry {
            display_width: 0.0,
            ..half_size()
        };
        assert_eq!(geometry.scale(), None);
        assert_eq!(geometry.map_client(1.0, 1.0), None);
    }
}
