use crate::render::{draw_strokes, Surface};
use crate::Stroke;

/// A surface that can paint a background image of type `I` stretched over
/// its whole area.
pub trait Backdrop<I: ?Sized>: Surface {
    fn draw_backdrop(&mut self, image: &I) -> Result<(), Self::Error>;
}

/// Paints the background, then every committed stroke in commit order. The
/// caller encodes the surface afterwards.
pub fn composite<S, I>(surface: &mut S, background: &I, strokes: &[Stroke]) -> Result<(), S::Error>
where
    S: Backdrop<I> + ?Sized,
    I: ?Sized,
{
    surface.clear()?;
    surface.draw_backdrop(background)?;
    draw_strokes(surface, strokes)
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;
    use crate::render::testing::{line, symbol, Op, Recorder};
    use crate::session::Session;
    use crate::{Point, StrokeKind};

    impl Backdrop<str> for Recorder {
        fn draw_backdrop(&mut self, image: &str) -> Result<(), Infallible> {
            self.ops.push(Op::Backdrop(image.to_string()));
            Ok(())
        }
    }

    #[test]
    fn background_goes_under_strokes_in_commit_order() {
        let strokes = vec![symbol("X", 1), line(&[(0.0, 0.0), (3.0, 3.0)])];
        let mut surface = Recorder::default();
        composite(&mut surface, "body-diagram.png", &strokes).unwrap();
        assert_eq!(
            surface.ops,
            vec![
                Op::Clear,
                Op::Backdrop("body-diagram.png".into()),
                Op::Text("X".into(), Point::new(0.0, 0.0)),
                Op::Polyline(strokes[1].points.clone()),
            ]
        );
    }

    #[test]
    fn in_progress_stroke_is_left_out() {
        let mut session = Session::new();
        session.begin_stroke(StrokeKind::FreeLine);
        session.append_point(Point::new(0.0, 0.0));
        session.append_point(Point::new(1.0, 1.0));
        session.commit_stroke();
        session.begin_stroke(StrokeKind::FreeLine);
        session.append_point(Point::new(9.0, 9.0));
        session.append_point(Point::new(8.0, 8.0));

        let mut surface = Recorder::default();
        composite(&mut surface, "bg", session.committed()).unwrap();
        let polylines = surface
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Polyline(_)))
            .count();
        assert_eq!(polylines, 1);
    }

    #[test]
    fn repeated_composites_issue_identical_commands() {
        let strokes = vec![line(&[(1.0, 2.0), (3.0, 4.0)]), symbol("O", 16)];
        let mut first = Recorder::default();
        let mut second = Recorder::default();
        composite(&mut first, "bg", &strokes).unwrap();
        composite(&mut second, "bg", &strokes).unwrap();
        assert_eq!(first.ops, second.ops);
    }
}
